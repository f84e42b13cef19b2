//! Sampler configuration errors.

/// Degenerate settings rejected when a sampler, layout, or cache is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SamplerConfigError {
    /// The chunk cache must be able to hold at least one chunk.
    #[error("chunk cache capacity must be at least 1")]
    ZeroCapacity,

    /// A chunk must span at least one tile.
    #[error("chunk size must be at least 1 tile")]
    ZeroChunkSize,

    /// A tile must span at least one pixel.
    #[error("tile size must be at least 1 pixel")]
    ZeroTileSize,

    /// The chunk pixel buffer would not be addressable.
    #[error("chunk of {chunk_size} tiles at {tile_size} px per tile is too large")]
    ChunkTooLarge { chunk_size: u32, tile_size: u32 },
}

//! Chunk addressing, pixel buffers, and the chunk renderer.
//!
//! A chunk is a square block of `chunk_size` tiles per edge. Each tile is
//! flood-filled with one color, so a rendered chunk is a square RGBA buffer
//! of `chunk_size * tile_size` pixels per edge.

use tracing::trace;

use crate::SamplerConfigError;
use crate::biome::{Biome, BiomeClassifier, ClimateSample};
use crate::perlin::NoiseField;

/// Integer grid coordinate of a chunk. `(1, 2)` and `(2, 1)` are distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Chunk and tile dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkLayout {
    chunk_size: u32,
    tile_size: u32,
}

impl ChunkLayout {
    /// Validate and build a layout.
    ///
    /// # Errors
    ///
    /// Returns [`SamplerConfigError`] if either dimension is zero or the
    /// pixel buffer would overflow.
    pub fn new(chunk_size: u32, tile_size: u32) -> Result<Self, SamplerConfigError> {
        if chunk_size == 0 {
            return Err(SamplerConfigError::ZeroChunkSize);
        }
        if tile_size == 0 {
            return Err(SamplerConfigError::ZeroTileSize);
        }
        let too_large = SamplerConfigError::ChunkTooLarge {
            chunk_size,
            tile_size,
        };
        let side = chunk_size.checked_mul(tile_size).ok_or(too_large.clone())?;
        (side as usize)
            .checked_mul(side as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(too_large)?;
        Ok(Self {
            chunk_size,
            tile_size,
        })
    }

    /// Trusted constructor for built-in presets.
    pub(crate) const fn preset(chunk_size: u32, tile_size: u32) -> Self {
        Self {
            chunk_size,
            tile_size,
        }
    }

    /// Tiles per chunk edge.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Pixels per tile edge.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Pixels per chunk edge.
    pub fn chunk_pixels(&self) -> u32 {
        self.chunk_size * self.tile_size
    }

    /// World-tile coordinate of a chunk's top-left tile.
    pub fn tile_origin(&self, coord: ChunkCoord) -> (i64, i64) {
        let size = self.chunk_size as i64;
        (coord.x as i64 * size, coord.y as i64 * size)
    }

    /// The chunk containing a world-tile position.
    pub fn chunk_containing(&self, x: f64, y: f64) -> ChunkCoord {
        let size = self.chunk_size as f64;
        ChunkCoord::new((x / size).floor() as i32, (y / size).floor() as i32)
    }
}

/// A rendered chunk: row-major RGBA pixels, immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ChunkImage {
    coord: ChunkCoord,
    side: u32,
    pixels: Vec<u8>,
}

impl ChunkImage {
    /// A fully transparent buffer of `side * side` pixels.
    pub fn blank(coord: ChunkCoord, side: u32) -> Self {
        Self {
            coord,
            side,
            pixels: vec![0; side as usize * side as usize * 4],
        }
    }

    /// The chunk this image was rendered for.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Pixels per edge.
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Raw RGBA bytes, `side * side * 4` long.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.side || y >= self.side {
            return None;
        }
        let idx = (y as usize * self.side as usize + x as usize) * 4;
        let px = &self.pixels[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Fill an opaque square block. Parts outside the buffer are skipped.
    pub fn fill_block(&mut self, x0: u32, y0: u32, size: u32, rgb: [u8; 3]) {
        let x_end = x0.saturating_add(size).min(self.side);
        let y_end = y0.saturating_add(size).min(self.side);
        let stride = self.side as usize * 4;
        for y in y0..y_end {
            let row = y as usize * stride;
            for x in x0..x_end {
                let idx = row + x as usize * 4;
                self.pixels[idx..idx + 4].copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
            }
        }
    }

    /// Number of distinct RGB colors in the buffer.
    pub fn unique_color_count(&self) -> usize {
        let mut colors = hashbrown::HashSet::new();
        for px in self.pixels.chunks_exact(4) {
            colors.insert((px[0], px[1], px[2]));
        }
        colors.len()
    }
}

impl std::fmt::Debug for ChunkImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkImage")
            .field("coord", &self.coord)
            .field("side", &self.side)
            .finish_non_exhaustive()
    }
}

/// Renders chunks from a noise field and a biome classifier.
///
/// Holds no mutable state, so one renderer can be shared across threads.
#[derive(Clone, Debug)]
pub struct ChunkRenderer<N, C> {
    noise: N,
    classifier: C,
    layout: ChunkLayout,
}

impl<N: NoiseField, C: BiomeClassifier> ChunkRenderer<N, C> {
    pub fn new(noise: N, classifier: C, layout: ChunkLayout) -> Self {
        Self {
            noise,
            classifier,
            layout,
        }
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    /// Biome at a world-tile position.
    pub fn biome_at(&self, x: f64, y: f64) -> C::Biome {
        self.classifier.classify(&self.noise, x, y)
    }

    /// Raw climate fields at a world-tile position.
    pub fn climate_at(&self, x: f64, y: f64) -> ClimateSample {
        self.classifier.sample_climate(&self.noise, x, y)
    }

    /// Color of a single world tile.
    pub fn tile_color(&self, x: f64, y: f64) -> [u8; 3] {
        let biome = self.biome_at(x, y);
        let scale = self.classifier.detail_scale();
        let detail = self.noise.noise(x * scale, y * scale);
        let colors = &biome.descriptor().colors;
        let shade = colors[self.classifier.shade_index(detail).min(colors.len() - 1)];
        [shade.0, shade.1, shade.2]
    }

    /// Render the pixel buffer for one chunk.
    pub fn render(&self, coord: ChunkCoord) -> ChunkImage {
        let size = self.layout.chunk_size;
        let tile = self.layout.tile_size;
        let (origin_x, origin_y) = self.layout.tile_origin(coord);
        let mut image = ChunkImage::blank(coord, self.layout.chunk_pixels());

        for ty in 0..size {
            for tx in 0..size {
                let wx = (origin_x + tx as i64) as f64;
                let wy = (origin_y + ty as i64) as f64;
                let rgb = self.tile_color(wx, wy);
                image.fill_block(tx * tile, ty * tile, tile, rgb);
            }
        }

        trace!(chunk = %coord, colors = image.unique_color_count(), "rendered chunk");
        image
    }
}

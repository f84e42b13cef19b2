//! Deterministic 2D world sampling: gradient noise, fractal fields, biome
//! classification, and a bounded cache of rendered chunks.

mod async_generation;
mod cache;
mod chunk;
mod error;
mod fractal;
mod perlin;
mod sampler;
mod seed;

pub mod biome;

pub use async_generation::{AsyncChunkGenerator, GeneratedChunk};
pub use biome::{
    Biome, BiomeClassifier, BiomeDescriptor, ClimateSample, EchoBiome, EchoClassifier,
    FieldScale, MusicProfile, Rgb, TerrainBiome, TerrestrialClassifier, Waveform,
};
pub use cache::ChunkCache;
pub use chunk::{ChunkCoord, ChunkImage, ChunkLayout, ChunkRenderer};
pub use error::SamplerConfigError;
pub use fractal::{BASE_AMPLITUDE, LACUNARITY, PERSISTENCE, fbm, total_amplitude};
pub use perlin::{
    GradientNoise, GradientSet, NoiseField, NoiseFnField, PERMUTATION_SIZE, PermutationTable,
    fade, lerp, permute,
};
pub use sampler::{
    EchoSampler, SamplerPreset, TerrestrialSampler, Viewport, VisibleChunk, WorldSampler,
    visible_chunks,
};
pub use seed::{derive_seed, hash_chunk_image, random_seed, world_rng};

//! Deterministic seeding utilities.
//!
//! Provides world RNG construction, sub-seed derivation, and content hashing
//! of rendered chunks for reproducibility checks.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::chunk::ChunkImage;

/// A reproducible RNG for the given world seed.
pub fn world_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Derive an independent sub-seed from a world seed and a salt.
pub fn derive_seed(world_seed: u64, salt: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    salt.hash(&mut hasher);
    hasher.finish()
}

/// A fresh seed from the thread-local entropy source, for unseeded worlds.
pub fn random_seed() -> u64 {
    rand::random()
}

/// Hash a chunk's coordinate and pixels for determinism comparison.
pub fn hash_chunk_image(image: &ChunkImage) -> u64 {
    let mut hasher = DefaultHasher::new();
    image.coord().hash(&mut hasher);
    image.side().hash(&mut hasher);
    image.pixels().hash(&mut hasher);
    hasher.finish()
}

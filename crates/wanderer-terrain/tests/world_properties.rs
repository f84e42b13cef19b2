//! Whole-crate properties of the world sampler, checked over many points.

use std::sync::Arc;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wanderer_terrain::{
    Biome, ChunkCoord, EchoBiome, EchoSampler, GradientNoise, GradientSet, NoiseField,
    PermutationTable, TerrainBiome, TerrestrialSampler, Viewport,
};

const SAMPLES: usize = 10_000;

fn random_points(seed: u64) -> impl Iterator<Item = (f64, f64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..SAMPLES).map(move |_| {
        (
            rng.random_range(-10_000.0..10_000.0),
            rng.random_range(-10_000.0..10_000.0),
        )
    })
}

#[test]
fn test_noise_and_fbm_stay_in_unit_range() {
    for gradients in [GradientSet::Swizzled, GradientSet::Diagonal] {
        let field = GradientNoise::from_seed(2024, gradients);
        for (x, y) in random_points(1) {
            let n = field.noise(x * 0.37, y * 0.37);
            assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&n), "noise {n} at ({x}, {y})");
            let f = field.fbm(x * 0.01, y * 0.01, 4);
            assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&f), "fbm {f} at ({x}, {y})");
        }
    }
}

#[test]
fn test_every_point_gets_a_catalog_biome() {
    let terrestrial = TerrestrialSampler::terrestrial(31337);
    let echo = EchoSampler::echo(31337);
    for (x, y) in random_points(2) {
        assert!(TerrainBiome::ALL.contains(&terrestrial.biome_at(x, y)));
        assert!(EchoBiome::ALL.contains(&echo.biome_at(x, y)));
    }
}

#[test]
fn test_terrestrial_world_is_varied() {
    let sampler = TerrestrialSampler::terrestrial(8);
    let mut seen = std::collections::HashSet::new();
    for (x, y) in random_points(3) {
        seen.insert(sampler.biome_at(x, y));
    }
    assert!(seen.len() >= 4, "only saw {seen:?}");
}

#[test]
fn test_identity_table_golden_value() {
    for gradients in [GradientSet::Swizzled, GradientSet::Diagonal] {
        let field = GradientNoise::new(PermutationTable::identity(), gradients);
        let n = field.noise(0.5, 0.5);
        assert!((n - 0.25).abs() < 1e-12, "{gradients:?} gave {n}");
    }
}

#[test]
fn test_same_seed_same_world() {
    let mut a = TerrestrialSampler::terrestrial(12345);
    let mut b = TerrestrialSampler::terrestrial(12345);
    assert_eq!(*a.get_chunk(10, 5), *b.get_chunk(10, 5));
    assert_eq!(a.biome_at(640.0, 320.0), b.biome_at(640.0, 320.0));
}

#[test]
fn test_cache_never_exceeds_capacity_on_a_long_walk() {
    let mut sampler = EchoSampler::echo(5);
    let viewport = Viewport::new(800, 600);
    let mut camera = DVec2::ZERO;
    for _ in 0..60 {
        for visible in sampler.visible_chunks(camera, viewport) {
            sampler.get_chunk(visible.coord.x, visible.coord.y);
            assert!(sampler.cache().len() <= sampler.cache().capacity());
        }
        camera += DVec2::new(40.0, 17.0);
    }
    assert_eq!(sampler.cache().len(), 31);
    for key in sampler.cache().keys_oldest_first() {
        assert_eq!(sampler.cache().get(key).map(|c| c.coord()), Some(key));
    }
}

#[test]
fn test_oldest_chunk_is_evicted_first() {
    let mut sampler = TerrestrialSampler::terrestrial(1);
    for cx in 0..25 {
        sampler.get_chunk(cx, 0);
    }
    let first = sampler.get_chunk(0, 0);
    sampler.get_chunk(100, 100);
    assert!(!sampler.cache().contains(ChunkCoord::new(0, 0)));
    assert!(sampler.cache().contains(ChunkCoord::new(1, 0)));
    let again = sampler.get_chunk(0, 0);
    assert!(!Arc::ptr_eq(&first, &again));
    assert_eq!(*first, *again);
}

#[test]
fn test_echo_chunks_use_echo_palettes() {
    let mut sampler = EchoSampler::echo(99);
    let chunk = sampler.get_chunk(0, 0);
    assert_eq!(chunk.side(), 384);
    let palette: Vec<_> = EchoBiome::ALL
        .iter()
        .flat_map(|b| b.descriptor().colors)
        .collect();
    for px in chunk.pixels().chunks_exact(4) {
        let rgb = wanderer_terrain::Rgb(px[0], px[1], px[2]);
        assert!(palette.contains(&rgb), "unexpected color {rgb:?}");
    }
}

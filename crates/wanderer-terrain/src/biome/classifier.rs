//! Climate sampling and the [`BiomeClassifier`] trait.

use crate::perlin::NoiseField;

use super::Biome;

/// One fbm-derived scalar field: world coordinates are scaled, then offset
/// so that fields sharing one noise source stay decorrelated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldScale {
    pub scale: f64,
    pub offset: f64,
    pub octaves: u32,
}

impl FieldScale {
    pub const fn new(scale: f64, offset: f64, octaves: u32) -> Self {
        Self {
            scale,
            offset,
            octaves,
        }
    }

    /// Raw fbm value in `[-1, 1]` at world position `(x, y)`.
    pub fn sample<N: NoiseField + ?Sized>(&self, field: &N, x: f64, y: f64) -> f64 {
        field.fbm(
            x * self.scale + self.offset,
            y * self.scale + self.offset,
            self.octaves,
        )
    }

    /// Field value remapped from `[-1, 1]` to `[0, 1]`.
    pub fn sample_unit<N: NoiseField + ?Sized>(&self, field: &N, x: f64, y: f64) -> f64 {
        (self.sample(field, x, y) + 1.0) / 2.0
    }
}

/// The scalar fields a classifier decides on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateSample {
    pub elevation: f64,
    pub moisture: f64,
    pub temperature: f64,
}

/// Maps world coordinates to exactly one biome of a fixed catalog.
///
/// Classification is split into sampling (noise-dependent) and a pure
/// decision tree over the sampled climate, so the tree can be exercised
/// with hand-picked values.
pub trait BiomeClassifier: Send + Sync {
    type Biome: Biome;

    /// Evaluate the climate fields at a world position.
    fn sample_climate<N: NoiseField + ?Sized>(&self, field: &N, x: f64, y: f64)
    -> ClimateSample;

    /// Decision tree over threshold bands. Total over all inputs.
    fn classify_climate(&self, climate: &ClimateSample) -> Self::Biome;

    /// Biome at a world position.
    fn classify<N: NoiseField + ?Sized>(&self, field: &N, x: f64, y: f64) -> Self::Biome {
        self.classify_climate(&self.sample_climate(field, x, y))
    }

    /// Coordinate scale of the per-tile detail noise.
    fn detail_scale(&self) -> f64;

    /// Which of a biome's three colors a detail noise value selects.
    fn shade_index(&self, detail: f64) -> usize;
}

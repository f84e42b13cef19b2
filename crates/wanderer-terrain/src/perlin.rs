//! Seeded 2D gradient noise over a doubled permutation table.
//!
//! The permutation table is shuffled once and never mutated, so a
//! [`GradientNoise`] is a pure function of `(x, y)` and its table.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::fractal;

/// Number of distinct lattice hashes.
pub const PERMUTATION_SIZE: usize = 256;

/// A shuffled permutation of `0..=255`, stored twice so that
/// `table[i + 1]` never needs a wrap-around check.
#[derive(Clone, PartialEq, Eq)]
pub struct PermutationTable {
    values: [u8; PERMUTATION_SIZE * 2],
}

impl PermutationTable {
    /// Build a table from an explicit ordering of the 256 lattice hashes.
    pub fn from_values(values: [u8; PERMUTATION_SIZE]) -> Self {
        let mut doubled = [0u8; PERMUTATION_SIZE * 2];
        doubled[..PERMUTATION_SIZE].copy_from_slice(&values);
        doubled[PERMUTATION_SIZE..].copy_from_slice(&values);
        Self { values: doubled }
    }

    /// The unshuffled table `[0, 1, ..., 255]`. Useful for golden values.
    pub fn identity() -> Self {
        let mut values = [0u8; PERMUTATION_SIZE];
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as u8;
        }
        Self::from_values(values)
    }

    /// Fisher-Yates shuffle of `0..=255` driven by `rng`.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut values = [0u8; PERMUTATION_SIZE];
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as u8;
        }
        for i in (1..PERMUTATION_SIZE).rev() {
            let j = rng.random_range(0..=i);
            values.swap(i, j);
        }
        Self::from_values(values)
    }

    /// Reproducible shuffle seeded through ChaCha8.
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// The full 512-entry table.
    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    #[inline]
    fn at(&self, index: usize) -> usize {
        self.values[index] as usize
    }
}

impl std::fmt::Debug for PermutationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermutationTable")
            .field("head", &&self.values[..8])
            .finish_non_exhaustive()
    }
}

/// Shuffle `0..=255` and return the doubled 512-entry table.
pub fn permute<R: Rng + ?Sized>(rng: &mut R) -> Vec<u8> {
    PermutationTable::shuffled(rng).as_slice().to_vec()
}

/// Quintic smoothstep `t^3 (t (6t - 15) + 10)`.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linear interpolation `a + t (b - a)`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// How the low two bits of a lattice hash select a corner gradient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GradientSet {
    /// Swaps the axes for hashes 2 and 3, giving gradients
    /// `(1,1)`, `(-1,1)`, `(-1,1)`, `(-1,-1)`.
    #[default]
    Swizzled,
    /// Plain sign flips: `(1,1)`, `(-1,1)`, `(1,-1)`, `(-1,-1)`.
    Diagonal,
}

impl GradientSet {
    /// Dot product of the hashed corner gradient with the offset `(x, y)`.
    #[inline]
    pub fn grad(self, hash: usize, x: f64, y: f64) -> f64 {
        let h = hash & 3;
        let (u, v) = match self {
            GradientSet::Swizzled if h >= 2 => (y, x),
            _ => (x, y),
        };
        let u = if h & 1 != 0 { -u } else { u };
        let v = if h & 2 != 0 { -v } else { v };
        u + v
    }
}

/// A scalar field sampled at 2D points.
///
/// Classifiers only talk to this trait, so tests can substitute fixed fields.
pub trait NoiseField {
    /// Base noise in approximately `[-1, 1]`.
    fn noise(&self, x: f64, y: f64) -> f64;

    /// Fractal sum of `octaves` noise layers, normalized to `[-1, 1]`.
    fn fbm(&self, x: f64, y: f64, octaves: u32) -> f64 {
        fractal::fbm(|nx, ny| self.noise(nx, ny), x, y, octaves)
    }
}

impl<T: NoiseField + ?Sized> NoiseField for &T {
    fn noise(&self, x: f64, y: f64) -> f64 {
        (**self).noise(x, y)
    }

    fn fbm(&self, x: f64, y: f64, octaves: u32) -> f64 {
        (**self).fbm(x, y, octaves)
    }
}

/// Classic 2D gradient noise with a quintic fade.
#[derive(Clone, Debug)]
pub struct GradientNoise {
    table: PermutationTable,
    gradients: GradientSet,
}

impl GradientNoise {
    /// Noise over an explicit table.
    pub fn new(table: PermutationTable, gradients: GradientSet) -> Self {
        Self { table, gradients }
    }

    /// Noise over a table shuffled from `seed`.
    pub fn from_seed(seed: u64, gradients: GradientSet) -> Self {
        Self::new(PermutationTable::from_seed(seed), gradients)
    }

    /// The permutation table backing this field.
    pub fn table(&self) -> &PermutationTable {
        &self.table
    }

    /// The gradient set in use.
    pub fn gradients(&self) -> GradientSet {
        self.gradients
    }
}

impl NoiseField for GradientNoise {
    fn noise(&self, x: f64, y: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        // Negative cells wrap into 0..=255 the same way two's complement masking does.
        let cell_x = (xf as i64 & 255) as usize;
        let cell_y = (yf as i64 & 255) as usize;
        let x = x - xf;
        let y = y - yf;
        let u = fade(x);
        let v = fade(y);

        let p = &self.table;
        let a = p.at(cell_x) + cell_y;
        let b = p.at(cell_x + 1) + cell_y;
        let g = self.gradients;

        lerp(
            lerp(g.grad(p.at(a), x, y), g.grad(p.at(b), x - 1.0, y), u),
            lerp(
                g.grad(p.at(a + 1), x, y - 1.0),
                g.grad(p.at(b + 1), x - 1.0, y - 1.0),
                u,
            ),
            v,
        )
    }
}

/// Adapts any 2D generator from the `noise` crate into a [`NoiseField`].
pub struct NoiseFnField<F>(pub F);

impl<F: noise::NoiseFn<f64, 2>> NoiseField for NoiseFnField<F> {
    fn noise(&self, x: f64, y: f64) -> f64 {
        self.0.get([x, y])
    }
}

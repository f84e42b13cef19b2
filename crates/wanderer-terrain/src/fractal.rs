//! Fractal Brownian motion: octave summation over a base noise function.
//!
//! Each octave doubles the frequency and halves the amplitude of the one
//! before it. The sum is divided by the total amplitude, so the output
//! stays within the base noise's `[-1, 1]` range for any octave count.

/// Amplitude of the first octave.
pub const BASE_AMPLITUDE: f64 = 0.5;
/// Frequency multiplier between octaves.
pub const LACUNARITY: f64 = 2.0;
/// Amplitude multiplier between octaves.
pub const PERSISTENCE: f64 = 0.5;

/// Sum `octaves` layers of `noise`, normalized by [`total_amplitude`].
///
/// Zero octaves is an empty sum and yields `0.0`.
pub fn fbm(noise: impl Fn(f64, f64) -> f64, x: f64, y: f64, octaves: u32) -> f64 {
    let mut value = 0.0;
    let mut amplitude = BASE_AMPLITUDE;
    let mut frequency = 1.0;
    let mut max = 0.0;

    for _ in 0..octaves {
        value += amplitude * noise(x * frequency, y * frequency);
        max += amplitude;
        amplitude *= PERSISTENCE;
        frequency *= LACUNARITY;
    }

    if max > 0.0 { value / max } else { 0.0 }
}

/// Geometric sum of the octave amplitudes used as the fbm normalizer.
pub fn total_amplitude(octaves: u32) -> f64 {
    let mut sum = 0.0;
    let mut amplitude = BASE_AMPLITUDE;
    for _ in 0..octaves {
        sum += amplitude;
        amplitude *= PERSISTENCE;
    }
    sum
}

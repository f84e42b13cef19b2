//! Biome descriptors and the [`Biome`] trait tying a closed enum of biome
//! identifiers to its static catalog.

use std::fmt::Debug;
use std::hash::Hash;

/// An 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Build from a packed `0xRRGGBB` value.
    pub const fn hex(packed: u32) -> Self {
        Self((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
    }
}

/// Oscillator shape for a biome's ambient voice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

/// Ambient music parameters attached to a biome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MusicProfile {
    /// Root frequency in Hz.
    pub base_freq: f64,
    /// Scale degrees in semitones above the root.
    pub scale: &'static [u8],
    /// Relative note rate.
    pub tempo: f64,
    pub wave: Waveform,
    /// Low-pass cutoff in Hz applied while inside the biome.
    pub filter_freq: f64,
}

impl MusicProfile {
    /// Frequency of scale degree `step`, wrapping upward by octaves.
    pub fn note_frequency(&self, step: usize) -> f64 {
        if self.scale.is_empty() {
            return self.base_freq;
        }
        let octave = (step / self.scale.len()) as i32;
        let semitones = self.scale[step % self.scale.len()] as f64 + 12.0 * octave as f64;
        self.base_freq * 2f64.powf(semitones / 12.0)
    }
}

/// Static description of one biome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeDescriptor {
    /// Display name (e.g., "Snow Peak").
    pub name: &'static str,
    /// Representative tile colors; a detail noise sample picks one per tile.
    pub colors: [Rgb; 3],
    /// Present only in the musical catalog.
    pub music: Option<MusicProfile>,
    /// RGBA tint for ambient particles, musical catalog only.
    pub particle_tint: Option<(u8, u8, u8, f32)>,
}

impl BiomeDescriptor {
    /// A plain terrain biome with colors only.
    pub const fn plain(name: &'static str, colors: [Rgb; 3]) -> Self {
        Self {
            name,
            colors,
            music: None,
            particle_tint: None,
        }
    }
}

/// A closed set of biome identifiers with a static descriptor per variant.
pub trait Biome: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every variant, in catalog order.
    const ALL: &'static [Self];

    /// The descriptor for this biome.
    fn descriptor(self) -> &'static BiomeDescriptor;

    /// Display name.
    fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Looks up a biome by display name.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }
}

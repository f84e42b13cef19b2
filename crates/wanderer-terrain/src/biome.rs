//! Biome system: static catalogs, climate sampling, and classification.
//!
//! Each catalog is a closed enum whose variants index a static descriptor
//! table. A [`BiomeClassifier`] turns noise-derived climate fields into one
//! variant of its catalog.

mod classifier;
mod def;
mod echo;
mod terrestrial;

pub use classifier::{BiomeClassifier, ClimateSample, FieldScale};
pub use def::{Biome, BiomeDescriptor, MusicProfile, Rgb, Waveform};
pub use echo::{EchoBiome, EchoClassifier, EchoFields};
pub use terrestrial::{TerrainBiome, TerrestrialClassifier, TerrestrialFields};

//! The terrestrial catalog: oceans through snow peaks, chosen by elevation
//! first, then moisture, then temperature.

use crate::perlin::NoiseField;

use super::{Biome, BiomeClassifier, BiomeDescriptor, ClimateSample, FieldScale, Rgb};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerrainBiome {
    Ocean,
    Sea,
    Beach,
    SnowPeak,
    Mountain,
    Rainforest,
    Forest,
    Taiga,
    Desert,
    Savanna,
    Tundra,
    Grassland,
    Plains,
}

static CATALOG: [BiomeDescriptor; 13] = [
    BiomeDescriptor::plain(
        "Ocean",
        [Rgb::hex(0x1a3a5c), Rgb::hex(0x1e4a6f), Rgb::hex(0x224d73)],
    ),
    BiomeDescriptor::plain(
        "Sea",
        [Rgb::hex(0x2d5a7b), Rgb::hex(0x3a6b8c), Rgb::hex(0x4a7a9a)],
    ),
    BiomeDescriptor::plain(
        "Beach",
        [Rgb::hex(0xc2b280), Rgb::hex(0xd4c48a), Rgb::hex(0xe6d69c)],
    ),
    BiomeDescriptor::plain(
        "Snow Peak",
        [Rgb::hex(0xe8e8e8), Rgb::hex(0xf0f0f0), Rgb::hex(0xffffff)],
    ),
    BiomeDescriptor::plain(
        "Mountain",
        [Rgb::hex(0x6b6b6b), Rgb::hex(0x7a7a7a), Rgb::hex(0x8a8a8a)],
    ),
    BiomeDescriptor::plain(
        "Rainforest",
        [Rgb::hex(0x1a4d1a), Rgb::hex(0x2d5a2d), Rgb::hex(0x1f4f1f)],
    ),
    BiomeDescriptor::plain(
        "Forest",
        [Rgb::hex(0x2d5a2d), Rgb::hex(0x3d6b3d), Rgb::hex(0x4d7a4d)],
    ),
    BiomeDescriptor::plain(
        "Taiga",
        [Rgb::hex(0x3d5a4d), Rgb::hex(0x4a6b5a), Rgb::hex(0x5a7a6a)],
    ),
    BiomeDescriptor::plain(
        "Desert",
        [Rgb::hex(0xc4a35a), Rgb::hex(0xd4b36a), Rgb::hex(0xe4c37a)],
    ),
    BiomeDescriptor::plain(
        "Savanna",
        [Rgb::hex(0x9a8a4a), Rgb::hex(0xaa9a5a), Rgb::hex(0xbaaa6a)],
    ),
    BiomeDescriptor::plain(
        "Tundra",
        [Rgb::hex(0x8a9a8a), Rgb::hex(0x9aaa9a), Rgb::hex(0xaabbaa)],
    ),
    BiomeDescriptor::plain(
        "Grassland",
        [Rgb::hex(0x5a8a4a), Rgb::hex(0x6a9a5a), Rgb::hex(0x7aaa6a)],
    ),
    BiomeDescriptor::plain(
        "Plains",
        [Rgb::hex(0x6a9a5a), Rgb::hex(0x7aaa6a), Rgb::hex(0x8aba7a)],
    ),
];

impl Biome for TerrainBiome {
    const ALL: &'static [Self] = &[
        Self::Ocean,
        Self::Sea,
        Self::Beach,
        Self::SnowPeak,
        Self::Mountain,
        Self::Rainforest,
        Self::Forest,
        Self::Taiga,
        Self::Desert,
        Self::Savanna,
        Self::Tundra,
        Self::Grassland,
        Self::Plains,
    ];

    fn descriptor(self) -> &'static BiomeDescriptor {
        &CATALOG[self as usize]
    }
}

/// Elevation, moisture and temperature fields for [`TerrestrialClassifier`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrestrialFields {
    pub elevation: FieldScale,
    pub moisture: FieldScale,
    pub temperature: FieldScale,
    pub detail_scale: f64,
}

impl Default for TerrestrialFields {
    fn default() -> Self {
        Self {
            elevation: FieldScale::new(0.01, 0.0, 4),
            moisture: FieldScale::new(0.005, 500.0, 3),
            temperature: FieldScale::new(0.004, 1000.0, 2),
            detail_scale: 0.15,
        }
    }
}

/// Classifies into [`TerrainBiome`].
#[derive(Clone, Debug, Default)]
pub struct TerrestrialClassifier {
    pub fields: TerrestrialFields,
}

impl TerrestrialClassifier {
    pub fn new(fields: TerrestrialFields) -> Self {
        Self { fields }
    }
}

impl BiomeClassifier for TerrestrialClassifier {
    type Biome = TerrainBiome;

    fn sample_climate<N: NoiseField + ?Sized>(
        &self,
        field: &N,
        x: f64,
        y: f64,
    ) -> ClimateSample {
        ClimateSample {
            elevation: self.fields.elevation.sample(field, x, y),
            moisture: self.fields.moisture.sample_unit(field, x, y),
            temperature: self.fields.temperature.sample_unit(field, x, y),
        }
    }

    fn classify_climate(&self, climate: &ClimateSample) -> TerrainBiome {
        let ClimateSample {
            elevation: e,
            moisture: m,
            temperature: t,
        } = *climate;

        if e < -0.25 {
            return TerrainBiome::Ocean;
        }
        if e < -0.05 {
            return TerrainBiome::Sea;
        }
        if e < 0.05 {
            return TerrainBiome::Beach;
        }
        if e > 0.55 {
            return if e > 0.7 {
                TerrainBiome::SnowPeak
            } else {
                TerrainBiome::Mountain
            };
        }

        if m > 0.6 {
            if t > 0.6 {
                return TerrainBiome::Rainforest;
            }
            if t > 0.3 {
                return TerrainBiome::Forest;
            }
            return TerrainBiome::Taiga;
        }
        if m < 0.3 {
            if t > 0.6 {
                return TerrainBiome::Desert;
            }
            if t > 0.3 {
                return TerrainBiome::Savanna;
            }
            return TerrainBiome::Tundra;
        }
        if t > 0.5 {
            TerrainBiome::Grassland
        } else {
            TerrainBiome::Plains
        }
    }

    fn detail_scale(&self) -> f64 {
        self.fields.detail_scale
    }

    fn shade_index(&self, detail: f64) -> usize {
        ((detail * 3.0).floor() as i64).unsigned_abs() as usize % 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climate(e: f64, m: f64, t: f64) -> ClimateSample {
        ClimateSample {
            elevation: e,
            moisture: m,
            temperature: t,
        }
    }

    /// Returns a fixed fbm value per field, keyed on the offset each field adds
    /// to the world origin.
    struct StubField {
        elevation: f64,
        moisture_raw: f64,
        temperature_raw: f64,
    }

    impl NoiseField for StubField {
        fn noise(&self, _x: f64, _y: f64) -> f64 {
            0.0
        }

        fn fbm(&self, x: f64, _y: f64, _octaves: u32) -> f64 {
            if x >= 900.0 {
                self.temperature_raw
            } else if x >= 400.0 {
                self.moisture_raw
            } else {
                self.elevation
            }
        }
    }

    #[test]
    fn test_catalog_order_matches_variants() {
        for (i, biome) in TerrainBiome::ALL.iter().enumerate() {
            assert_eq!(*biome as usize, i);
        }
        assert_eq!(TerrainBiome::SnowPeak.name(), "Snow Peak");
        assert_eq!(TerrainBiome::from_name("Taiga"), Some(TerrainBiome::Taiga));
        assert_eq!(TerrainBiome::from_name("Lava"), None);
    }

    #[test]
    fn test_stubbed_low_elevation_is_ocean() {
        let classifier = TerrestrialClassifier::default();
        let stub = StubField {
            elevation: -0.5,
            moisture_raw: 0.4,
            temperature_raw: 0.0,
        };
        assert_eq!(classifier.classify(&stub, 0.0, 0.0), TerrainBiome::Ocean);
    }

    #[test]
    fn test_stubbed_high_elevation_beats_moisture() {
        let classifier = TerrestrialClassifier::default();
        // moisture (0.4 + 1) / 2 = 0.7 is forest-range, but elevation wins.
        let stub = StubField {
            elevation: 0.6,
            moisture_raw: 0.4,
            temperature_raw: 0.0,
        };
        assert_eq!(classifier.classify(&stub, 0.0, 0.0), TerrainBiome::Mountain);

        let stub = StubField {
            elevation: 0.75,
            ..stub
        };
        assert_eq!(classifier.classify(&stub, 0.0, 0.0), TerrainBiome::SnowPeak);
    }

    #[test]
    fn test_stubbed_fields_are_remapped_to_unit_range() {
        let classifier = TerrestrialClassifier::default();
        let stub = StubField {
            elevation: 0.2,
            moisture_raw: 0.4,
            temperature_raw: -0.2,
        };
        let sample = classifier.sample_climate(&stub, 0.0, 0.0);
        assert!((sample.moisture - 0.7).abs() < 1e-12);
        assert!((sample.temperature - 0.4).abs() < 1e-12);
        assert_eq!(classifier.classify_climate(&sample), TerrainBiome::Forest);
    }

    #[test]
    fn test_elevation_bands() {
        let c = TerrestrialClassifier::default();
        assert_eq!(c.classify_climate(&climate(-0.3, 0.5, 0.5)), TerrainBiome::Ocean);
        assert_eq!(c.classify_climate(&climate(-0.1, 0.5, 0.5)), TerrainBiome::Sea);
        assert_eq!(c.classify_climate(&climate(0.0, 0.5, 0.5)), TerrainBiome::Beach);
        assert_eq!(c.classify_climate(&climate(0.6, 0.5, 0.5)), TerrainBiome::Mountain);
        assert_eq!(c.classify_climate(&climate(0.8, 0.5, 0.5)), TerrainBiome::SnowPeak);
    }

    #[test]
    fn test_moisture_temperature_grid() {
        let c = TerrestrialClassifier::default();
        let e = 0.2;
        assert_eq!(c.classify_climate(&climate(e, 0.8, 0.8)), TerrainBiome::Rainforest);
        assert_eq!(c.classify_climate(&climate(e, 0.8, 0.5)), TerrainBiome::Forest);
        assert_eq!(c.classify_climate(&climate(e, 0.8, 0.1)), TerrainBiome::Taiga);
        assert_eq!(c.classify_climate(&climate(e, 0.1, 0.8)), TerrainBiome::Desert);
        assert_eq!(c.classify_climate(&climate(e, 0.1, 0.5)), TerrainBiome::Savanna);
        assert_eq!(c.classify_climate(&climate(e, 0.1, 0.1)), TerrainBiome::Tundra);
        assert_eq!(c.classify_climate(&climate(e, 0.5, 0.7)), TerrainBiome::Grassland);
        assert_eq!(c.classify_climate(&climate(e, 0.5, 0.2)), TerrainBiome::Plains);
    }

    #[test]
    fn test_boundaries_fall_through_to_next_band() {
        let c = TerrestrialClassifier::default();
        // e == -0.25 is not < -0.25, so it lands in the sea band.
        assert_eq!(c.classify_climate(&climate(-0.25, 0.5, 0.5)), TerrainBiome::Sea);
        assert_eq!(c.classify_climate(&climate(-0.05, 0.5, 0.5)), TerrainBiome::Beach);
        // e == 0.05 leaves the beach band; e == 0.55 is not > 0.55.
        assert_eq!(c.classify_climate(&climate(0.05, 0.5, 0.2)), TerrainBiome::Plains);
        assert_eq!(c.classify_climate(&climate(0.55, 0.5, 0.2)), TerrainBiome::Plains);
        assert_eq!(c.classify_climate(&climate(0.7, 0.5, 0.5)), TerrainBiome::Mountain);
        // m == 0.6 is not > 0.6; t == 0.5 is not > 0.5.
        assert_eq!(c.classify_climate(&climate(0.2, 0.6, 0.5)), TerrainBiome::Plains);
    }

    #[test]
    fn test_shade_index_range() {
        let c = TerrestrialClassifier::default();
        assert_eq!(c.shade_index(0.0), 0);
        assert_eq!(c.shade_index(0.5), 1);
        assert_eq!(c.shade_index(0.7), 2);
        assert_eq!(c.shade_index(-0.2), 1);
        assert_eq!(c.shade_index(1.0), 0);
        assert_eq!(c.shade_index(-1.0), 0);
    }
}

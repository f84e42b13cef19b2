//! The musical catalog: six dreamlike regions, each carrying ambient music
//! parameters alongside its colors. Only elevation and moisture are sampled.

use crate::perlin::NoiseField;

use super::{
    Biome, BiomeClassifier, BiomeDescriptor, ClimateSample, FieldScale, MusicProfile, Rgb,
    Waveform,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EchoBiome {
    Void,
    Crystal,
    Ember,
    Moss,
    Echo,
    Abyss,
}

static CATALOG: [BiomeDescriptor; 6] = [
    BiomeDescriptor {
        name: "The Void",
        colors: [Rgb(10, 10, 20), Rgb(15, 15, 30), Rgb(20, 20, 40)],
        music: Some(MusicProfile {
            base_freq: 55.0,
            scale: &[0, 3, 7, 10],
            tempo: 0.5,
            wave: Waveform::Sine,
            filter_freq: 400.0,
        }),
        particle_tint: Some((100, 100, 200, 0.6)),
    },
    BiomeDescriptor {
        name: "Crystal Caverns",
        colors: [Rgb(40, 60, 80), Rgb(50, 80, 110), Rgb(60, 100, 140)],
        music: Some(MusicProfile {
            base_freq: 220.0,
            scale: &[0, 4, 7, 11, 12],
            tempo: 1.2,
            wave: Waveform::Triangle,
            filter_freq: 2000.0,
        }),
        particle_tint: Some((150, 200, 255, 0.7)),
    },
    BiomeDescriptor {
        name: "Ember Fields",
        colors: [Rgb(60, 30, 20), Rgb(80, 40, 25), Rgb(100, 50, 30)],
        music: Some(MusicProfile {
            base_freq: 110.0,
            scale: &[0, 2, 5, 7, 9],
            tempo: 0.8,
            wave: Waveform::Sawtooth,
            filter_freq: 800.0,
        }),
        particle_tint: Some((255, 150, 50, 0.7)),
    },
    BiomeDescriptor {
        name: "Moss Gardens",
        colors: [Rgb(30, 50, 35), Rgb(40, 65, 45), Rgb(50, 80, 55)],
        music: Some(MusicProfile {
            base_freq: 165.0,
            scale: &[0, 2, 4, 7, 9, 11],
            tempo: 0.6,
            wave: Waveform::Sine,
            filter_freq: 1200.0,
        }),
        particle_tint: Some((100, 200, 120, 0.6)),
    },
    BiomeDescriptor {
        name: "Echo Peaks",
        colors: [Rgb(50, 50, 60), Rgb(70, 70, 85), Rgb(90, 90, 110)],
        music: Some(MusicProfile {
            base_freq: 330.0,
            scale: &[0, 5, 7, 12],
            tempo: 1.5,
            wave: Waveform::Sine,
            filter_freq: 3000.0,
        }),
        particle_tint: Some((200, 200, 255, 0.8)),
    },
    BiomeDescriptor {
        name: "The Abyss",
        colors: [Rgb(5, 10, 25), Rgb(10, 15, 35), Rgb(15, 25, 50)],
        music: Some(MusicProfile {
            base_freq: 40.0,
            scale: &[0, 1, 5, 6, 10],
            tempo: 0.3,
            wave: Waveform::Sine,
            filter_freq: 200.0,
        }),
        particle_tint: Some((80, 100, 180, 0.5)),
    },
];

impl Biome for EchoBiome {
    const ALL: &'static [Self] = &[
        Self::Void,
        Self::Crystal,
        Self::Ember,
        Self::Moss,
        Self::Echo,
        Self::Abyss,
    ];

    fn descriptor(self) -> &'static BiomeDescriptor {
        &CATALOG[self as usize]
    }
}

/// Temperature reported for a catalog that has no temperature field.
const NEUTRAL_TEMPERATURE: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EchoFields {
    pub elevation: FieldScale,
    /// Sampled raw, in `[-1, 1]`.
    pub moisture: FieldScale,
    pub detail_scale: f64,
}

impl Default for EchoFields {
    fn default() -> Self {
        Self {
            elevation: FieldScale::new(0.008, 0.0, 4),
            moisture: FieldScale::new(0.004, 500.0, 3),
            detail_scale: 0.1,
        }
    }
}

/// Classifies into [`EchoBiome`].
#[derive(Clone, Debug, Default)]
pub struct EchoClassifier {
    pub fields: EchoFields,
}

impl EchoClassifier {
    pub fn new(fields: EchoFields) -> Self {
        Self { fields }
    }
}

impl BiomeClassifier for EchoClassifier {
    type Biome = EchoBiome;

    fn sample_climate<N: NoiseField + ?Sized>(
        &self,
        field: &N,
        x: f64,
        y: f64,
    ) -> ClimateSample {
        ClimateSample {
            elevation: self.fields.elevation.sample(field, x, y),
            moisture: self.fields.moisture.sample(field, x, y),
            temperature: NEUTRAL_TEMPERATURE,
        }
    }

    fn classify_climate(&self, climate: &ClimateSample) -> EchoBiome {
        let e = climate.elevation;
        let m = climate.moisture;

        if e < -0.3 {
            EchoBiome::Abyss
        } else if e < -0.1 {
            EchoBiome::Void
        } else if e > 0.4 {
            EchoBiome::Echo
        } else if m > 0.2 {
            EchoBiome::Crystal
        } else if m < -0.2 {
            EchoBiome::Ember
        } else {
            EchoBiome::Moss
        }
    }

    fn detail_scale(&self) -> f64 {
        self.fields.detail_scale
    }

    fn shade_index(&self, detail: f64) -> usize {
        let unit = (detail + 1.0) / 2.0;
        ((unit * 2.99).floor() as usize).min(2)
    }
}

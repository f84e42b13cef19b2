//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted config inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level walker configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World generation settings.
    pub world: WorldConfig,
    /// Output frame settings.
    pub view: ViewConfig,
    /// Scripted walk settings.
    pub walk: WalkConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Which biome catalog and preset the world uses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum WorldCatalog {
    /// Thirteen earth-like biomes on 64-tile chunks.
    #[default]
    Terrestrial,
    /// Six musical biomes on 48-tile chunks.
    Echo,
}

/// World generation configuration.
///
/// Unset sizes fall back to the catalog's preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Permutation seed. `None` picks a fresh random world each run.
    pub seed: Option<u64>,
    /// Biome catalog.
    pub catalog: WorldCatalog,
    /// Tiles per chunk edge.
    pub chunk_size: Option<u32>,
    /// Pixels per tile edge.
    pub tile_size: Option<u32>,
    /// Maximum number of cached chunks.
    pub max_chunks: Option<usize>,
    /// Background render threads. Zero renders on the frame thread.
    pub background_workers: usize,
}

/// Output frame configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

/// One straight stretch of the scripted walk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalkLeg {
    /// Horizontal input, -1, 0 or 1.
    pub dx: i8,
    /// Vertical input, -1, 0 or 1. Positive is south.
    pub dy: i8,
    /// Frames to hold this input.
    pub frames: u32,
}

/// Scripted walk configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WalkConfig {
    /// Total frames to simulate. The route repeats if it is shorter.
    pub frames: u32,
    /// Top speed in tiles per frame.
    pub speed: f64,
    /// Starting time of day in `[0, 1)`, 0.5 is noon.
    pub start_time: f64,
    /// Day fraction advanced per frame.
    pub time_speed: f64,
    /// Start with rain on.
    pub rain: bool,
    /// Start with fog on.
    pub fog: bool,
    /// Movement inputs, in order.
    pub route: Vec<WalkLeg>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write the last frame as a PNG when the walk ends.
    pub write_snapshot: bool,
}

// --- Default implementations ---

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            speed: 4.0,
            start_time: 0.5,
            time_speed: 0.00015,
            rain: false,
            fog: false,
            route: vec![
                WalkLeg {
                    dx: 1,
                    dy: 0,
                    frames: 200,
                },
                WalkLeg {
                    dx: 1,
                    dy: 1,
                    frames: 200,
                },
                WalkLeg {
                    dx: 0,
                    dy: -1,
                    frames: 200,
                },
            ],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            write_snapshot: true,
        }
    }
}

// --- Validation ---

fn nonzero<T: Default + PartialEq>(
    value: Option<T>,
    field: &'static str,
) -> Result<(), ConfigError> {
    match value {
        Some(v) if v == T::default() => Err(ConfigError::InvalidValue {
            field,
            reason: "must be at least 1",
        }),
        _ => Ok(()),
    }
}

impl WorldConfig {
    /// Reject sizes that cannot describe a chunk or a cache.
    pub fn validate(&self) -> Result<(), ConfigError> {
        nonzero(self.chunk_size, "world.chunk_size")?;
        nonzero(self.tile_size, "world.tile_size")?;
        nonzero(self.max_chunks, "world.max_chunks")?;
        Ok(())
    }
}

impl ViewConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        nonzero(Some(self.width), "view.width")?;
        nonzero(Some(self.height), "view.height")?;
        Ok(())
    }
}

impl WalkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "walk.speed",
                reason: "must be a finite, non-negative number",
            });
        }
        if !self.time_speed.is_finite() || self.time_speed < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "walk.time_speed",
                reason: "must be a finite, non-negative number",
            });
        }
        if !(0.0..1.0).contains(&self.start_time) {
            return Err(ConfigError::InvalidValue {
                field: "walk.start_time",
                reason: "must be in [0, 1)",
            });
        }
        if self
            .route
            .iter()
            .any(|leg| !(-1..=1).contains(&leg.dx) || !(-1..=1).contains(&leg.dy))
        {
            return Err(ConfigError::InvalidValue {
                field: "walk.route",
                reason: "leg inputs must be -1, 0 or 1",
            });
        }
        if self.frames > 0 && self.route.iter().all(|leg| leg.frames == 0) {
            return Err(ConfigError::InvalidValue {
                field: "walk.route",
                reason: "needs at least one leg with frames",
            });
        }
        Ok(())
    }

    /// Movement input for frame `frame`, cycling through the route.
    pub fn input_at(&self, frame: u32) -> (i8, i8) {
        let cycle: u64 = self.route.iter().map(|leg| leg.frames as u64).sum();
        if cycle == 0 {
            return (0, 0);
        }
        let mut t = frame as u64 % cycle;
        for leg in &self.route {
            if t < leg.frames as u64 {
                return (leg.dx, leg.dy);
            }
            t -= leg.frames as u64;
        }
        (0, 0)
    }
}

// --- Persistence ---

impl Config {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.view.validate()?;
        self.walk.validate()
    }

    /// Read `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }
        let config = Self::read_file(&path)?;
        log::info!("Using config {}", path.display());
        Ok(config)
    }

    /// Write `config.ron` into `config_dir`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_error)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty)?;

        let path = config_dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, text).map_err(|source| ConfigError::Write { path, source })
    }

    /// Re-read `config.ron`. `Ok(None)` when it matches `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read_file(&config_dir.join(CONFIG_FILE_NAME))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config changed on disk");
        Ok(Some(fresh))
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(ron::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_render_readable_ron() {
        let text = ron::ser::to_string_pretty(&Config::default(), Default::default()).unwrap();
        assert!(text.contains("width: 800"));
        assert!(text.contains("catalog: Terrestrial"));
        assert!(text.contains("route:"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_missing_section_uses_default() {
        let config: Config = ron::from_str("(world: (seed: Some(7), catalog: Echo))").unwrap();
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.world.catalog, WorldCatalog::Echo);
        assert_eq!(config.walk, WalkConfig::default());
        assert_eq!(config.view, ViewConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let mut world = WorldConfig {
            max_chunks: Some(0),
            ..WorldConfig::default()
        };
        assert!(matches!(
            world.validate(),
            Err(ConfigError::InvalidValue {
                field: "world.max_chunks",
                ..
            })
        ));
        world.max_chunks = None;
        world.tile_size = Some(0);
        assert!(world.validate().is_err());
        world.tile_size = Some(6);
        assert!(world.validate().is_ok());

        let view = ViewConfig {
            width: 0,
            height: 600,
        };
        assert!(view.validate().is_err());
    }

    #[test]
    fn test_walk_validation() {
        let mut walk = WalkConfig {
            speed: f64::NAN,
            ..WalkConfig::default()
        };
        assert!(walk.validate().is_err(), "NaN speed must be rejected");
        walk.speed = 4.0;
        walk.route = vec![WalkLeg {
            dx: 2,
            dy: 0,
            frames: 10,
        }];
        assert!(walk.validate().is_err(), "leg inputs are unit steps");
        walk.route.clear();
        assert!(walk.validate().is_err(), "frames without a route");
        walk.frames = 0;
        assert!(walk.validate().is_ok());
    }

    #[test]
    fn test_route_cycles() {
        let walk = WalkConfig {
            route: vec![
                WalkLeg {
                    dx: 1,
                    dy: 0,
                    frames: 2,
                },
                WalkLeg {
                    dx: 0,
                    dy: -1,
                    frames: 1,
                },
            ],
            ..WalkConfig::default()
        };
        let inputs: Vec<_> = (0..6).map(|f| walk.input_at(f)).collect();
        assert_eq!(
            inputs,
            vec![(1, 0), (1, 0), (0, -1), (1, 0), (1, 0), (0, -1)]
        );
    }

    #[test]
    fn test_echo_world_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.seed = Some(42);
        config.world.catalog = WorldCatalog::Echo;
        config.walk.route.truncate(1);

        config.save(dir.path()).unwrap();
        assert_eq!(Config::load_or_create(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("wanderer");
        assert_eq!(Config::load_or_create(&nested).unwrap(), Config::default());
        assert!(nested.join(CONFIG_FILE_NAME).is_file());
    }

    #[test]
    fn test_reload_reports_only_real_changes() {
        let dir = tempfile::tempdir().unwrap();
        let original = Config::default();
        original.save(dir.path()).unwrap();
        assert!(original.reload(dir.path()).unwrap().is_none());

        let mut foggy = original.clone();
        foggy.walk.fog = true;
        foggy.save(dir.path()).unwrap();
        assert_eq!(original.reload(dir.path()).unwrap(), Some(foggy));
    }

    #[test]
    fn test_broken_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "(world: (seed: \"x\"))").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err}");
    }

    #[test]
    fn test_reload_without_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}

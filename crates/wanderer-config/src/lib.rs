//! Configuration for the terrain walker.
//!
//! Settings persist to disk as `config.ron`. Every section is optional in the
//! file, so configs written by older builds keep loading. CLI flags override
//! the loaded values for one run.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, ViewConfig, WalkConfig, WalkLeg, WorldCatalog,
    WorldConfig,
};
pub use error::ConfigError;

//! Command-line argument parsing for the walker.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, WorldCatalog};

/// Terrain walker command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "wanderer", about = "Walk an infinite procedural world")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Biome catalog.
    #[arg(long, value_enum)]
    pub catalog: Option<WorldCatalog>,

    /// Frame width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Frame height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Frames to walk.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Start with rain.
    #[arg(long)]
    pub rain: Option<bool>,

    /// Start with fog.
    #[arg(long)]
    pub fog: Option<bool>,

    /// Background render threads (0 renders on the frame thread).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where to write the final frame (overrides the default snapshot path).
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

impl Config {
    /// Overlay every flag that was passed. `--snapshot` implies writing one.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let world = &mut self.world;
        world.seed = args.seed.or(world.seed);
        world.catalog = args.catalog.unwrap_or(world.catalog);
        world.background_workers = args.workers.unwrap_or(world.background_workers);

        let view = &mut self.view;
        view.width = args.width.unwrap_or(view.width);
        view.height = args.height.unwrap_or(view.height);

        let walk = &mut self.walk;
        walk.frames = args.frames.unwrap_or(walk.frames);
        walk.rain = args.rain.unwrap_or(walk.rain);
        walk.fog = args.fog.unwrap_or(walk.fog);

        if let Some(level) = &args.log_level {
            self.debug.log_level.clone_from(level);
        }
        self.debug.write_snapshot |= args.snapshot.is_some();
    }
}

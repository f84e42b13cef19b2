//! `wanderer`: walk a procedural world along a scripted route and save the
//! final frame.
//!
//! Run with: `cargo run -p wanderer-app -- --seed 42 --catalog echo`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use wanderer_app::clock::WorldClock;
use wanderer_app::frame::FrameError;
use wanderer_app::platform::PlatformDirs;
use wanderer_app::presentation::LogPresentation;
use wanderer_app::session::{WalkSession, build_sampler};
use wanderer_app::walker::Walker;
use wanderer_app::weather::Weather;
use wanderer_config::{CliArgs, Config, WorldCatalog};
use wanderer_terrain::{
    BiomeClassifier, EchoClassifier, GradientNoise, SamplerConfigError, SamplerPreset,
    TerrestrialClassifier, Viewport, WorldSampler, derive_seed, random_seed,
};

/// Everything that can end a walk early once logging is up.
#[derive(Debug, thiserror::Error)]
enum WalkError {
    #[error("invalid world settings: {0}")]
    Sampler(#[from] SamplerConfigError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("failed to start render workers: {0}")]
    Workers(#[from] std::io::Error),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve() {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to resolve platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config_dir = args.config.clone().unwrap_or_else(|| dirs.config_dir.clone());

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create platform directories: {e}");
        return ExitCode::FAILURE;
    }
    wanderer_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let seed = config.world.seed.unwrap_or_else(random_seed);
    let snapshot = config
        .debug
        .write_snapshot
        .then(|| args.snapshot.clone().unwrap_or_else(|| dirs.snapshot_path(seed)));

    info!(
        seed,
        catalog = ?config.world.catalog,
        width = config.view.width,
        height = config.view.height,
        "Starting walk"
    );

    match run(&config, seed, snapshot) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, seed: u64, snapshot: Option<PathBuf>) -> Result<(), WalkError> {
    match config.world.catalog {
        WorldCatalog::Terrestrial => {
            let sampler = build_sampler(
                SamplerPreset::TERRESTRIAL,
                TerrestrialClassifier::default(),
                seed,
                &config.world,
            )?;
            walk(sampler, config, seed, snapshot)
        }
        WorldCatalog::Echo => {
            let sampler = build_sampler(
                SamplerPreset::ECHO,
                EchoClassifier::default(),
                seed,
                &config.world,
            )?;
            walk(sampler, config, seed, snapshot)
        }
    }
}

fn walk<C: BiomeClassifier + 'static>(
    sampler: WorldSampler<GradientNoise, C>,
    config: &Config,
    seed: u64,
    snapshot: Option<PathBuf>,
) -> Result<(), WalkError> {
    let walk = &config.walk;
    let mut weather = Weather::new(derive_seed(seed, "weather"));
    weather.rain = walk.rain;
    weather.fog = walk.fog;

    let mut session = WalkSession::new(
        sampler,
        Viewport::new(config.view.width, config.view.height),
        WorldClock::new(walk.start_time, walk.time_speed),
        weather,
        Walker::new(glam::DVec2::ZERO, walk.speed),
    )?
    .with_background_workers(config.world.background_workers)?;

    let mut hud = LogPresentation::new();
    for frame in 0..walk.frames {
        let (dx, dy) = walk.input_at(frame);
        session.step(dx, dy);
        session.render();
        session.present(&mut hud);
    }

    let (x, y) = session.walker.tile();
    info!(
        frames = walk.frames,
        x,
        y,
        biomes_visited = hud.biome_changes(),
        cached_chunks = session.sampler().cache().len(),
        "Walk finished"
    );

    if let Some(path) = snapshot {
        session.render_complete().save_png(&path)?;
        info!("Saved snapshot to {}", path.display());
    }
    Ok(())
}

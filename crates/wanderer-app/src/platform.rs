//! Where the walker keeps its files.
//!
//! `config.ron` and logs go under the OS config directory, snapshots under
//! the OS data directory. Nothing touches the disk until [`PlatformDirs::create_dirs`].

use std::path::{Path, PathBuf};

const APP_NAME: &str = "wanderer";

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("no configuration directory for this user")]
    NoConfigDir,
    #[error("cannot create walker directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformDirs {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
    /// End-of-walk PNGs.
    pub snapshot_dir: PathBuf,
}

impl PlatformDirs {
    /// Directories for the current user.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoConfigDir`] when the OS reports no config
    /// directory (e.g. `HOME` unset). A missing data directory falls back to
    /// the config directory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_home = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        let data_home = dirs::data_dir().unwrap_or_else(|| config_home.clone());
        Ok(Self::from_homes(&config_home, &data_home))
    }

    /// Every directory under one root, for tests and portable installs.
    pub fn resolve_with_root(root: &Path) -> Self {
        Self::from_homes(root, root)
    }

    fn from_homes(config_home: &Path, data_home: &Path) -> Self {
        let app_config = config_home.join(APP_NAME);
        Self {
            config_dir: app_config.clone(),
            log_dir: app_config.join("logs"),
            snapshot_dir: data_home.join(APP_NAME).join("snapshots"),
        }
    }

    /// # Errors
    ///
    /// Returns [`PlatformError::Io`] for the first directory that cannot be
    /// created.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        for dir in [&self.config_dir, &self.log_dir, &self.snapshot_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Default snapshot file for a world seed.
    pub fn snapshot_path(&self, seed: u64) -> PathBuf {
        self.snapshot_dir.join(format!("{APP_NAME}-{seed}.png"))
    }
}

//! Optional TOML configuration.
//!
//! ```toml
//! analysis_only = false
//!
//! [limits]
//! max_writes_per_table = 20
//! max_matches_per_select = 20
//! max_total_matches = 50000
//!
//! [profile]
//! sample_size = 1000
//! explosion_threshold = 1000000
//! ```
//!
//! Every key is optional; unset keys leave the built-in default in place.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use tablematch_domain::{MatchLimits, ProfileSettings};

pub const CONFIG_FILE_NAME: &str = "tablematch.toml";
const USER_CONFIG_DIR: &str = "tablematch";
const USER_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read config {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },
    #[error("invalid config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfigFile {
    pub analysis_only: Option<bool>,
    pub limits: LimitsSection,
    pub profile: ProfileSection,
}

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsSection {
    pub max_writes_per_table: Option<usize>,
    pub max_matches_per_select: Option<usize>,
    pub max_total_matches: Option<usize>,
}

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileSection {
    pub sample_size: Option<usize>,
    pub explosion_threshold: Option<u64>,
}

impl RunConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Loads the first config found. An explicit path must exist; otherwise
    /// `tablematch.toml` in the working directory, then the per-user config
    /// file, are tried and silently skipped when absent.
    pub fn discover(explicit: Option<&Path>) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let cwd = std::env::current_dir().ok();
        let user_dir = dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR));
        Self::discover_in(explicit, cwd.as_deref(), user_dir.as_deref())
    }

    pub fn discover_in(
        explicit: Option<&Path>,
        working_dir: Option<&Path>,
        user_config_dir: Option<&Path>,
    ) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path).map(|config| Some((path.to_path_buf(), config)));
        }

        let candidates = [
            working_dir.map(|dir| dir.join(CONFIG_FILE_NAME)),
            user_config_dir.map(|dir| dir.join(USER_CONFIG_FILE)),
        ];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                return Self::load(&path).map(|config| Some((path, config)));
            }
        }
        Ok(None)
    }

    pub fn apply_to(&self, limits: &mut MatchLimits, settings: &mut ProfileSettings) {
        let l = &self.limits;
        if let Some(v) = l.max_writes_per_table {
            limits.max_writes_per_table = v;
        }
        if let Some(v) = l.max_matches_per_select {
            limits.max_matches_per_select = v;
        }
        if let Some(v) = l.max_total_matches {
            limits.max_total_matches = v;
        }
        if let Some(v) = self.profile.sample_size {
            settings.sample_size = v;
        }
        if let Some(v) = self.profile.explosion_threshold {
            settings.explosion_threshold = v;
        }
    }
}

//! Configuration for the RBD driver.

use std::path::{Path, PathBuf};

use cinder_shared::constants::envs;
use cinder_shared::{CinderError, CinderResult};
use serde::{Deserialize, Serialize};

use crate::exec::SearchPath;

/// Directory under the user config dir holding `options.json`.
const CONFIG_DIR_NAME: &str = "cinder-rbd";
const CONFIG_FILE_NAME: &str = "options.json";

/// Driver options.
///
/// Loaded from JSON, e.g.:
/// ```json
/// { "search_path": "/opt/ceph/bin:/usr/sbin:/usr/bin" }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverOptions {
    /// Colon-separated directories searched for `rbd`, `file` and `mkfs.*`.
    ///
    /// Default: None (use the process `PATH`)
    #[serde(default)]
    pub search_path: Option<String>,
}

impl DriverOptions {
    /// Load options in order: defaults, the JSON file, then environment.
    ///
    /// `config` names the file explicitly; without it the default location
    /// (`<config dir>/cinder-rbd/options.json`) is read if it exists.
    pub fn load(config: Option<&Path>) -> CinderResult<Self> {
        let mut options = match config {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Ok(search_path) = std::env::var(envs::SEARCH_PATH)
            && !search_path.is_empty()
        {
            tracing::debug!(%search_path, "Search path overridden from environment");
            options.search_path = Some(search_path);
        }

        Ok(options)
    }

    /// Read options from a JSON file.
    pub fn from_file(path: &Path) -> CinderResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CinderError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            CinderError::Config(format!("Invalid options in {}: {}", path.display(), e))
        })
    }

    /// Default options file location, if the platform has a config dir.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Search path the driver locates its tools on.
    pub fn search_path(&self) -> SearchPath {
        match &self.search_path {
            Some(path) => SearchPath::new(path),
            None => SearchPath::from_env(),
        }
    }
}

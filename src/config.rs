//! Ambient configuration for service endpoints.
//!
//! Resolution order, highest priority first: environment variables, the
//! user config file at `~/.hello-qmi/config.json`, built-in defaults.
//! A malformed config file is logged and ignored rather than failing the
//! run; endpoint config is advisory until a request actually needs it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable overriding the lattice registry endpoint.
pub const FOREST_URL_VAR: &str = "FOREST_API_URL";

/// Environment variable overriding the QPU compiler endpoint.
pub const QPU_COMPILER_URL_VAR: &str = "QPU_COMPILER_URL";

/// Default lattice registry endpoint.
pub const DEFAULT_FOREST_URL: &str = "https://forest-server.qcs.rigetti.com";

/// Endpoint configuration for the QCS services this tool talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcsConfig {
    /// Lattice registry base URL.
    pub forest_url: String,
    /// QPU compiler service URL, used by the active-lattice probe and the
    /// QPU proxy. Absent means "not engaged to any compiler".
    #[serde(default)]
    pub qpu_compiler_url: Option<String>,
}

impl Default for QcsConfig {
    fn default() -> Self {
        Self {
            forest_url: DEFAULT_FOREST_URL.to_string(),
            qpu_compiler_url: None,
        }
    }
}

impl QcsConfig {
    /// Load configuration from the environment, the user config file, and
    /// defaults, in that order of precedence.
    pub fn load() -> Self {
        let mut config = Self::from_file().unwrap_or_default();

        if let Ok(url) = std::env::var(FOREST_URL_VAR) {
            config.forest_url = url;
        }
        if let Ok(url) = std::env::var(QPU_COMPILER_URL_VAR) {
            config.qpu_compiler_url = Some(url);
        }

        config
    }

    /// Read the user config file, if present and well-formed.
    fn from_file() -> Option<Self> {
        let path = Self::config_path()?;
        let contents = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("ignoring malformed config file {}: {e}", path.display());
                None
            }
        }
    }

    /// Path of the user config file (`~/.hello-qmi/config.json`).
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".hello-qmi").join("config.json"))
    }
}

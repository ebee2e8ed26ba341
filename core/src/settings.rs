//! Settings — where the control filesystem lives.
//!
//! Resolution order, highest priority first:
//! 1. `PCACHE_SYSFS_ROOT` environment variable
//! 2. the YAML config file (`PCACHE_CONFIG` or `/etc/pcache/pcachectl.yaml`)
//! 3. the built-in default, `/sys/bus/pcache`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sysfs::DEFAULT_SYSFS_ROOT;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/pcache/pcachectl.yaml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Root of the control filesystem.
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,
}

fn default_sysfs_root() -> PathBuf {
    PathBuf::from(DEFAULT_SYSFS_ROOT)
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sysfs_root: default_sysfs_root(),
        }
    }
}

impl Settings {
    /// Parse settings from YAML text. Unknown keys are ignored.
    pub fn parse(content: &str) -> Result<Settings, String> {
        serde_yaml::from_str(content).map_err(|e| format!("invalid config: {}", e))
    }

    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> Result<Settings, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        Settings::parse(&content)
    }

    /// Resolve the effective settings from the environment.
    ///
    /// A missing config file is not an error (defaults apply); a present but
    /// malformed one is.
    pub fn resolve() -> Result<Settings, String> {
        let config_path = std::env::var("PCACHE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut settings = if config_path.exists() {
            Settings::load(&config_path)?
        } else {
            Settings::default()
        };

        if let Ok(root) = std::env::var("PCACHE_SYSFS_ROOT") {
            settings.sysfs_root = PathBuf::from(root);
        }
        Ok(settings)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

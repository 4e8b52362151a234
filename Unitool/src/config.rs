//! User configuration (`config.toml`)
//!
//! Looked up at `{config_dir}/bg3-modders-unitool/config.toml`. Every field is
//! optional; CLI flags take precedence over the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use unilarian::pak::CompressionMethod;

use crate::error::{Error, Result};

/// Directory name used under the config and temp dirs
pub const APP_DIR_NAME: &str = "bg3-modders-unitool";

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnitoolConfig {
    /// Root for per-run staging directories
    pub staging_root: Option<PathBuf>,
    /// PAK entry compression (`lz4`, `zlib`, `none`)
    pub compression: Option<String>,
}

impl UnitoolConfig {
    /// Default config file location, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from the default location; a missing file yields defaults
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Staging root: `cli_override`, then the file, then `{temp_dir}/bg3-modders-unitool`
    pub fn staging_root(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.staging_root.clone())
            .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME))
    }

    /// Compression: `cli_override`, then the file, then LZ4
    pub fn compression(&self, cli_override: Option<&str>) -> Result<CompressionMethod> {
        match cli_override.or(self.compression.as_deref()) {
            Some(name) => CompressionMethod::from_name(name)
                .ok_or_else(|| Error::UnknownCompression(name.to_string())),
            None => Ok(CompressionMethod::default()),
        }
    }
}

//! Configuration file loading and location resolution
//!
//! The TOML file is optional. Its location is resolved in priority order:
//! 1. Explicit path (command-line `--config`)
//! 2. Environment variable `MP3SCAN_CONFIG`
//! 3. User config file: `<config_dir>/mp3scan/config.toml`
//! 4. System config file: `/etc/mp3scan/config.toml` (Linux only)
//!
//! An explicitly requested file must exist. When no file is found in the
//! implicit locations, built-in defaults apply.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "MP3SCAN_CONFIG";

/// Name of the config file inside the per-user config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings read from the TOML configuration file.
///
/// Every key is optional; command-line flags take precedence over these values.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    /// Descend into subdirectories
    pub recursive: bool,

    /// Report per-file warnings and status messages
    pub verbose: bool,

    /// Log the total size of all files found after the scan
    pub report_size: bool,

    /// Store paths relative to the scan root instead of absolute
    pub relative_path: bool,

    /// Colour log output
    pub use_color: bool,

    /// Ask the operator when two tag standards disagree
    pub interactive: bool,

    /// Enabled tag standards (`"v1"`, `"v2"`); both when absent
    pub tag_standards: Option<Vec<String>>,

    /// Table receiving the records (default `MP3`)
    pub table: Option<String>,

    /// Filename fallback settings
    pub filename: Option<FilenameConfig>,

    /// Persistence backend
    pub database: Option<DatabaseConfig>,
}

/// Filename fallback configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FilenameConfig {
    /// Filename schema such as `AT-`
    pub schema: String,

    /// Characters replaced with a space before parsing
    #[serde(default)]
    pub space_chars: Option<String>,
}

/// Persistence backend selection
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum DatabaseConfig {
    /// SQLite database file (created if missing)
    Sqlite { path: PathBuf },

    /// MySQL server
    Mysql {
        host: String,
        user: String,
        #[serde(default)]
        password: Option<String>,
        database: String,
    },
}

impl DatabaseConfig {
    /// Short backend label for log messages
    pub fn backend_name(&self) -> &'static str {
        match self {
            DatabaseConfig::Sqlite { .. } => "sqlite",
            DatabaseConfig::Mysql { .. } => "mysql",
        }
    }
}

/// Resolve the config file location.
///
/// Returns `None` when no explicit path was given and no file exists in the
/// implicit locations.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: User config directory
    let user_config = dirs::config_dir().map(|d| d.join("mp3scan").join(CONFIG_FILE_NAME));
    if let Some(user_config) = user_config {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    // Priority 4: System-wide config
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/mp3scan").join(CONFIG_FILE_NAME);
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

/// Parsed configuration and the file it came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    /// `None` when built-in defaults apply
    pub source: Option<PathBuf>,
}

/// Resolve and load the configuration, falling back to defaults when no file exists
///
/// Nothing is logged here; the binary loads its config before the subscriber
/// is installed and reports `source` afterwards.
pub fn load_config(cli_arg: Option<&Path>) -> Result<LoadedConfig> {
    match resolve_config_path(cli_arg) {
        Some(path) => Ok(LoadedConfig {
            config: load_toml_config(&path)?,
            source: Some(path),
        }),
        None => Ok(LoadedConfig::default()),
    }
}

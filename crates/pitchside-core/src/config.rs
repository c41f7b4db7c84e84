// Configuration loading and parsing (config/pitchside.toml).

use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Name of the single configuration file, relative to `config/`.
pub const CONFIG_FILE: &str = "pitchside.toml";

const DEFAULT_MAX_FILES: usize = 150;
const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 60;
const DEFAULT_LOG_FILTER: &str = "pitchside=info,warn";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub logging: LoggingConfig,
    /// Extra venue definitions layered over the built-in catalog.
    pub venues: Vec<VenueConfig>,
}

impl Config {
    /// Configuration used when no file is available (tests, library callers).
    /// The source directory is resolved against `base_dir`.
    pub fn with_defaults(base_dir: &Path) -> Self {
        Config {
            data: DataConfig {
                source_dir: base_dir.join("data/t20s_csv"),
                max_files: DEFAULT_MAX_FILES,
                load_timeout_secs: DEFAULT_LOAD_TIMEOUT_SECS,
            },
            logging: LoggingConfig::default(),
            venues: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// pitchside.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire pitchside.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    data: DataConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    venues: Vec<VenueConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory holding the ball-by-ball CSV files.
    pub source_dir: PathBuf,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// A venue declared in configuration. Soil and drainage stay as strings here;
/// the analytics crate parses them when building its catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    pub name: String,
    pub soil: String,
    pub clay_fraction: f64,
    pub altitude_m: f64,
    pub avg_temp_c: f64,
    pub drainage: String,
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

fn default_load_timeout_secs() -> u64 {
    DEFAULT_LOAD_TIMEOUT_SECS
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/pitchside.toml` relative to
/// `base_dir`. Relative data paths are resolved against `base_dir`.
///
/// This does not copy defaults; prefer `load_config()` for that.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let mut data = file.data;
    if data.source_dir.is_relative() {
        data.source_dir = base_dir.join(&data.source_dir);
    }

    let config = Config {
        data,
        logging: file.logging,
        venues: file.venues,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/pitchside.toml` from `defaults/pitchside.toml` on first run.
///
/// Returns the path written, or `None` when a config file was already in
/// place. An existing config is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        debug!("using existing config {}", target.display());
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let defaults = std::fs::read(&source).map_err(|e| {
        copy_error(format!(
            "no config at {} and defaults unreadable at {} ({e}); \
             run from the project root or pass --config-dir",
            target.display(),
            source.display()
        ))
    })?;

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| copy_error(format!("cannot create {}: {e}", dir.display())))?;
    }

    // create_new: a config written concurrently by another process wins.
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => return Err(copy_error(format!("cannot create {}: {e}", target.display()))),
    };
    dest.write_all(&defaults)
        .map_err(|e| copy_error(format!("cannot write {}: {e}", target.display())))?;

    info!("created {} from {}", target.display(), source.display());
    Ok(Some(target))
}

fn copy_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

/// Copy defaults if needed, then load config relative to `base_dir`.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.max_files == 0 {
        return Err(ConfigError::ValidationError {
            field: "data.max_files".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.data.load_timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "data.load_timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.logging.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.filter".into(),
            message: "must not be empty".into(),
        });
    }

    for (i, venue) in config.venues.iter().enumerate() {
        if venue.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("venues[{i}].name"),
                message: "must not be empty".into(),
            });
        }
        if !(0.0..=1.0).contains(&venue.clay_fraction) {
            return Err(ConfigError::ValidationError {
                field: format!("venues[{i}].clay_fraction"),
                message: format!(
                    "must be between 0.0 and 1.0 inclusive, got {}",
                    venue.clay_fraction
                ),
            });
        }
        if !venue.altitude_m.is_finite() || venue.altitude_m < 0.0 {
            return Err(ConfigError::ValidationError {
                field: format!("venues[{i}].altitude_m"),
                message: format!("must be >= 0, got {}", venue.altitude_m),
            });
        }
        // Real-world offsets run from UTC-12:00 to UTC+14:00.
        if !(-12 * 60..=14 * 60).contains(&venue.utc_offset_minutes) {
            return Err(ConfigError::ValidationError {
                field: format!("venues[{i}].utc_offset_minutes"),
                message: format!("out of range: {}", venue.utc_offset_minutes),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

use crate::constants::{
    DEFAULT_HEIGHT, DEFAULT_LOG_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_RESIZE_DIR, DEFAULT_WIDTH,
};
use crate::error::ConfigError;
use crate::utils::expand_tilde;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolved settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum width of the resized artifact.
    pub width: u32,
    /// Maximum height of the resized artifact.
    pub height: u32,
    /// Directory receiving both artifacts of every location.
    pub output_dir: PathBuf,
    /// Directory that also receives a copy of each resized artifact.
    pub resize_dir: PathBuf,
    /// Success log; `None` discards it.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            resize_dir: PathBuf::from(DEFAULT_RESIZE_DIR),
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

/// Partial settings from one source. Unset fields leave earlier values alone.
///
/// Field names match the keys of the `[beandregs]` config-file table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub outdir: Option<PathBuf>,
    pub resize_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(rename = "beandregs")]
    section: Option<ConfigOverrides>,
}

impl ConfigOverrides {
    /// Reads the `[beandregs]` table of a TOML config file. A file without
    /// the table yields no overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(file.section.unwrap_or_default())
    }
}

impl Config {
    /// Builds the run configuration: defaults, then the config file (if any),
    /// then `overrides`. Later sources win.
    pub fn load(config_file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = config_file {
            debug!("Load config file: {}", path.display());
            config.apply(ConfigOverrides::from_file(path)?);
        }
        config.apply(overrides);

        config.output_dir = expand_tilde(&config.output_dir);
        config.resize_dir = expand_tilde(&config.resize_dir);
        config.validate()?;

        Ok(config)
    }

    /// Layers `overrides` on top of the current values. An empty `log_file`
    /// disables the success log; only the config file can supply one, the
    /// command line rejects empty paths.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(height) = overrides.height {
            self.height = height;
        }
        if let Some(outdir) = overrides.outdir {
            self.output_dir = outdir;
        }
        if let Some(resize_dir) = overrides.resize_dir {
            self.resize_dir = resize_dir;
        }
        if let Some(log_file) = overrides.log_file {
            self.log_file = (!log_file.as_os_str().is_empty()).then_some(log_file);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroDimension("width"));
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroDimension("height"));
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "width = {}", self.width)?;
        writeln!(f, "height = {}", self.height)?;
        writeln!(f, "outdir = {}", self.output_dir.display())?;
        writeln!(f, "resize_dir = {}", self.resize_dir.display())?;
        match &self.log_file {
            Some(path) => write!(f, "log_file = {}", path.display()),
            None => write!(f, "log_file ="),
        }
    }
}

use std::fmt;
use std::path::PathBuf;

mod loader;
mod paths;

pub use loader::ConfigLoader;
pub use paths::ConfigPaths;

use crate::flags::Flags;
use crate::process::resolver::DEFAULT_PREFIX;
use crate::tokenizer::DEFAULT_MAX_ARGS;

/// Shell settings: defaults, then the config file, then command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Fallback directory for program lookup.
    pub prefix: PathBuf,
    pub path_search: bool,
    /// Field limit per line; `None` is unlimited.
    pub max_args: Option<usize>,
    pub color: bool,
    pub history: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prefix: PathBuf::from(DEFAULT_PREFIX),
            path_search: true,
            max_args: Some(DEFAULT_MAX_ARGS),
            color: true,
            history: true,
        }
    }
}

impl Config {
    pub fn load(paths: &ConfigPaths) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        ConfigLoader::new(paths).load_configs(&mut config)?;
        Ok(config)
    }

    /// Config file first (`--config` or the default location), flags on top.
    pub fn from_flags(flags: &Flags) -> Result<Self, ConfigError> {
        let paths = match flags.get_value("config") {
            Some(file) => ConfigPaths::with_file(file),
            None => ConfigPaths::new(),
        };
        let mut config = Config::load(&paths)?;
        config.apply_flags(flags)?;
        Ok(config)
    }

    pub fn apply_flags(&mut self, flags: &Flags) -> Result<(), ConfigError> {
        if let Some(prefix) = flags.get_value("prefix") {
            self.set("prefix", prefix)?;
        }
        if let Some(max_args) = flags.get_value("max-args") {
            self.set("max_args", max_args)?;
        }
        if flags.is_set("no-path") {
            self.path_search = false;
        }
        if flags.is_set("no-color") {
            self.color = false;
        }
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "prefix" => {
                if value.is_empty() {
                    return Err(ConfigError::invalid(key, value));
                }
                self.prefix = PathBuf::from(value);
            }
            "path_search" => self.path_search = parse_bool(key, value)?,
            "max_args" => {
                let max: usize = value.parse().map_err(|_| ConfigError::invalid(key, value))?;
                self.max_args = (max > 0).then_some(max);
            }
            "color" => self.color = parse_bool(key, value)?,
            "history" => self.history = parse_bool(key, value)?,
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                    line: None,
                })
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::invalid(key, value)),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ConfigFileNotFound(String),
    IoError(std::io::Error),
    Malformed(usize),
    UnknownKey {
        key: String,
        line: Option<usize>,
    },
    InvalidValue {
        key: String,
        value: String,
        line: Option<usize>,
    },
}

impl ConfigError {
    fn invalid(key: &str, value: &str) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            line: None,
        }
    }

    pub(crate) fn at_line(self, line_no: usize) -> Self {
        match self {
            ConfigError::UnknownKey { key, .. } => ConfigError::UnknownKey {
                key,
                line: Some(line_no),
            },
            ConfigError::InvalidValue { key, value, .. } => ConfigError::InvalidValue {
                key,
                value,
                line: Some(line_no),
            },
            other => other,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ConfigFileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::Malformed(line) => write!(f, "line {}: expected key = value", line),
            ConfigError::UnknownKey { key, line } => match line {
                Some(line) => write!(f, "line {}: unknown setting '{}'", line, key),
                None => write!(f, "unknown setting '{}'", key),
            },
            ConfigError::InvalidValue { key, value, line } => match line {
                Some(line) => write!(f, "line {}: invalid value '{}' for '{}'", line, value, key),
                None => write!(f, "invalid value '{}' for '{}'", value, key),
            },
        }
    }
}

impl std::error::Error for ConfigError {}

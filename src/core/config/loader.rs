use super::{paths::ConfigPaths, Config, ConfigError};
use std::fs;
use std::path::Path;

pub struct ConfigLoader<'a> {
    paths: &'a ConfigPaths,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(paths: &'a ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn load_configs(&self, config: &mut Config) -> Result<(), ConfigError> {
        let Some(path) = &self.paths.config_file else {
            return Ok(());
        };

        if self.paths.explicit && !path.exists() {
            return Err(ConfigError::ConfigFileNotFound(path.display().to_string()));
        }

        self.source_if_exists(path, config)
    }

    fn source_if_exists(&self, path: &Path, config: &mut Config) -> Result<(), ConfigError> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            self.process_str(&content, config)?;
        }
        Ok(())
    }

    pub(super) fn process_str(&self, content: &str, config: &mut Config) -> Result<(), ConfigError> {
        for (index, line) in content.lines().enumerate() {
            self.process_line(index + 1, line, config)?;
        }
        Ok(())
    }

    fn process_line(&self, line_no: usize, line: &str, config: &mut Config) -> Result<(), ConfigError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let (key, value) = line
            .split_once('=')
            .ok_or(ConfigError::Malformed(line_no))?;
        let key = key.trim();
        let mut value = value.trim();

        // Remove quotes if present
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }

        config.set(key, value).map_err(|e| e.at_line(line_no))
    }
}

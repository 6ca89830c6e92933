use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: Option<PathBuf>,
    /// Set when the file was named on the command line and has to exist.
    pub explicit: bool,
}

impl ConfigPaths {
    /// `$XDG_CONFIG_HOME/esh/config` or the platform equivalent.
    pub fn new() -> Self {
        ConfigPaths {
            config_file: dirs::config_dir().map(|dir| dir.join("esh").join("config")),
            explicit: false,
        }
    }

    pub fn with_file(path: impl AsRef<Path>) -> Self {
        ConfigPaths {
            config_file: Some(path.as_ref().to_path_buf()),
            explicit: true,
        }
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::new()
    }
}

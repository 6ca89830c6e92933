use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::core::env::Environment;

/// Directory tried when a name is not found on `PATH`.
pub const DEFAULT_PREFIX: &str = "/usr/bin";

/// Maps a command name to the executable that should run it.
#[derive(Debug, Clone)]
pub struct Resolver {
    prefix: PathBuf,
    search_path: bool,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, true)
    }
}

impl Resolver {
    pub fn new(prefix: impl Into<PathBuf>, search_path: bool) -> Self {
        Self {
            prefix: prefix.into(),
            search_path,
        }
    }

    /// Lookup order: names with a `/` as given, then each `PATH` entry of
    /// `env` (when enabled), then the fixed prefix.
    pub fn resolve(&self, name: &str, env: &Environment) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }

        if name.contains('/') {
            let path = Path::new(name);
            return is_executable(path).then(|| path.to_path_buf());
        }

        if self.search_path {
            if let Some(found) = env
                .get("PATH")
                .into_iter()
                .flat_map(std::env::split_paths)
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(|dir| dir.join(name))
                .find(|candidate| is_executable(candidate))
            {
                return Some(found);
            }
        }

        let candidate = self.prefix.join(name);
        is_executable(&candidate).then_some(candidate)
    }
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

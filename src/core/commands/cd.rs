use super::{Command, CommandError, Flow};
use std::env;
use std::fmt;
use std::io::{self, Write};

/// Why a directory change failed.
#[derive(Debug)]
pub enum CdErrorKind {
    NotADirectory,
    PermissionDenied,
    NameTooLong,
    NotFound,
    SymlinkLoop,
    Other(io::Error),
}

impl PartialEq for CdErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CdErrorKind::Other(a), CdErrorKind::Other(b)) => a.kind() == b.kind(),
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl From<io::Error> for CdErrorKind {
    fn from(err: io::Error) -> Self {
        match err.raw_os_error() {
            Some(libc::ENOTDIR) => CdErrorKind::NotADirectory,
            Some(libc::EACCES) => CdErrorKind::PermissionDenied,
            Some(libc::ENAMETOOLONG) => CdErrorKind::NameTooLong,
            Some(libc::ENOENT) => CdErrorKind::NotFound,
            Some(libc::ELOOP) => CdErrorKind::SymlinkLoop,
            _ => CdErrorKind::Other(err),
        }
    }
}

#[derive(Debug)]
pub struct CdError {
    path: String,
    kind: CdErrorKind,
}

impl CdError {
    pub fn new(path: impl Into<String>, err: io::Error) -> Self {
        Self {
            path: path.into(),
            kind: err.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &CdErrorKind {
        &self.kind
    }
}

impl fmt::Display for CdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CdErrorKind::NotADirectory => write!(f, "{} is not a directory.", self.path),
            CdErrorKind::PermissionDenied => write!(
                f,
                "The process does not have search permission for directory."
            ),
            CdErrorKind::NameTooLong => write!(f, "Directory name is too long."),
            CdErrorKind::NotFound => write!(f, "Directory does not exist."),
            CdErrorKind::SymlinkLoop => write!(
                f,
                "Too many symbolic links were resolved while trying to look up the directory."
            ),
            CdErrorKind::Other(e) => write!(f, "cd: {}: {}", self.path, e),
        }
    }
}

impl std::error::Error for CdError {}

#[derive(Clone, Default)]
pub struct CdCommand;

impl CdCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for CdCommand {
    /// No operand is an error, not a trip home.
    fn execute(&self, args: &[String], _out: &mut dyn Write) -> Result<Flow, CommandError> {
        let target = args.first().ok_or(CommandError::MissingOperand("cd"))?;

        env::set_current_dir(target).map_err(|e| CdError::new(target.as_str(), e))?;
        Ok(Flow::Continue)
    }
}

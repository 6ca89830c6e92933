use std::sync::Arc;

use super::{Launcher, ProcessError, Resolver, Shutdown, WaitStatus};
use crate::core::commands::CommandError;
use crate::core::env::Environment;
use crate::report::Reporter;
use crate::tokenizer::ArgVector;

/// Runs external commands one at a time: resolve, spawn, wait.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    resolver: Resolver,
    launcher: Launcher,
    env: Arc<Environment>,
    shutdown: Arc<Shutdown>,
    reporter: Reporter,
}

impl ProcessExecutor {
    pub fn new(
        resolver: Resolver,
        env: Arc<Environment>,
        shutdown: Arc<Shutdown>,
        reporter: Reporter,
    ) -> Self {
        Self {
            resolver,
            launcher: Launcher::new(),
            env,
            shutdown,
            reporter,
        }
    }

    /// Returns once the child has terminated. The child is tracked from
    /// before `fork` until it is reaped, so a shutdown request waits for it
    /// instead of abandoning it.
    pub fn spawn_process(&self, argv: &ArgVector) -> Result<WaitStatus, CommandError> {
        let name = argv.command().unwrap_or_default();
        let program = self
            .resolver
            .resolve(name, &self.env)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))?;
        self.reporter
            .debug(&format!("{} resolved to {}", name, program.display()));

        if !self.shutdown.begin_spawn() {
            return Err(ProcessError::Cancelled.into());
        }
        let child = match self.launcher.spawn(&program, argv, &self.env) {
            Ok(child) => child,
            Err(e) => {
                self.shutdown.untrack();
                return Err(e.into());
            }
        };
        self.shutdown.track(child.pid());
        self.reporter.debug(&format!("spawned pid {}", child.pid()));

        let status = child.wait();
        self.shutdown.untrack();
        let status = status?;

        self.report_status(name, status);
        Ok(status)
    }

    fn report_status(&self, name: &str, status: WaitStatus) {
        match status {
            WaitStatus::Exited(0) => {}
            WaitStatus::Exited(code) => {
                self.reporter
                    .debug(&format!("{} exited with status {}", name, code));
            }
            WaitStatus::Signaled(signal) => {
                if !self.reporter.is_quiet() {
                    self.reporter.error(&format!(
                        "esh: {}: terminated by signal {}",
                        name, signal
                    ));
                }
            }
            WaitStatus::Stopped(signal) => {
                self.reporter
                    .debug(&format!("{} stopped by signal {}", name, signal));
            }
            WaitStatus::Continued => {
                self.reporter.debug(&format!("{} continued", name));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn executor(prefix: &std::path::Path) -> ProcessExecutor {
        ProcessExecutor::new(
            Resolver::new(prefix, true),
            Arc::new(Environment::capture()),
            Shutdown::new(),
            Reporter::new(true, false, false),
        )
    }

    #[test]
    fn test_runs_to_completion() {
        let executor = executor(std::path::Path::new("/usr/bin"));
        let argv: ArgVector = ["true"].into_iter().collect();
        assert_eq!(executor.spawn_process(&argv).unwrap(), WaitStatus::Exited(0));

        let argv: ArgVector = ["false"].into_iter().collect();
        assert!(!executor.spawn_process(&argv).unwrap().success());
    }

    #[test]
    fn test_argv_reaches_child() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("argcount");
        fs::write(&script, "#!/bin/sh\ntest \"$#\" = 2 && test \"$2\" = b\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let executor = executor(dir.path());
        let argv: ArgVector = ["argcount", "a", "b"].into_iter().collect();
        assert_eq!(executor.spawn_process(&argv).unwrap(), WaitStatus::Exited(0));
    }

    #[test]
    fn test_not_found_is_user_error() {
        let executor = executor(std::path::Path::new("/nonexistent"));
        let argv: ArgVector = ["esh-no-such-command"].into_iter().collect();
        let result = executor.spawn_process(&argv);
        assert!(matches!(result, Err(CommandError::NotFound(ref name)) if name == "esh-no-such-command"));
        assert!(!result.unwrap_err().is_fatal());
    }

    #[test]
    fn test_untracks_after_wait() {
        let executor = executor(std::path::Path::new("/usr/bin"));
        let argv: ArgVector = ["true"].into_iter().collect();
        executor.spawn_process(&argv).unwrap();
        assert_eq!(executor.shutdown.outstanding(), None);
        assert!(executor.shutdown.begin_spawn());
    }

    #[test]
    fn test_failed_spawn_clears_marker() {
        let executor = executor(std::path::Path::new("/usr/bin"));
        let argv: ArgVector = ["true", "a\0b"].into_iter().collect();
        let result = executor.spawn_process(&argv);

        assert!(matches!(
            result,
            Err(CommandError::ProcessError(ProcessError::InvalidArgument(_)))
        ));
        assert!(executor.shutdown.begin_spawn());
    }
}

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use libc::{c_char, c_int, pid_t};

use super::ProcessError;
use crate::core::env::Environment;
use crate::tokenizer::ArgVector;

/// Status a child exits with when its program image could not be replaced.
pub const EXEC_FAILURE_STATUS: c_int = 127;

/// How a waited-for child changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    Exited(i32),
    Signaled(i32),
    Stopped(i32),
    Continued,
}

impl WaitStatus {
    pub fn from_raw(status: c_int) -> Self {
        if libc::WIFEXITED(status) {
            WaitStatus::Exited(libc::WEXITSTATUS(status))
        } else if libc::WIFSIGNALED(status) {
            WaitStatus::Signaled(libc::WTERMSIG(status))
        } else if libc::WIFSTOPPED(status) {
            WaitStatus::Stopped(libc::WSTOPSIG(status))
        } else {
            WaitStatus::Continued
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, WaitStatus::Exited(0))
    }

    /// Exited or killed, as opposed to a job-control state change.
    pub fn is_terminated(&self) -> bool {
        matches!(self, WaitStatus::Exited(_) | WaitStatus::Signaled(_))
    }
}

/// A spawned child that has not been waited for yet.
#[derive(Debug)]
pub struct ChildHandle {
    pid: pid_t,
}

impl ChildHandle {
    pub fn pid(&self) -> pid_t {
        self.pid
    }

    /// Blocks until the child terminates. Consumes the handle: a reaped pid
    /// may be recycled by the kernel.
    pub fn wait(self) -> Result<WaitStatus, ProcessError> {
        let mut status: c_int = 0;
        loop {
            let rc = unsafe { libc::waitpid(self.pid, &mut status, 0) };
            if rc == self.pid {
                return Ok(WaitStatus::from_raw(status));
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(ProcessError::Wait(err));
            }
        }
    }
}

/// Fork/exec front end. Everything the child needs is built before `fork`
/// so the child only calls `execve`, `write` and `_exit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Launcher;

impl Launcher {
    pub fn new() -> Self {
        Self
    }

    /// Starts `program` with `argv` (argv[0] included) and `env`, returning
    /// without waiting.
    pub fn spawn(
        &self,
        program: &Path,
        argv: &ArgVector,
        env: &Environment,
    ) -> Result<ChildHandle, ProcessError> {
        let path = CString::new(program.as_os_str().as_bytes())
            .map_err(|_| ProcessError::InvalidArgument(program.display().to_string()))?;
        let args = argv
            .iter()
            .map(|arg| {
                CString::new(arg).map_err(|_| ProcessError::InvalidArgument(arg.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let envp = env.to_envp();

        let arg_ptrs = null_terminated(&args);
        let env_ptrs = null_terminated(&envp);
        let failure = format!("esh: {}: could not execute\n", program.display());

        match unsafe { libc::fork() } {
            -1 => Err(ProcessError::Fork(io::Error::last_os_error())),
            0 => unsafe {
                libc::execve(path.as_ptr(), arg_ptrs.as_ptr(), env_ptrs.as_ptr());
                libc::write(
                    libc::STDERR_FILENO,
                    failure.as_ptr().cast(),
                    failure.len(),
                );
                libc::_exit(EXEC_FAILURE_STATUS)
            },
            pid => Ok(ChildHandle { pid }),
        }
    }
}

fn null_terminated(strings: &[CString]) -> Vec<*const c_char> {
    strings
        .iter()
        .map(|s| s.as_ptr())
        .chain(std::iter::once(ptr::null()))
        .collect()
}

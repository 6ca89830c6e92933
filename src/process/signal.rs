use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use std::thread;

use libc::{c_int, pid_t};
use signal_hook::consts::{SIGHUP, SIGTERM};
use signal_hook::iterator::Signals;

use crate::process::ProcessError;

const IDLE: pid_t = 0;
const SPAWNING: pid_t = -1;
const EXITING: pid_t = -2;

/// Shutdown request shared between the signal threads and the loop.
///
/// With no child outstanding a request exits right away. Otherwise the loop
/// reaps the child first and stops at its next suspension point. A spawn in
/// progress counts as outstanding so a request between `fork` and `track`
/// never strands the new child.
#[derive(Debug, Default)]
pub struct Shutdown {
    requested: AtomicBool,
    child: AtomicI32,
    pending: AtomicI32,
}

impl Shutdown {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers SIGINT through `ctrlc` and SIGTERM/SIGHUP through a
    /// `signal-hook` thread. Either half may fail independently.
    pub fn install(self: &Arc<Self>) -> Vec<ProcessError> {
        let mut errors = Vec::new();

        let shutdown = Arc::clone(self);
        if let Err(e) = ctrlc::set_handler(move || shutdown.request(None)) {
            errors.push(e.into());
        }

        match Signals::new([SIGTERM, SIGHUP]) {
            Ok(mut signals) => {
                let shutdown = Arc::clone(self);
                let spawned = thread::Builder::new()
                    .name("esh-signals".into())
                    .spawn(move || {
                        for signal in signals.forever() {
                            shutdown.request(Some(signal));
                        }
                    });
                if let Err(e) = spawned {
                    errors.push(ProcessError::SignalError(e.to_string()));
                }
            }
            Err(e) => errors.push(ProcessError::SignalError(e.to_string())),
        }

        errors
    }

    /// `forward` is sent on to an outstanding child. SIGINT is not forwarded
    /// since the terminal already delivers it to the foreground group.
    /// A signal arriving mid-spawn is held until `track` knows the pid.
    pub fn request(&self, forward: Option<c_int>) {
        self.requested.store(true, Ordering::SeqCst);

        if self
            .child
            .compare_exchange(IDLE, EXITING, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            std::process::exit(0);
        }

        if let Some(signal) = forward {
            self.pending.store(signal, Ordering::SeqCst);
            self.forward_pending();
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Marks a spawn as under way. Returns `false` if the process is already
    /// exiting, in which case nothing may be forked.
    pub fn begin_spawn(&self) -> bool {
        self.child
            .compare_exchange(IDLE, SPAWNING, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn track(&self, pid: pid_t) {
        self.child.store(pid, Ordering::SeqCst);
        self.forward_pending();
    }

    pub fn untrack(&self) {
        self.pending.store(0, Ordering::SeqCst);
        self.child.store(IDLE, Ordering::SeqCst);
    }

    pub fn outstanding(&self) -> Option<pid_t> {
        match self.child.load(Ordering::SeqCst) {
            pid if pid > 0 => Some(pid),
            _ => None,
        }
    }

    // Both `request` and `track` call this; the swap lets only one of them
    // deliver a given signal.
    fn forward_pending(&self) {
        let Some(pid) = self.outstanding() else {
            return;
        };
        let signal = self.pending.swap(0, Ordering::SeqCst);
        if signal != 0 {
            unsafe {
                libc::kill(pid, signal);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::env::Environment;
    use crate::process::{Launcher, Resolver, WaitStatus};
    use crate::tokenizer::ArgVector;

    #[test]
    fn test_tracking() {
        let shutdown = Shutdown::new();
        assert_eq!(shutdown.outstanding(), None);
        shutdown.track(1234);
        assert_eq!(shutdown.outstanding(), Some(1234));
        shutdown.untrack();
        assert_eq!(shutdown.outstanding(), None);
        assert!(!shutdown.is_requested());
    }

    #[test]
    fn test_request_with_child_forwards_and_defers() {
        let env = Environment::capture();
        let sleep = Resolver::default().resolve("sleep", &env).unwrap();
        let argv: ArgVector = ["sleep", "5"].into_iter().collect();
        let child = Launcher::new().spawn(&sleep, &argv, &env).unwrap();

        let shutdown = Shutdown::new();
        shutdown.track(child.pid());
        shutdown.request(Some(SIGTERM));

        assert!(shutdown.is_requested());
        assert_eq!(child.wait().unwrap(), WaitStatus::Signaled(SIGTERM));
        shutdown.untrack();
    }

    #[test]
    fn test_request_during_spawn_is_held_for_child() {
        let shutdown = Shutdown::new();
        assert!(shutdown.begin_spawn());
        assert_eq!(shutdown.outstanding(), None);

        // Returning at all means the request did not exit the process.
        shutdown.request(Some(SIGTERM));
        assert!(shutdown.is_requested());

        let env = Environment::capture();
        let sleep = Resolver::default().resolve("sleep", &env).unwrap();
        let argv: ArgVector = ["sleep", "5"].into_iter().collect();
        let child = Launcher::new().spawn(&sleep, &argv, &env).unwrap();
        shutdown.track(child.pid());

        assert_eq!(child.wait().unwrap(), WaitStatus::Signaled(SIGTERM));
        shutdown.untrack();
        assert!(shutdown.begin_spawn());
    }

    #[test]
    fn test_spawn_marker_is_not_a_pid() {
        let shutdown = Shutdown::new();
        assert!(shutdown.begin_spawn());
        assert!(!shutdown.begin_spawn());
        assert_eq!(shutdown.outstanding(), None);
        shutdown.untrack();
        assert_eq!(shutdown.outstanding(), None);
    }
}

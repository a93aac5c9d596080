// This file is part of tsh, a job-control shell.
// Copyright (C) 2026 The tsh contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Signal handling
//!
//! The shell catches [`HANDLED_SIGNALS`]. The signal-catching function only
//! records which signals arrived (see [`System::caught_signals`]). The
//! recorded signals are applied by [`run_pending_handlers`] when the shell is
//! in a safe state, that is, after waiting for input or for a foreground job
//! was interrupted.
//!
//! | Signal    | Action                                                  |
//! |-----------|---------------------------------------------------------|
//! | `SIGCHLD` | [Reap](reap_children) children and update the job list  |
//! | `SIGINT`  | Forward to the foreground job's process group           |
//! | `SIGTSTP` | Forward to the foreground job's process group           |
//! | `SIGQUIT` | Print a message and exit with status 1                  |

use crate::abort_with_system_error;
use std::ops::ControlFlow::{Break, Continue};
use tracing::debug;
use tsh_env::Env;
use tsh_env::System;
use tsh_env::job::JobState;
use tsh_env::job::Pid;
use tsh_env::job::fmt::{Event, Notice};
use tsh_env::semantics::{Divert, ExitStatus, Result};
use tsh_env::system::{Errno, SigSet, Signal, SignalHandling, WaitStatus, signal_set};

/// Signals the shell catches
pub const HANDLED_SIGNALS: [Signal; 4] = [
    Signal::SIGCHLD,
    Signal::SIGINT,
    Signal::SIGTSTP,
    Signal::SIGQUIT,
];

/// Returns a signal set containing [`HANDLED_SIGNALS`].
#[must_use]
pub fn handled_signal_set() -> SigSet {
    signal_set(HANDLED_SIGNALS)
}

/// Returns a copy of `mask` with [`HANDLED_SIGNALS`] removed.
///
/// This is the mask to apply while waiting for a signal.
#[must_use]
pub fn unblocking_handled_signals(mask: &SigSet) -> SigSet {
    let mut mask = *mask;
    for signal in HANDLED_SIGNALS {
        mask.remove(signal);
    }
    mask
}

/// Sets the signal handling for [`HANDLED_SIGNALS`] to catch.
///
/// Failure is fatal and reported as `Signal error`.
pub fn install_signal_handlers<S: System>(env: &mut Env<S>) -> Result {
    for signal in HANDLED_SIGNALS {
        if let Err(errno) = env.system.sigaction(signal, SignalHandling::Catch) {
            return abort_with_system_error(env, errno, "Signal error");
        }
    }
    Continue(())
}

/// Applies the signals caught since the last call.
///
/// Returns `Break(_)` if the shell should exit.
pub fn run_pending_handlers<S: System>(env: &mut Env<S>) -> Result {
    for signal in env.system.caught_signals() {
        match signal {
            Signal::SIGCHLD => reap_children(env)?,
            Signal::SIGINT | Signal::SIGTSTP => forward_to_foreground(env, signal)?,
            Signal::SIGQUIT => {
                env.print("Terminating after receipt of SIGQUIT signal\n");
                return Break(Divert::Exit(Some(ExitStatus::FAILURE)));
            }
            _ => debug!(?signal, "ignoring unexpected signal"),
        }
    }
    Continue(())
}

/// Collects all children whose state has changed.
///
/// This function does not block. Each change is applied to the job list:
///
/// - A stopped job becomes [`JobState::Stopped`] and a notice is printed.
/// - A job terminated by a signal is removed with a notice.
/// - A job that exited is removed silently.
///
/// Children that are not in the job list are reaped and otherwise ignored.
pub fn reap_children<S: System>(env: &mut Env<S>) -> Result {
    loop {
        let status = match env.system.wait(Pid::from_raw(-1)) {
            Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => return Continue(()),
            Err(Errno::EINTR) => continue,
            Err(errno) => return abort_with_system_error(env, errno, "waitpid error"),
            Ok(status) => status,
        };
        debug!(?status, "reaped child");

        let notice = match status {
            WaitStatus::Exited(pid, _) => {
                if env.jobs.delete(pid).is_none() {
                    debug!(%pid, "untracked child exited");
                }
                None
            }
            WaitStatus::Signaled(pid, signal, _) => {
                env.jobs.delete(pid).map(|job| Notice {
                    job_id: job.job_id,
                    pid,
                    event: Event::Terminated(signal),
                })
            }
            WaitStatus::Stopped(pid, signal) => {
                match env.jobs.set_state(pid, JobState::Stopped) {
                    Ok(_) => env.jobs.get_by_pid(pid).map(|job| Notice {
                        job_id: job.job_id,
                        pid,
                        event: Event::Stopped(signal),
                    }),
                    Err(error) => {
                        debug!(%error, "untracked child stopped");
                        None
                    }
                }
            }
            _ => None,
        };

        if let Some(notice) = notice {
            env.print(&notice.to_string());
        }
    }
}

/// Sends `signal` to the process group of the foreground job.
///
/// Does nothing if there is no foreground job. The job list is not updated
/// here; a stopped job is recorded when [`reap_children`] sees it stopped.
fn forward_to_foreground<S: System>(env: &mut Env<S>, signal: Signal) -> Result {
    let Some(pid) = env.jobs.foreground_pid() else {
        return Continue(());
    };
    debug!(?signal, pgid = %pid, "forwarding signal");
    match env.system.kill(Pid::from_raw(-pid.as_raw()), Some(signal)) {
        // The job may have exited but not yet been reaped.
        Ok(()) | Err(Errno::ESRCH) => Continue(()),
        Err(errno) => abort_with_system_error(env, errno, "kill error"),
    }
}

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

//! Waiting for the foreground job

use crate::abort_with_system_error;
use crate::trap::{handled_signal_set, run_pending_handlers, unblocking_handled_signals};
use std::ops::ControlFlow::Continue;
use tsh_env::Env;
use tsh_env::System;
use tsh_env::job::Pid;
use tsh_env::semantics::Result;
use tsh_env::system::{Errno, SigSet, SigmaskHow};

/// Waits until the job with the given process ID is no longer in the
/// foreground.
///
/// The job leaves the foreground when it stops or terminates. The signal
/// handlers notice it and update the job list, so this function just applies
/// caught signals and checks the job list until the condition holds, sleeping
/// in [`System::sigsuspend`] in between.
///
/// The handled signals are blocked during the wait except inside
/// `sigsuspend`, so a signal cannot slip in between the check and the sleep.
pub fn wait_for_foreground<S: System>(env: &mut Env<S>, pid: Pid) -> Result {
    let mut old_mask = SigSet::empty();
    let handled = handled_signal_set();
    if let Err(errno) = env
        .system
        .sigmask(SigmaskHow::SIG_BLOCK, Some(&handled), Some(&mut old_mask))
    {
        return abort_with_system_error(env, errno, "sigprocmask error");
    }

    let result = wait_loop(env, pid, &unblocking_handled_signals(&old_mask));

    if let Err(errno) = env
        .system
        .sigmask(SigmaskHow::SIG_SETMASK, Some(&old_mask), None)
    {
        result?;
        return abort_with_system_error(env, errno, "sigprocmask error");
    }
    result
}

fn wait_loop<S: System>(env: &mut Env<S>, pid: Pid, suspend_mask: &SigSet) -> Result {
    loop {
        run_pending_handlers(env)?;
        if env.jobs.foreground_pid() != Some(pid) {
            return Continue(());
        }
        match env.system.sigsuspend(suspend_mask) {
            Ok(()) | Err(Errno::EINTR) => (),
            Err(errno) => return abort_with_system_error(env, errno, "sigsuspend error"),
        }
    }
}

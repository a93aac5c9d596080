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

//! Common items for implementing built-ins.

pub mod target;

use std::ops::ControlFlow::{Break, Continue};
use tsh_env::Env;
use tsh_env::System;
use tsh_env::job::Pid;
use tsh_env::semantics::{Divert, ExitStatus};
use tsh_env::system::{Errno, Signal};

/// Prints a failure message to the standard output.
///
/// A newline is appended to the message. Returns a result with
/// [`ExitStatus::FAILURE`].
pub fn report_failure<S: System, M: std::fmt::Display + ?Sized>(
    env: &mut Env<S>,
    message: &M,
) -> crate::Result {
    env.print(&format!("{message}\n"));
    (ExitStatus::FAILURE, None)
}

/// Converts the result of a command execution to the result of a built-in.
///
/// A `Break` keeps its divert with the exit status it carries, or
/// `env.exit_status` if it has none.
pub fn from_semantics_result<S>(env: &Env<S>, result: tsh_env::semantics::Result) -> crate::Result {
    match result {
        Continue(()) => (ExitStatus::SUCCESS, None),
        Break(divert) => (divert.exit_status().unwrap_or(env.exit_status), Some(divert)),
    }
}

/// Sends `SIGCONT` to the process group of the job.
///
/// A process group that no longer exists is not an error because the job may
/// have terminated without having been reaped yet. Other errors are fatal.
pub fn continue_job<S: System>(env: &mut Env<S>, pid: Pid) -> crate::Result {
    match env
        .system
        .kill(Pid::from_raw(-pid.as_raw()), Some(Signal::SIGCONT))
    {
        Ok(()) | Err(Errno::ESRCH) => (ExitStatus::SUCCESS, None),
        Err(errno) => {
            let result = tsh_semantics::abort_with_system_error::<S, ()>(env, errno, "kill error");
            from_semantics_result(env, result)
        }
    }
}

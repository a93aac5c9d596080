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

//! Starting external programs as jobs

use crate::abort_with_system_error;
use crate::trap::HANDLED_SIGNALS;
use crate::wait::wait_for_foreground;
use std::ffi::CString;
use std::ops::ControlFlow::Continue;
use tracing::warn;
use tsh_env::Env;
use tsh_env::System;
use tsh_env::job::fmt::Report;
use tsh_env::job::{JobState, Pid};
use tsh_env::semantics::{ExitStatus, Result};
use tsh_env::subshell::Subshell;
use tsh_env::system::{SigSet, SigmaskHow, Signal, signal_set};
use tsh_syntax::CommandLine;

/// Starts an external program as a new job.
///
/// The program runs in a child process that is the leader of a new process
/// group. `SIGCHLD` is blocked from before the child is created until it is
/// added to the job list, so the child cannot be reaped before it is known.
///
/// A background job is announced with a `[jid] (pid) command` line and this
/// function returns at once. For a foreground job, this function [waits until
/// the job stops or terminates](wait_for_foreground).
///
/// `line` is the command line as entered, which becomes the job's command
/// line.
///
/// If the job list is full, the child is killed and a message is printed.
pub fn start_job<S: System + 'static>(
    env: &mut Env<S>,
    command_line: CommandLine,
    line: &str,
) -> Result {
    let state = if command_line.background {
        JobState::Background
    } else {
        JobState::Foreground
    };
    let args = to_c_strings(command_line.args);

    let sigchld = signal_set([Signal::SIGCHLD]);
    let mut old_mask = SigSet::empty();
    if let Err(errno) = env
        .system
        .sigmask(SigmaskHow::SIG_BLOCK, Some(&sigchld), Some(&mut old_mask))
    {
        return abort_with_system_error(env, errno, "sigprocmask error");
    }

    let subshell = Subshell::new(move |env: &mut Env<S>| {
        replace_current_process(env, args);
        Continue(())
    })
    .new_process_group(true);
    let pid = match subshell.start(env) {
        Ok(pid) => pid,
        Err(errno) => return abort_with_system_error(env, errno, "fork error"),
    };

    let added = env.jobs.add(pid, state, line);
    if let Err(error) = &added {
        env.print(&format!("{error}\n"));
        warn!(%pid, "killing child that could not be added to the job list");
        let _ = env.system.kill(Pid::from_raw(-pid.as_raw()), Some(Signal::SIGKILL));
    }

    if let Err(errno) = env
        .system
        .sigmask(SigmaskHow::SIG_SETMASK, Some(&old_mask), None)
    {
        return abort_with_system_error(env, errno, "sigprocmask error");
    }

    let Ok(job_id) = added else {
        env.exit_status = ExitStatus::FAILURE;
        return Continue(());
    };

    env.exit_status = ExitStatus::SUCCESS;
    match state {
        JobState::Foreground => wait_for_foreground(env, pid),
        JobState::Background | JobState::Stopped => {
            if let Some(job) = env.jobs.get_by_job_id(job_id) {
                let report = Report::new(job).to_string();
                env.print(&report);
            }
            Continue(())
        }
    }
}

/// Converts arguments to C strings.
///
/// An argument containing a null byte is cut at the first one, which is how
/// the program would see it as a C string anyway.
pub fn to_c_strings(args: Vec<String>) -> Vec<CString> {
    args.into_iter()
        .map(|arg| {
            CString::new(arg).unwrap_or_else(|error| {
                let nul_position = error.nul_position();
                let mut bytes = error.into_vec();
                bytes.truncate(nul_position);
                CString::new(bytes).unwrap_or_default()
            })
        })
        .collect()
}

/// Substitutes the current child process with the external program.
///
/// This function unblocks the signals the shell handles and calls
/// [`System::execvp`]. If the call fails, it prints `<name>: Command not
/// found` and sets the exit status to zero, in which case the caller should
/// let the child process exit.
pub fn replace_current_process<S: System>(env: &mut Env<S>, args: Vec<CString>) {
    let handled = signal_set(HANDLED_SIGNALS);
    let _ = env
        .system
        .sigmask(SigmaskHow::SIG_UNBLOCK, Some(&handled), None);

    if let Some(file) = args.first() {
        let _ = env.system.execvp(file, &args);
        let name = file.to_string_lossy();
        env.print(&format!("{name}: Command not found\n"));
    }
    env.exit_status = ExitStatus::SUCCESS;
}

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

//! Bg built-in
//!
//! The `bg` built-in resumes a job in the background.
//!
//! # Synopsis
//!
//! ```sh
//! bg pid
//! bg %job_id
//! ```
//!
//! # Semantics
//!
//! The built-in marks the job as running in the background, prints a line of
//! the form `[job_id] (pid) command`, and sends `SIGCONT` to the job's process
//! group. The signal is sent even if the job is already running.
//!
//! # Errors
//!
//! If the operand is missing, malformed, or does not match a job, the
//! built-in prints a message and returns a non-zero exit status without
//! changing anything.

use crate::common::target::find_target;
use crate::common::{continue_job, report_failure};
use tracing::debug;
use tsh_env::Env;
use tsh_env::System;
use tsh_env::job::JobState;
use tsh_env::job::fmt::Report;

/// Entry point of the `bg` built-in
pub fn main<S: System>(env: &mut Env<S>, args: Vec<String>) -> crate::Result {
    let (job_id, pid) = match find_target(&env.jobs, &args) {
        Ok(job) => (job.job_id, job.pid),
        Err(error) => return report_failure(env, &error),
    };
    debug!(job_id, %pid, "resuming job in the background");

    if let Err(error) = env.jobs.set_state(pid, JobState::Background) {
        return report_failure(env, &error);
    }
    if let Some(job) = env.jobs.get_by_pid(pid) {
        let report = Report::new(job).to_string();
        env.print(&report);
    }

    continue_job(env, pid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsh_env::job::Pid;
    use tsh_env::semantics::ExitStatus;
    use tsh_env::system::Signal;
    use tsh_env::system::r#virtual::{Process, ProcessState};
    use tsh_env_test_helper::{assert_stdout, in_virtual_system};

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn resumes_stopped_job() {
        in_virtual_system(|mut env, state| {
            let pid = Pid::from_raw(10);
            let mut process = Process::with_parent_and_group(env.system.process_id, pid);
            let _ = process.raise_signal(Signal::SIGTSTP);
            state.borrow_mut().processes.insert(pid, process);
            env.jobs.add(pid, JobState::Stopped, "sleep 50 &\n").unwrap();

            let result = main(&mut env, args(&["bg", "%1"]));
            assert_eq!(result, (ExitStatus::SUCCESS, None));
            assert_eq!(env.jobs.get_by_pid(pid).unwrap().state, JobState::Background);
            assert_eq!(state.borrow().processes[&pid].state(), ProcessState::Running);
            assert_stdout(&state, |stdout| assert_eq!(stdout, "[1] (10) sleep 50 &\n"));
        })
    }

    #[test]
    fn job_by_process_id() {
        in_virtual_system(|mut env, state| {
            env.jobs
                .add(Pid::from_raw(7), JobState::Stopped, "a\n")
                .unwrap();
            env.jobs
                .add(Pid::from_raw(8), JobState::Stopped, "b\n")
                .unwrap();

            let result = main(&mut env, args(&["bg", "8"]));
            assert_eq!(result, (ExitStatus::SUCCESS, None));
            assert_eq!(
                env.jobs.get_by_pid(Pid::from_raw(7)).unwrap().state,
                JobState::Stopped
            );
            assert_stdout(&state, |stdout| assert_eq!(stdout, "[2] (8) b\n"));
        })
    }

    #[test]
    fn missing_operand() {
        in_virtual_system(|mut env, state| {
            let result = main(&mut env, args(&["bg"]));
            assert_eq!(result, (ExitStatus::FAILURE, None));
            assert_stdout(&state, |stdout| {
                assert_eq!(stdout, "bg command requires PID or %jobid argument\n")
            });
        })
    }

    #[test]
    fn malformed_operand() {
        in_virtual_system(|mut env, state| {
            let result = main(&mut env, args(&["bg", "x1"]));
            assert_eq!(result, (ExitStatus::FAILURE, None));
            assert_stdout(&state, |stdout| {
                assert_eq!(stdout, "bg: argument must be a PID or %jobid\n")
            });
        })
    }

    #[test]
    fn no_such_process_leaves_jobs_unchanged() {
        in_virtual_system(|mut env, state| {
            env.jobs
                .add(Pid::from_raw(7), JobState::Stopped, "a\n")
                .unwrap();
            let result = main(&mut env, args(&["bg", "9999"]));
            assert_eq!(result, (ExitStatus::FAILURE, None));
            assert_eq!(
                env.jobs.get_by_pid(Pid::from_raw(7)).unwrap().state,
                JobState::Stopped
            );
            assert_stdout(&state, |stdout| {
                assert_eq!(stdout, "(9999): No such process\n")
            });
        })
    }

    #[test]
    fn no_such_job() {
        in_virtual_system(|mut env, state| {
            let result = main(&mut env, args(&["bg", "%4"]));
            assert_eq!(result, (ExitStatus::FAILURE, None));
            assert_stdout(&state, |stdout| assert_eq!(stdout, "%4: No such job\n"));
        })
    }
}

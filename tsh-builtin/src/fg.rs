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

//! Fg built-in
//!
//! The `fg` built-in resumes a job in the foreground.
//!
//! # Synopsis
//!
//! ```sh
//! fg pid
//! fg %job_id
//! ```
//!
//! # Semantics
//!
//! The built-in marks the job as the foreground job, sends `SIGCONT` to the
//! job's process group, and waits until the job stops or terminates. Operand
//! errors are reported as in the [`bg`](crate::bg) built-in.

use crate::common::target::find_target;
use crate::common::{continue_job, from_semantics_result, report_failure};
use tracing::debug;
use tsh_env::Env;
use tsh_env::System;
use tsh_env::job::JobState;
use tsh_semantics::wait::wait_for_foreground;

/// Entry point of the `fg` built-in
pub fn main<S: System>(env: &mut Env<S>, args: Vec<String>) -> crate::Result {
    let (job_id, pid) = match find_target(&env.jobs, &args) {
        Ok(job) => (job.job_id, job.pid),
        Err(error) => return report_failure(env, &error),
    };
    debug!(job_id, %pid, "resuming job in the foreground");

    if let Err(error) = env.jobs.set_state(pid, JobState::Foreground) {
        return report_failure(env, &error);
    }

    let result = continue_job(env, pid);
    if result.1.is_some() {
        return result;
    }

    let result = wait_for_foreground(env, pid);
    from_semantics_result(env, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::target::TargetError;
    use std::cell::RefCell;
    use tsh_env::VirtualSystem;
    use tsh_env::job::Pid;
    use tsh_env::semantics::ExitStatus;
    use tsh_env::system::Signal;
    use tsh_env::system::r#virtual::{Process, ProcessState, SystemState};
    use tsh_env_test_helper::{assert_stdout, in_virtual_system};
    use tsh_semantics::trap::install_signal_handlers;

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    fn stopped_job(state: &RefCell<SystemState>, env: &mut Env<VirtualSystem>) -> Pid {
        let _ = install_signal_handlers(env);
        let pid = Pid::from_raw(10);
        let mut process = Process::with_parent_and_group(env.system.process_id, pid);
        let _ = process.raise_signal(Signal::SIGTSTP);
        state.borrow_mut().processes.insert(pid, process);
        env.jobs.add(pid, JobState::Stopped, "vi\n").unwrap();
        pid
    }

    #[test]
    fn resumes_and_waits_until_exit() {
        in_virtual_system(|mut env, state| {
            let pid = stopped_job(&state, &mut env);
            state
                .borrow_mut()
                .schedule(move |state| state.exit_process(pid, ExitStatus(0)));

            let result = main(&mut env, args(&["fg", "%1"]));
            assert_eq!(result, (ExitStatus::SUCCESS, None));
            assert!(env.jobs.is_empty());
            assert!(state.borrow().events.0.is_empty());
            assert_stdout(&state, |stdout| assert_eq!(stdout, ""));
        })
    }

    #[test]
    fn resumes_and_waits_until_stopped_again() {
        in_virtual_system(|mut env, state| {
            let pid = stopped_job(&state, &mut env);
            state.borrow_mut().schedule(move |state| {
                assert_eq!(state.processes[&pid].state(), ProcessState::Running);
                let _ = state.signal_process(pid, Some(Signal::SIGTSTP));
            });

            let result = main(&mut env, args(&["fg", "10"]));
            assert_eq!(result, (ExitStatus::SUCCESS, None));
            assert_eq!(env.jobs.get_by_pid(pid).unwrap().state, JobState::Stopped);
            assert_stdout(&state, |stdout| {
                assert_eq!(stdout, "Job [1] (10) stopped by signal SIGTSTP\n")
            });
        })
    }

    #[test]
    fn background_job_brought_to_foreground() {
        in_virtual_system(|mut env, state| {
            let _ = install_signal_handlers(&mut env);
            let pid = Pid::from_raw(10);
            let process = Process::with_parent_and_group(env.system.process_id, pid);
            state.borrow_mut().processes.insert(pid, process);
            env.jobs.add(pid, JobState::Background, "sleep 9 &\n").unwrap();
            state.borrow_mut().schedule(move |state| {
                let _ = state.signal_process(pid, Some(Signal::SIGINT));
            });

            let result = main(&mut env, args(&["fg", "%1"]));
            assert_eq!(result, (ExitStatus::SUCCESS, None));
            assert!(env.jobs.is_empty());
            assert_stdout(&state, |stdout| {
                assert_eq!(stdout, "Job [1] (10) terminated by signal SIGINT\n")
            });
        })
    }

    #[test]
    fn operand_errors() {
        in_virtual_system(|mut env, state| {
            assert_eq!(main(&mut env, args(&["fg"])), (ExitStatus::FAILURE, None));
            assert_eq!(main(&mut env, args(&["fg", "%x"])), (ExitStatus::FAILURE, None));
            assert_eq!(main(&mut env, args(&["fg", "1a"])), (ExitStatus::FAILURE, None));
            let expected = format!(
                "{}\n{}\n{}\n",
                TargetError::Missing("fg".to_string()),
                "%x: No such job",
                "fg: argument must be a PID or %jobid",
            );
            assert_stdout(&state, |stdout| assert_eq!(stdout, expected));
        })
    }
}

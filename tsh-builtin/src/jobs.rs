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

//! Jobs built-in
//!
//! The `jobs` built-in prints a line for each job in the job list, in the
//! order of the slots of the list:
//!
//! ```text
//! [1] (12345) Running sleep 100 &
//! [2] (12350) Stopped vi
//! ```
//!
//! Operands are ignored.

use tsh_env::Env;
use tsh_env::System;
use tsh_env::semantics::ExitStatus;

/// Entry point of the `jobs` built-in
pub fn main<S: System>(env: &mut Env<S>, _args: Vec<String>) -> crate::Result {
    let list: String = env.jobs.list().map(|report| format!("{report:#}")).collect();
    env.print(&list);
    (ExitStatus::SUCCESS, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsh_env::job::{JobState, Pid};
    use tsh_env_test_helper::{assert_stdout, in_virtual_system};

    #[test]
    fn empty_list() {
        in_virtual_system(|mut env, state| {
            let result = main(&mut env, vec!["jobs".to_string()]);
            assert_eq!(result, (ExitStatus::SUCCESS, None));
            assert_stdout(&state, |stdout| assert_eq!(stdout, ""));
        })
    }

    #[test]
    fn jobs_in_slot_order() {
        in_virtual_system(|mut env, state| {
            env.jobs
                .add(Pid::from_raw(10), JobState::Background, "sleep 100 &\n")
                .unwrap();
            env.jobs
                .add(Pid::from_raw(20), JobState::Stopped, "vi\n")
                .unwrap();
            env.jobs.delete(Pid::from_raw(10));
            env.jobs
                .add(Pid::from_raw(30), JobState::Background, "cat &\n")
                .unwrap();

            let result = main(&mut env, vec!["jobs".to_string()]);
            assert_eq!(result, (ExitStatus::SUCCESS, None));
            assert_stdout(&state, |stdout| {
                assert_eq!(stdout, "[3] (30) Running cat &\n[2] (20) Stopped vi\n")
            });
        })
    }
}

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

//! Quit built-in
//!
//! The `quit` built-in exits the shell with exit status zero. Jobs are left
//! as they are.

use tsh_env::Env;
use tsh_env::System;
use tsh_env::semantics::{Divert, ExitStatus};

/// Entry point of the `quit` built-in
pub fn main<S: System>(_env: &mut Env<S>, _args: Vec<String>) -> crate::Result {
    (ExitStatus::SUCCESS, Some(Divert::Exit(None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsh_env::job::{JobState, Pid};
    use tsh_env_test_helper::in_virtual_system;

    #[test]
    fn quit_exits_with_zero() {
        in_virtual_system(|mut env, _state| {
            env.jobs
                .add(Pid::from_raw(10), JobState::Background, "sleep 1 &\n")
                .unwrap();
            let result = main(&mut env, vec!["quit".to_string()]);
            assert_eq!(result, (ExitStatus::SUCCESS, Some(Divert::Exit(None))));
            assert_eq!(env.jobs.len(), 1);
        })
    }
}

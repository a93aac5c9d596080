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

//! Job-control semantics of the tsh shell.
//!
//! This crate implements what the shell does with a command line:
//!
//! - [`command::execute`] tokenizes a line and runs a built-in or starts an
//!   external program as a new job.
//! - [`wait::wait_for_foreground`] blocks until a job leaves the foreground.
//! - [`trap`] installs the signal handlers and applies the signals they
//!   record.
//! - [`read_eval_loop`] ties them together, reading lines from the standard
//!   input until the end of input or a [`Divert`].

pub mod command;
pub mod trap;
pub mod wait;

#[doc(no_inline)]
pub use tsh_env::semantics::*;

mod runner;
pub use runner::read_eval_loop;

use std::ops::ControlFlow::Break;
use tsh_env::Env;
use tsh_env::System;
use tsh_env::system::Errno;

/// Reports a failed system call and aborts the shell.
///
/// This function prints `<context>: <description of errno>` and returns
/// `Break(Divert::Abort(Some(ExitStatus::FAILURE)))`, which the caller
/// propagates to the top level.
pub fn abort_with_system_error<S: System, T>(
    env: &mut Env<S>,
    errno: Errno,
    context: &str,
) -> Result<T> {
    env.print_system_error(errno, context);
    Break(Divert::Abort(Some(ExitStatus::FAILURE)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsh_env_test_helper::{assert_stderr, in_virtual_system};

    #[test]
    fn abort_with_system_error_prints_and_aborts() {
        in_virtual_system(|mut env, state| {
            let result: Result<()> =
                abort_with_system_error(&mut env, Errno::EAGAIN, "fork error");
            assert_eq!(result, Break(Divert::Abort(Some(ExitStatus::FAILURE))));
            assert_stderr(&state, |stderr| {
                assert_eq!(stderr, "fork error: Resource temporarily unavailable\n")
            });
        })
    }
}

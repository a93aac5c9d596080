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

//! This crate contains utility functions for use in tests that interact with
//! the shell environment ([`tsh_env::Env`]).

use std::cell::RefCell;
use std::rc::Rc;
use std::str::from_utf8;
use tsh_env::Env;
use tsh_env::system::r#virtual::{SystemState, VirtualSystem};

/// Runs a function in a virtual system.
///
/// This function creates a [`VirtualSystem`] and calls `f` with an [`Env`]
/// using the virtual system and a shared reference to the system state. The
/// system state can be used to interact with the virtual system, e.g. to feed
/// the standard input or schedule events that change process states.
pub fn in_virtual_system<F, T>(f: F) -> T
where
    F: FnOnce(Env<VirtualSystem>, Rc<RefCell<SystemState>>) -> T,
{
    let system = VirtualSystem::new();
    let state = Rc::clone(&system.state);
    let env = Env::with_system(system);
    f(env, state)
}

/// Registers a command that `execvp` can find in the virtual system.
///
/// A child process that executes the command keeps running until it receives
/// a terminating signal or a scheduled event ends it.
pub fn stub_executable(state: &RefCell<SystemState>, name: &str) {
    state.borrow_mut().executables.insert(name.to_owned());
}

/// Helper function for asserting on the content of the standard output
///
/// The argument function `f` is called with the content written to the
/// standard output so far as a string slice.
///
/// This function panics if the output is not a valid UTF-8 string.
///
/// # Example
///
/// ```
/// # use std::rc::Rc;
/// # use tsh_env::Env;
/// # use tsh_env::io::Fd;
/// # use tsh_env::system::System;
/// # use tsh_env::system::r#virtual::VirtualSystem;
/// # use tsh_env_test_helper::assert_stdout;
/// let system = VirtualSystem::new();
/// let state = Rc::clone(&system.state);
/// let mut env = Env::with_system(system);
/// env.system.write(Fd::STDOUT, b"tsh> ").unwrap();
/// assert_stdout(&state, |stdout| assert_eq!(stdout, "tsh> "));
/// ```
pub fn assert_stdout<F, T>(state: &RefCell<SystemState>, f: F) -> T
where
    F: FnOnce(&str) -> T,
{
    let state = state.borrow();
    f(from_utf8(&state.stdout).unwrap())
}

/// Helper function for asserting on the content of the standard error
///
/// This function is analogous to [`assert_stdout`]. See its documentation for
/// an example.
pub fn assert_stderr<F, T>(state: &RefCell<SystemState>, f: F) -> T
where
    F: FnOnce(&str) -> T,
{
    let state = state.borrow();
    f(from_utf8(&state.stderr).unwrap())
}

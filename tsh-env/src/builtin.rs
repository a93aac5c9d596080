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

//! Type definitions for built-in commands.
//!
//! Note that concrete implementations of built-ins are not included in the
//! `tsh_env` crate. For `bg`, `fg`, `jobs`, and `quit`, see the `tsh_builtin`
//! crate.
//!
//! A built-in runs in the shell process itself. It receives the command name
//! and operands as a vector of strings and returns an exit status, optionally
//! with a [`Divert`] that makes the shell stop reading commands.

use crate::Env;
use crate::semantics::Divert;
use crate::semantics::ExitStatus;
use std::fmt::Debug;

/// Result of built-in execution.
pub type Result = (ExitStatus, Option<Divert>);

/// Type of functions that implement the behavior of a built-in.
///
/// The first element of the vector is the command name.
pub type Main<S> = fn(&mut Env<S>, Vec<String>) -> Result;

/// Built-in definition.
pub struct Builtin<S> {
    /// Function that implements the behavior of the built-in.
    pub execute: Main<S>,
}

impl<S> Builtin<S> {
    /// Creates a built-in definition.
    #[must_use]
    pub const fn new(execute: Main<S>) -> Self {
        Builtin { execute }
    }
}

// Not derived to avoid requiring `S: Clone`.
impl<S> Clone for Builtin<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Builtin<S> {}

impl<S> Debug for Builtin<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").finish_non_exhaustive()
    }
}

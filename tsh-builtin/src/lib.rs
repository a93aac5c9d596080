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

//! Implementation of the built-ins of the tsh shell.
//!
//! The shell has four built-ins:
//!
//! - [`bg`] resumes a job in the background.
//! - [`fg`] resumes a job in the foreground and waits for it.
//! - [`jobs`] lists the jobs.
//! - [`quit`] exits the shell.
//!
//! Call [`builtins`] to get the table to install in
//! [`Env::builtins`](tsh_env::Env::builtins).

pub mod bg;
pub mod common;
pub mod fg;
pub mod jobs;
pub mod quit;

#[doc(no_inline)]
pub use tsh_env::builtin::*;

use tsh_env::System;

/// Returns all the implemented built-ins.
///
/// The array items are ordered alphabetically.
#[must_use]
pub fn builtins<S: System + 'static>() -> [(&'static str, Builtin<S>); 4] {
    [
        ("bg", Builtin::new(bg::main)),
        ("fg", Builtin::new(fg::main)),
        ("jobs", Builtin::new(jobs::main)),
        ("quit", Builtin::new(quit::main)),
    ]
}

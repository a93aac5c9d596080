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

//! This crate defines the shell execution environment.
//!
//! A shell execution environment, [`Env`], is a collection of data that may
//! affect or be affected by the execution of commands. The environment consists
//! of application-managed parts and system-managed parts. Application-managed
//! parts like the [job list](job::JobList) and [built-ins](builtin) are
//! implemented in pure Rust in this crate. System-managed parts like processes
//! and signal dispositions depend on the underlying system and are only
//! accessible through the [`System`] interface.
//!
//! [`RealSystem`] provides an implementation for `System` that interacts with
//! the underlying system. [`VirtualSystem`] is a dummy for simulating the
//! system's behavior without affecting the actual system.

pub mod builtin;
pub mod input;
pub mod io;
pub mod job;
pub mod option;
pub mod semantics;
pub mod subshell;
pub mod system;

use self::builtin::Builtin;
use self::io::Fd;
use self::job::JobList;
use self::option::Options;
use self::semantics::ExitStatus;
use self::system::Errno;
use self::system::SystemEx;
use std::collections::HashMap;
use std::fmt::Debug;

pub use self::system::System;
pub use self::system::real::RealSystem;
pub use self::system::r#virtual::VirtualSystem;

/// Whole shell execution environment.
///
/// The shell execution environment consists of application-managed parts and
/// system-managed parts. Application-managed parts are directly implemented in
/// the `Env` instance. System-managed parts are managed by an instance of
/// [`System`] contained in the `system` field.
///
/// The type parameter `S` is the type of the system. The shell uses
/// [`RealSystem`]; tests use [`VirtualSystem`].
#[derive(Clone, Debug)]
pub struct Env<S> {
    /// Built-in utilities available in the environment.
    pub builtins: HashMap<&'static str, Builtin<S>>,

    /// Exit status of the last executed command.
    pub exit_status: ExitStatus,

    /// Jobs managed in the environment.
    pub jobs: JobList,

    /// Shell options.
    pub options: Options,

    /// Interface to the system-managed parts of the environment.
    pub system: S,
}

impl<S: System> Env<S> {
    /// Creates a new environment with the given system.
    ///
    /// Members of the new environments other than `system` are
    /// default-initialized.
    #[must_use]
    pub fn with_system(system: S) -> Env<S> {
        Env {
            builtins: HashMap::new(),
            exit_status: ExitStatus::default(),
            jobs: JobList::new(),
            options: Options::default(),
            system,
        }
    }

    /// Clones this environment.
    ///
    /// The application-managed parts of the environment are cloned normally.
    /// The system-managed parts are replaced with the provided `System`
    /// instance.
    #[must_use]
    pub fn clone_with_system(&self, system: S) -> Env<S> {
        Env {
            builtins: self.builtins.clone(),
            exit_status: self.exit_status,
            jobs: self.jobs.clone(),
            options: self.options,
            system,
        }
    }

    /// Prints a message to the standard output.
    ///
    /// Errors are ignored. The shell has nowhere else to report them.
    pub fn print(&mut self, message: &str) {
        let _: Result<_, _> = self.system.write_all(Fd::STDOUT, message.as_bytes());
    }

    /// Prints an error message to the standard error.
    ///
    /// A newline is appended to the message.
    pub fn print_error(&mut self, message: &str) {
        let message = format!("{message}\n");
        let _: Result<_, _> = self.system.write_all(Fd::STDERR, message.as_bytes());
    }

    /// Prints an error message for a failed system call.
    ///
    /// The message has the form `<context>: <description of errno>`, where the
    /// description is the platform's `strerror` text.
    pub fn print_system_error(&mut self, errno: Errno, context: &str) {
        self.print_error(&format!("{context}: {}", strerror(errno)));
    }
}

/// Returns the platform's description of the error number.
fn strerror(errno: Errno) -> String {
    let message = std::io::Error::from_raw_os_error(errno as i32).to_string();
    let suffix = format!(" (os error {})", errno as i32);
    match message.strip_suffix(&suffix) {
        Some(description) => description.to_owned(),
        None => message,
    }
}

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

//! Utility for starting subshells
//!
//! This module defines [`Subshell`], a builder for starting a subshell. It is
//! [constructed](Subshell::new) with a function you want to run in a subshell.
//! After configuring the builder, you can [start](Subshell::start) the
//! subshell.
//!
//! [`Subshell`] is implemented as a wrapper around
//! [`System::new_child_process`]. You should prefer `Subshell` for the purpose
//! of creating a subshell because it helps to arrange the child process
//! properly.

use crate::Env;
use crate::job::Pid;
use crate::semantics::Divert;
use crate::system::ChildProcessTask;
use crate::system::System;
use std::ops::ControlFlow::{Break, Continue};

/// Subshell builder
///
/// See the [module documentation](self) for details.
#[must_use = "a subshell is not started unless you call `Subshell::start`"]
pub struct Subshell<F> {
    task: F,
    new_process_group: bool,
}

impl<F> std::fmt::Debug for Subshell<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subshell")
            .field("new_process_group", &self.new_process_group)
            .finish_non_exhaustive()
    }
}

impl<F> Subshell<F> {
    /// Creates a new subshell builder with a task.
    ///
    /// The task will run in a subshell after it is started. If the task
    /// returns `Break(divert)` where the divert has an exit status, the exit
    /// status overrides the one in `Env`.
    pub fn new(task: F) -> Self {
        Subshell {
            task,
            new_process_group: false,
        }
    }

    /// Specifies whether the subshell should be put in a new process group.
    ///
    /// If true, the subshell becomes the leader of a new process group whose
    /// ID equals the subshell's process ID. Otherwise, the subshell stays in
    /// the process group of the parent.
    pub fn new_process_group(mut self, new_process_group: bool) -> Self {
        self.new_process_group = new_process_group;
        self
    }

    /// Starts a subshell.
    ///
    /// This function creates a new child process that runs the task contained
    /// in this builder. If the child was started successfully, this function
    /// returns the child's process ID. Otherwise, it returns an error.
    ///
    /// This function does not wait for the child to finish. If you are going to
    /// wait for the child, add it to `env.jobs` first so that the `SIGCHLD`
    /// handler can find it.
    pub fn start<S>(self, env: &mut Env<S>) -> nix::Result<Pid>
    where
        S: System + 'static,
        F: FnOnce(&mut Env<S>) -> crate::semantics::Result + 'static,
    {
        let me = Pid::from_raw(0);
        let new_process_group = self.new_process_group;
        let task = self.task;
        let task: ChildProcessTask<S> = Box::new(move |env| {
            if new_process_group {
                let _ = env.system.setpgid(me, me);
            }
            match task(env) {
                Continue(()) => (),
                Break(Divert::Exit(exit_status) | Divert::Abort(exit_status)) => {
                    if let Some(exit_status) = exit_status {
                        env.exit_status = exit_status;
                    }
                }
            }
        });

        let child = env.system.new_child_process()?;
        let child_pid = child(env, task);

        if new_process_group {
            // Also set in the parent so that the group exists before this
            // function returns, whichever process runs first.
            let _ = env.system.setpgid(child_pid, child_pid);
        }

        Ok(child_pid)
    }
}

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

//! Command execution

pub mod external;

use std::ops::ControlFlow::{Break, Continue};
use tracing::debug;
use tsh_env::Env;
use tsh_env::System;
use tsh_env::semantics::{ExitStatus, Result};

/// Executes a command line.
///
/// The line is tokenized first. If the command name is a built-in, the
/// built-in runs in the shell process and its exit status becomes
/// `env.exit_status`. Otherwise, the command is [started as a new
/// job](external::start_job).
///
/// A blank line does nothing. A line with too many arguments is rejected with
/// a message.
pub fn execute<S: System + 'static>(env: &mut Env<S>, line: &str) -> Result {
    let command_line = match tsh_syntax::parse(line) {
        Ok(command_line) => command_line,
        Err(error) => {
            env.print(&format!("tsh: {error}\n"));
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        }
    };
    debug!(
        args = ?command_line.args,
        background = command_line.background,
        "parsed command line"
    );

    let Some(name) = command_line.name() else {
        return Continue(());
    };

    if let Some(builtin) = env.builtins.get(name).copied() {
        let (exit_status, divert) = (builtin.execute)(env, command_line.args);
        env.exit_status = exit_status;
        return match divert {
            None => Continue(()),
            Some(divert) => Break(divert),
        };
    }

    external::start_job(env, command_line, line)
}

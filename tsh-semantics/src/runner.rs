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

//! Implementation of the read-eval loop

use crate::abort_with_system_error;
use crate::command::execute;
use crate::trap::{handled_signal_set, run_pending_handlers, unblocking_handled_signals};
use std::ops::ControlFlow::Continue;
use tsh_env::Env;
use tsh_env::System;
use tsh_env::input::FdReader;
use tsh_env::io::Fd;
use tsh_env::option::PROMPT;
use tsh_env::semantics::{ExitStatus, Result};
use tsh_env::system::{Errno, SigSet, SigmaskHow};

/// Reads and executes command lines from the standard input.
///
/// The loop prints the prompt if `env.options.emit_prompt` is set, reads a
/// line, [executes](execute) it, and applies the signals caught meanwhile.
/// It ends at the end of input with `Continue(())` and `env.exit_status` set
/// to zero, or when a command or signal handler returns `Break(_)`.
///
/// The handled signals are blocked while the loop runs. They are unblocked
/// only while waiting for input, so a signal interrupts the wait and is
/// applied before the next line is read.
pub fn read_eval_loop<S: System + 'static>(env: &mut Env<S>) -> Result {
    let mut old_mask = SigSet::empty();
    let handled = handled_signal_set();
    if let Err(errno) = env
        .system
        .sigmask(SigmaskHow::SIG_BLOCK, Some(&handled), Some(&mut old_mask))
    {
        return abort_with_system_error(env, errno, "sigprocmask error");
    }

    let result = run(env, &unblocking_handled_signals(&old_mask));

    let _ = env
        .system
        .sigmask(SigmaskHow::SIG_SETMASK, Some(&old_mask), None);
    result
}

fn run<S: System + 'static>(env: &mut Env<S>, wait_mask: &SigSet) -> Result {
    let mut reader = FdReader::new(Fd::STDIN);
    loop {
        if env.options.emit_prompt {
            env.print(PROMPT);
        }

        let line = loop {
            match reader.next_line(&mut env.system, Some(wait_mask)) {
                Ok(line) => break line,
                Err(Errno::EINTR) => run_pending_handlers(env)?,
                Err(errno) => return abort_with_system_error(env, errno, "fgets error"),
            }
        };
        let Some(line) = line else {
            env.exit_status = ExitStatus::SUCCESS;
            return Continue(());
        };

        execute(env, &line)?;
        run_pending_handlers(env)?;
    }
}

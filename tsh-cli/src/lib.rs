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

//! This is an internal library crate for the tsh shell. It is not intended to
//! be used as a library by other crates.
//!
//! The entry point for the shell is the [`main`] function, which is to be used
//! as the `main` function in the binary crate. The function sets up the shell
//! environment and runs the main read-eval loop.

pub mod startup;

use self::startup::args::{Parse, USAGE};
use self::startup::{configure_environment, init_logging};
use std::ops::ControlFlow::Break;
use tsh_env::Env;
use tsh_env::RealSystem;
use tsh_env::System;
use tsh_env::option::Options;
use tsh_env::system::{Signal, SignalHandling};
use tsh_semantics::{ExitStatus, Result, read_eval_loop};

fn run<S: System + 'static>(env: &mut Env<S>, options: Options) -> Result {
    configure_environment(env, options)?;
    read_eval_loop(env)
}

/// Runs the shell with the command line arguments.
///
/// The exit status of the shell is left in `env.exit_status`.
pub fn run_as_shell_process<S, I>(env: &mut Env<S>, args: I)
where
    S: System + 'static,
    I: IntoIterator<Item = String>,
{
    let options = match self::startup::args::parse(args) {
        Ok(Parse::Run(options)) => options,
        Ok(Parse::Help) | Err(_) => {
            env.print(USAGE);
            env.exit_status = ExitStatus::FAILURE;
            return;
        }
    };

    init_logging(&options);

    if let Break(divert) = run(env, options) {
        if let Some(exit_status) = divert.exit_status() {
            env.exit_status = exit_status;
        }
    }
}

pub fn main() -> ! {
    // SAFETY: This is the only instance of RealSystem we create in the whole
    // process.
    let system = unsafe { RealSystem::new() };
    let mut env = Env::with_system(system);

    // Rust by default sets SIGPIPE to SIG_IGN, which is not desired.
    let _ = env.system.sigaction(Signal::SIGPIPE, SignalHandling::Default);

    run_as_shell_process(&mut env, std::env::args());
    std::process::exit(env.exit_status.0)
}

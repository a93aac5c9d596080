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

//! Shell startup

use std::ops::ControlFlow::Continue;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tsh_env::Env;
use tsh_env::System;
use tsh_env::io::Fd;
use tsh_env::option::Options;
use tsh_semantics::Result;
use tsh_semantics::abort_with_system_error;
use tsh_semantics::trap::install_signal_handlers;

pub mod args;

/// Returns the log filter for the options.
///
/// With `-v`, debug events are enabled. Otherwise, the filter is taken from
/// the `RUST_LOG` environment variable and defaults to `warn`.
#[must_use]
pub fn log_filter(options: &Options) -> EnvFilter {
    if options.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Installs the global tracing subscriber.
///
/// Events are written to the standard error, which the shell later redirects
/// to the standard output.
pub fn init_logging(options: &Options) {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(log_filter(options))
        .try_init();
}

/// Prepares the environment for the read-eval loop.
///
/// This function applies the options, installs the built-ins, makes the
/// standard error a copy of the standard output, and installs the signal
/// handlers.
pub fn configure_environment<S: System + 'static>(env: &mut Env<S>, options: Options) -> Result {
    env.options = options;
    env.builtins.extend(tsh_builtin::builtins());

    if let Err(errno) = env.system.dup2(Fd::STDOUT, Fd::STDERR) {
        return abort_with_system_error(env, errno, "dup2 error");
    }

    install_signal_handlers(env)?;
    tracing::debug!(?options, "shell configured");
    Continue(())
}

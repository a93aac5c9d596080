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

//! Command line tokenizer for the tsh job-control shell.
//!
//! The shell language is minimal. A command line is a sequence of arguments
//! separated by spaces or tabs. An argument that starts with a single quote
//! extends to the next single quote and may contain separators. If the last
//! argument starts with `&`, the command runs in the background.
//!
//! ```
//! use tsh_syntax::parse;
//! let command_line = parse("sleep  10 &\n").unwrap();
//! assert_eq!(command_line.args, ["sleep", "10"]);
//! assert!(command_line.background);
//! ```

use thiserror::Error;

/// Maximum number of arguments in a command line, exclusive.
pub const MAX_ARGS: usize = 128;

/// Result of tokenizing a command line
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandLine {
    /// Command name and operands
    ///
    /// This is empty for a blank line.
    pub args: Vec<String>,

    /// Whether the command should run in the background
    pub background: bool,
}

impl CommandLine {
    /// Returns the command name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// Error in tokenizing a command line
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The line has [`MAX_ARGS`] or more arguments.
    #[error("too many arguments")]
    TooManyArguments,
}

fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Splits a command line into arguments.
///
/// A trailing newline is ignored. A single quote that is not closed discards
/// the rest of the line.
pub fn parse(line: &str) -> Result<CommandLine, Error> {
    let mut rest = line.strip_suffix('\n').unwrap_or(line);
    let mut args = Vec::new();

    loop {
        rest = rest.trim_start_matches(is_separator);
        if rest.is_empty() {
            break;
        }

        let (arg, remainder) = if let Some(quoted) = rest.strip_prefix('\'') {
            match quoted.split_once('\'') {
                Some(pair) => pair,
                None => break,
            }
        } else {
            match rest.find(is_separator) {
                Some(index) => (&rest[..index], &rest[index..]),
                None => (rest, ""),
            }
        };
        args.push(arg.to_owned());
        rest = remainder;
    }

    if args.len() >= MAX_ARGS {
        return Err(Error::TooManyArguments);
    }

    let background = args.last().is_some_and(|arg| arg.starts_with('&'));
    if background {
        args.pop();
    }
    Ok(CommandLine { args, background })
}

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

//! Command line argument parser for the shell

use thiserror::Error;
use tsh_env::option::Options;

/// Parse result
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Parse {
    /// Runs the shell with the options
    Run(Options),
    /// Prints the usage and exits
    Help,
}

impl From<Options> for Parse {
    fn from(options: Options) -> Self {
        Parse::Run(options)
    }
}

/// Error in command line parsing
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// Short option that is not defined
    #[error("unknown option `{0}`")]
    UnknownOption(char),

    /// Argument that is not an option
    #[error("unexpected operand `{0}`")]
    UnexpectedOperand(String),
}

/// Usage text printed for `-h` and invalid arguments
pub const USAGE: &str = "\
Usage: shell [-hvp]
   -h   print this message
   -v   print additional diagnostic information
   -p   do not emit a command prompt
";

/// Parses command line arguments.
///
/// The first item of `args` is the name of the shell and is ignored. Options
/// may be combined as in `-vp`. A `--` ends the options. `-h` stops parsing
/// and yields [`Parse::Help`].
pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Parse, Error> {
    let mut options = Options::default();
    let mut args = args.into_iter().skip(1);

    for arg in args.by_ref() {
        if arg == "--" {
            break;
        }
        let Some(flags) = arg.strip_prefix('-').filter(|flags| !flags.is_empty()) else {
            return Err(Error::UnexpectedOperand(arg));
        };
        for flag in flags.chars() {
            match flag {
                'h' => return Ok(Parse::Help),
                'v' => options.verbose = true,
                'p' => options.emit_prompt = false,
                _ => return Err(Error::UnknownOption(flag)),
            }
        }
    }

    if let Some(operand) = args.next() {
        return Err(Error::UnexpectedOperand(operand));
    }
    Ok(options.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse_strs(args: &[&str]) -> Result<Parse, Error> {
        parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn no_arguments() {
        assert_eq!(parse_strs(&["tsh"]), Ok(Parse::Run(Options::default())));
        assert_eq!(parse_strs(&[]), Ok(Parse::Run(Options::default())));
    }

    #[test]
    fn separate_flags() {
        let result = parse_strs(&["tsh", "-v", "-p"]);
        assert_matches!(result, Ok(Parse::Run(options)) => {
            assert!(options.verbose);
            assert!(!options.emit_prompt);
        });
    }

    #[test]
    fn combined_flags() {
        let result = parse_strs(&["tsh", "-pv"]);
        assert_matches!(result, Ok(Parse::Run(options)) => {
            assert!(options.verbose);
            assert!(!options.emit_prompt);
        });
    }

    #[test]
    fn help() {
        assert_eq!(parse_strs(&["tsh", "-h"]), Ok(Parse::Help));
        assert_eq!(parse_strs(&["tsh", "-vh", "-x"]), Ok(Parse::Help));
    }

    #[test]
    fn unknown_option() {
        assert_eq!(parse_strs(&["tsh", "-px"]), Err(Error::UnknownOption('x')));
        assert_eq!(
            Error::UnknownOption('x').to_string(),
            "unknown option `x`"
        );
    }

    #[test]
    fn operands_are_rejected() {
        assert_eq!(
            parse_strs(&["tsh", "script"]),
            Err(Error::UnexpectedOperand("script".to_string()))
        );
        assert_eq!(
            parse_strs(&["tsh", "-"]),
            Err(Error::UnexpectedOperand("-".to_string()))
        );
        assert_eq!(
            parse_strs(&["tsh", "--", "x"]),
            Err(Error::UnexpectedOperand("x".to_string()))
        );
        assert_eq!(parse_strs(&["tsh", "-p", "--"]), Ok(Parse::Run(Options {
            verbose: false,
            emit_prompt: false,
        })));
    }
}

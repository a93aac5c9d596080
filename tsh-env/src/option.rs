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

//! Shell options
//!
//! The options are set from the command-line flags when the shell starts up
//! and do not change afterwards.

/// Prompt printed before reading each command line
pub const PROMPT: &str = "tsh> ";

/// Collection of shell options
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Options {
    /// Whether additional diagnostic information is printed (`-v`)
    pub verbose: bool,
    /// Whether the prompt is printed before reading a command line (the
    /// opposite of `-p`)
    pub emit_prompt: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            verbose: false,
            emit_prompt: true,
        }
    }
}

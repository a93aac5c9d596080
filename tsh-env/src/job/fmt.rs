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

//! Job report formatting
//!
//! This module defines the formats in which the shell reports jobs.
//!
//! A [`Report`] shows the job ID, the process ID, and the command line of a
//! job. The `bg` built-in and the launcher of background jobs print it in the
//! normal form:
//!
//! ```text
//! [1] (24437) sleep 100 &
//! ```
//!
//! The alternate form (`{:#}`) adds the job state and is used by the `jobs`
//! built-in:
//!
//! ```text
//! [1] (24437) Running sleep 100 &
//! ```
//!
//! The command line of a job retains its trailing newline, so reports do not
//! add another.
//!
//! A [`Notice`] announces that a job was stopped or killed by a signal:
//!
//! ```text
//! Job [1] (24437) stopped by signal SIGTSTP
//! ```

use super::Job;
use super::JobId;
use super::JobState;
use super::Pid;
use nix::sys::signal::Signal;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Formats a job state into the word used in the `jobs` listing.
impl Display for JobState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            JobState::Foreground => "Foreground".fmt(f),
            JobState::Background => "Running".fmt(f),
            JobState::Stopped => "Stopped".fmt(f),
        }
    }
}

/// Wrapper for formatting a job
///
/// See the [module documentation](self) for details.
#[derive(Clone, Copy, Debug)]
pub struct Report<'a> {
    /// Job to be reported
    pub job: &'a Job,
}

impl<'a> Report<'a> {
    /// Creates a report for the job.
    #[inline]
    #[must_use]
    pub const fn new(job: &'a Job) -> Self {
        Report { job }
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let Job {
            pid,
            job_id,
            state,
            command_line,
        } = self.job;
        if f.alternate() {
            write!(f, "[{job_id}] ({pid}) {state} {command_line}")
        } else {
            write!(f, "[{job_id}] ({pid}) {command_line}")
        }
    }
}

/// What happened to a job reported in a [`Notice`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Event {
    /// The job was stopped by the signal.
    Stopped(Signal),
    /// The job was terminated by the signal.
    Terminated(Signal),
}

/// Announcement of a job status change caused by a signal
///
/// The notice is formatted as a complete line including the newline.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Notice {
    pub job_id: JobId,
    pub pid: Pid,
    pub event: Event,
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let Notice { job_id, pid, event } = self;
        let (verb, signal) = match event {
            Event::Stopped(signal) => ("stopped", signal),
            Event::Terminated(signal) => ("terminated", signal),
        };
        writeln!(f, "Job [{job_id}] ({pid}) {verb} by signal {}", signal.as_str())
    }
}

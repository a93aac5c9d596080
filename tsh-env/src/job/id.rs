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

//! Job target parsing
//!
//! The `bg` and `fg` built-ins take an operand that selects a job. The operand
//! can take two forms:
//!
//! - A string of the form `%n` (where `n` is a decimal integer) refers to the
//!   job whose job ID is `n`.
//! - A string of decimal digits refers to the job whose process ID is the
//!   number.
//!
//! You can parse an operand with [`parse`] and get a [`Target`] as a result,
//! which in turn can [find](Target::find) the job in a [`JobList`].
//!
//! ```
//! # use tsh_env::job::{JobList, JobState, Pid};
//! # use tsh_env::job::id::{parse, FindError, Target};
//! let mut jobs = JobList::new();
//! jobs.add(Pid::from_raw(42), JobState::Stopped, "cat\n").unwrap();
//! assert_eq!(parse("%1").unwrap().find(&jobs).unwrap().pid, Pid::from_raw(42));
//! assert_eq!(parse("42").unwrap().find(&jobs).unwrap().job_id, 1);
//! assert_eq!(parse("%2").unwrap().find(&jobs), Err(FindError::NoSuchJob("%2".to_string())));
//! ```

use super::Job;
use super::JobList;
use super::Pid;
use thiserror::Error;

/// Result of parsing a job target
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Target<'a> {
    /// Job ID operand (`%n`)
    ///
    /// The value is the whole operand including the `%`. The rest of the
    /// operand may not be a valid job ID, in which case no job is found.
    JobId(&'a str),
    /// Process ID operand
    ProcessId(Pid),
}

/// Error that may occur in job target [parsing](parse)
///
/// The `bg` and `fg` built-ins prefix the message with their name.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("argument must be a PID or %jobid")]
pub struct ParseError;

/// Error that may occur in [finding](Target::find) a job
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum FindError {
    /// No job has the job ID.
    #[error("{0}: No such job")]
    NoSuchJob(String),
    /// No job has the process ID.
    #[error("({0}): No such process")]
    NoSuchProcess(Pid),
}

/// Parses a job target.
///
/// An operand starting with `%` is always accepted as a [`Target::JobId`].
/// Otherwise, the operand must consist of decimal digits only.
pub fn parse(operand: &str) -> Result<Target<'_>, ParseError> {
    if operand.starts_with('%') {
        return Ok(Target::JobId(operand));
    }
    if operand.is_empty() || !operand.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError);
    }
    let raw = operand.parse().map_err(|_| ParseError)?;
    Ok(Target::ProcessId(Pid::from_raw(raw)))
}

impl Target<'_> {
    /// Finds the job selected by this target.
    pub fn find(self, jobs: &JobList) -> Result<&Job, FindError> {
        match self {
            Target::JobId(operand) => operand[1..]
                .parse()
                .ok()
                .and_then(|job_id| jobs.get_by_job_id(job_id))
                .ok_or_else(|| FindError::NoSuchJob(operand.to_owned())),
            Target::ProcessId(pid) => jobs.get_by_pid(pid).ok_or(FindError::NoSuchProcess(pid)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::JobState;
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parse_job_id() {
        assert_eq!(parse("%1"), Ok(Target::JobId("%1")));
        assert_eq!(parse("%"), Ok(Target::JobId("%")));
        assert_eq!(parse("%foo"), Ok(Target::JobId("%foo")));
    }

    #[test]
    fn parse_process_id() {
        assert_eq!(parse("123"), Ok(Target::ProcessId(Pid::from_raw(123))));
        assert_eq!(parse("0"), Ok(Target::ProcessId(Pid::from_raw(0))));
    }

    #[test]
    fn parse_malformed() {
        assert_eq!(parse(""), Err(ParseError));
        assert_eq!(parse("abc"), Err(ParseError));
        assert_eq!(parse("12abc"), Err(ParseError));
        assert_eq!(parse("-5"), Err(ParseError));
        assert_eq!(parse("99999999999"), Err(ParseError));
    }

    fn sample_jobs() -> JobList {
        let mut jobs = JobList::new();
        jobs.add(Pid::from_raw(10), JobState::Background, "a\n").unwrap();
        jobs.add(Pid::from_raw(20), JobState::Stopped, "b\n").unwrap();
        jobs
    }

    #[test]
    fn find_by_job_id() {
        let jobs = sample_jobs();
        let job = Target::JobId("%2").find(&jobs).unwrap();
        assert_eq!(job.pid, Pid::from_raw(20));
    }

    #[test]
    fn find_by_process_id() {
        let jobs = sample_jobs();
        let job = Target::ProcessId(Pid::from_raw(10)).find(&jobs).unwrap();
        assert_eq!(job.job_id, 1);
    }

    #[test]
    fn find_failures() {
        let jobs = sample_jobs();
        let error = Target::JobId("%3").find(&jobs).unwrap_err();
        assert_eq!(error.to_string(), "%3: No such job");
        let error = Target::JobId("%x").find(&jobs).unwrap_err();
        assert_eq!(error.to_string(), "%x: No such job");
        let error = Target::JobId("%0").find(&jobs).unwrap_err();
        assert_matches!(error, FindError::NoSuchJob(s) if s == "%0");

        let error = Target::ProcessId(Pid::from_raw(9999)).find(&jobs).unwrap_err();
        assert_eq!(error.to_string(), "(9999): No such process");
        let error = Target::ProcessId(Pid::from_raw(0)).find(&jobs).unwrap_err();
        assert_eq!(error, FindError::NoSuchProcess(Pid::from_raw(0)));
    }
}

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

//! Selecting the job a `bg` or `fg` command operates on

use thiserror::Error;
use tsh_env::job::id::{FindError, ParseError, parse};
use tsh_env::job::{Job, JobList};

/// Error in selecting a target job
///
/// The messages are the ones the built-ins print.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TargetError {
    /// No operand was given.
    ///
    /// The value is the command name.
    #[error("{0} command requires PID or %jobid argument")]
    Missing(String),

    /// The operand is neither a PID nor a job ID.
    ///
    /// The first value is the command name.
    #[error("{0}: {1}")]
    Malformed(String, ParseError),

    /// No job matches the operand.
    #[error(transparent)]
    NotFound(#[from] FindError),
}

/// Finds the job specified by the first operand of a `bg` or `fg` command.
///
/// `args` is the whole command line including the command name. Operands
/// after the first are ignored.
pub fn find_target<'a>(jobs: &'a JobList, args: &[String]) -> Result<&'a Job, TargetError> {
    let name = args.first().map(String::as_str).unwrap_or_default();
    let Some(operand) = args.get(1) else {
        return Err(TargetError::Missing(name.to_owned()));
    };
    let target = parse(operand).map_err(|error| TargetError::Malformed(name.to_owned(), error))?;
    Ok(target.find(jobs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tsh_env::job::{JobState, Pid};

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    fn jobs() -> JobList {
        let mut jobs = JobList::new();
        jobs.add(Pid::from_raw(100), JobState::Stopped, "vi\n").unwrap();
        jobs.add(Pid::from_raw(200), JobState::Background, "sleep 9 &\n")
            .unwrap();
        jobs
    }

    #[test]
    fn missing_operand() {
        let jobs = jobs();
        let error = find_target(&jobs, &args(&["bg"])).unwrap_err();
        assert_eq!(error, TargetError::Missing("bg".to_string()));
        assert_eq!(error.to_string(), "bg command requires PID or %jobid argument");
    }

    #[test]
    fn malformed_operand() {
        let jobs = jobs();
        let error = find_target(&jobs, &args(&["fg", "abc"])).unwrap_err();
        assert_eq!(error.to_string(), "fg: argument must be a PID or %jobid");
    }

    #[test]
    fn by_job_id() {
        let jobs = jobs();
        let job = find_target(&jobs, &args(&["fg", "%2"])).unwrap();
        assert_eq!(job.pid, Pid::from_raw(200));
    }

    #[test]
    fn by_process_id() {
        let jobs = jobs();
        let job = find_target(&jobs, &args(&["bg", "100", "ignored"])).unwrap();
        assert_eq!(job.job_id, 1);
    }

    #[test]
    fn no_such_job() {
        let jobs = jobs();
        let error = find_target(&jobs, &args(&["fg", "%3"])).unwrap_err();
        assert_matches!(error, TargetError::NotFound(FindError::NoSuchJob(_)));
        assert_eq!(error.to_string(), "%3: No such job");
    }

    #[test]
    fn no_such_process() {
        let jobs = jobs();
        let error = find_target(&jobs, &args(&["bg", "9999"])).unwrap_err();
        assert_eq!(error.to_string(), "(9999): No such process");
    }
}

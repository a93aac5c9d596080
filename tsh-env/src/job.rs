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

//! Type definitions for job management.
//!
//! A [`JobList`] is a fixed-capacity table of [`Job`]s, each of which tracks a
//! child process started by the shell. A job is added when the shell starts a
//! child process and removed when the child process is reaped after it exits
//! or is killed by a signal.
//!
//! Every job has a job ID, a small positive integer that is unique among the
//! jobs in the list. The list has a counter holding the ID to assign to the
//! next job. The counter advances on [`add`](JobList::add), wrapping around
//! to 1 after reaching the capacity, and is recomputed as one more than the
//! largest remaining job ID on [`delete`](JobList::delete).
//!
//! At most one job in the list can be in the [foreground](JobState::Foreground)
//! state. The methods of `JobList` refuse to violate this rule.

pub mod fmt;
pub mod id;

#[doc(no_inline)]
pub use nix::unistd::Pid;
use thiserror::Error;

/// Default capacity of a [`JobList`]
pub const MAX_JOBS: usize = 16;

/// Job ID type
pub type JobId = usize;

/// Shell-visible state of a job
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum JobState {
    /// The job is running and the shell is waiting for it.
    Foreground,
    /// The job is running without the shell waiting for it.
    Background,
    /// The job has been stopped by a signal.
    Stopped,
}

/// Child process tracked by the shell
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Job {
    /// Process ID of the child
    ///
    /// The child is also the leader of the process group of the job, so the
    /// process group ID equals this value.
    pub pid: Pid,

    /// Job ID assigned by the job list
    pub job_id: JobId,

    /// Current state
    pub state: JobState,

    /// Command line that started the job
    ///
    /// The command line is kept as typed, including its trailing newline.
    pub command_line: String,
}

/// Error in [`JobList::add`]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum AddError {
    #[error("Tried to create too many jobs")]
    Full,
    #[error("invalid process ID {0}")]
    InvalidPid(Pid),
    #[error("process {0} is already in the job list")]
    DuplicatePid(Pid),
    #[error("there is already a foreground job")]
    ForegroundOccupied,
}

/// Error in [`JobList::set_state`]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SetStateError {
    #[error("({0}): No such process")]
    NoSuchJob(Pid),
    #[error("there is already a foreground job")]
    ForegroundOccupied,
}

/// Fixed-capacity collection of jobs
///
/// See the [module documentation](self) for details.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobList {
    slots: Vec<Option<Job>>,
    next_job_id: JobId,
}

impl Default for JobList {
    fn default() -> Self {
        Self::with_capacity(MAX_JOBS)
    }
}

/// Returns true for process IDs that can identify a job.
fn is_valid_pid(pid: Pid) -> bool {
    pid.as_raw() > 0
}

impl JobList {
    /// Creates an empty job list with the default capacity ([`MAX_JOBS`]).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty job list that can contain `capacity` jobs at most.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        JobList {
            slots: vec![None; capacity],
            next_job_id: 1,
        }
    }

    /// Returns the maximum number of jobs the list can contain.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of jobs in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if the list contains no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Returns the job ID that will be tried first for the next job.
    #[inline]
    #[must_use]
    pub fn next_job_id(&self) -> JobId {
        self.next_job_id
    }

    fn max_job_id(&self) -> JobId {
        self.iter().map(|job| job.job_id).max().unwrap_or(0)
    }

    fn wrap(&self, job_id: JobId) -> JobId {
        if job_id > self.capacity() { 1 } else { job_id }
    }

    /// Adds a job for a new child process.
    ///
    /// The new job is put in the first free slot and given the job ID held by
    /// the counter, unless the ID is in use by another job, in which case the
    /// following IDs are tried in turn. The counter then advances past the
    /// assigned ID.
    ///
    /// Returns the assigned job ID. This function fails if `pid` is not
    /// positive or already in the list, if there is no free slot, or if `state`
    /// is `Foreground` and there already is a foreground job.
    pub fn add<S: Into<String>>(
        &mut self,
        pid: Pid,
        state: JobState,
        command_line: S,
    ) -> Result<JobId, AddError> {
        if !is_valid_pid(pid) {
            return Err(AddError::InvalidPid(pid));
        }
        if self.get_by_pid(pid).is_some() {
            return Err(AddError::DuplicatePid(pid));
        }
        if state == JobState::Foreground && self.foreground_pid().is_some() {
            return Err(AddError::ForegroundOccupied);
        }
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            return Err(AddError::Full);
        };

        // A free slot guarantees a free ID in 1..=capacity.
        let mut job_id = self.wrap(self.next_job_id);
        while self.get_by_job_id(job_id).is_some() {
            job_id = self.wrap(job_id + 1);
        }
        self.next_job_id = self.wrap(job_id + 1);

        let command_line = command_line.into();
        tracing::debug!(job_id, %pid, command_line = command_line.trim_end(), "added job");
        self.slots[index] = Some(Job {
            pid,
            job_id,
            state,
            command_line,
        });
        Ok(job_id)
    }

    /// Removes the job for the given process ID.
    ///
    /// Returns the removed job, or `None` if there is no such job (including
    /// when `pid` is not positive). After removal, the job ID counter is
    /// recomputed as one more than the largest remaining job ID.
    pub fn delete(&mut self, pid: Pid) -> Option<Job> {
        if !is_valid_pid(pid) {
            return None;
        }
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|job| job.pid == pid))?;
        let job = slot.take();
        self.next_job_id = self.wrap(self.max_job_id() + 1);
        job
    }

    /// Finds the job for the given process ID.
    #[must_use]
    pub fn get_by_pid(&self, pid: Pid) -> Option<&Job> {
        if !is_valid_pid(pid) {
            return None;
        }
        self.iter().find(|job| job.pid == pid)
    }

    /// Finds the job having the given job ID.
    #[must_use]
    pub fn get_by_job_id(&self, job_id: JobId) -> Option<&Job> {
        if job_id == 0 {
            return None;
        }
        self.iter().find(|job| job.job_id == job_id)
    }

    /// Returns the process ID of the foreground job, if any.
    #[must_use]
    pub fn foreground_pid(&self) -> Option<Pid> {
        self.iter()
            .find(|job| job.state == JobState::Foreground)
            .map(|job| job.pid)
    }

    /// Changes the state of the job for the given process ID.
    ///
    /// Returns the previous state. This function fails if there is no such
    /// job or if `state` is `Foreground` and another job is in the foreground.
    pub fn set_state(&mut self, pid: Pid, state: JobState) -> Result<JobState, SetStateError> {
        if state == JobState::Foreground {
            if let Some(foreground) = self.foreground_pid() {
                if foreground != pid {
                    return Err(SetStateError::ForegroundOccupied);
                }
            }
        }
        let job = self
            .slots
            .iter_mut()
            .flatten()
            .find(|job| is_valid_pid(pid) && job.pid == pid)
            .ok_or(SetStateError::NoSuchJob(pid))?;
        Ok(std::mem::replace(&mut job.state, state))
    }

    /// Returns an iterator over the jobs in slot order.
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.slots.iter())
    }

    /// Returns the `jobs` listing of all jobs in slot order.
    ///
    /// The returned iterator yields a [`Report`](fmt::Report) for each job.
    /// Format them with the alternate flag (`{:#}`) to include the job state.
    /// The iterator can be cloned to traverse the list again.
    pub fn list(&self) -> impl Iterator<Item = fmt::Report<'_>> + Clone {
        self.iter().map(fmt::Report::new)
    }
}

/// Iterator of jobs in a [`JobList`]
#[derive(Clone, Debug)]
pub struct Iter<'a>(std::slice::Iter<'a, Option<Job>>);

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Job;

    fn next(&mut self) -> Option<&'a Job> {
        self.0.by_ref().flatten().next()
    }
}

impl<'a> IntoIterator for &'a JobList {
    type Item = &'a Job;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

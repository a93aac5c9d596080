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

//! Processes in a virtual system.

use super::Stream;
use crate::io::Fd;
use crate::semantics::ExitStatus;
use crate::system::SigSet;
use crate::system::SigmaskHow;
use crate::system::Signal;
use crate::system::SignalHandling;
use crate::system::WaitStatus;
use nix::unistd::Pid;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::ffi::CString;

/// Process in a virtual system.
#[derive(Clone, Debug)]
pub struct Process {
    /// Process ID of the parent process.
    pub(crate) ppid: Pid,

    /// Process group ID of this process.
    pub(crate) pgid: Pid,

    /// Set of file descriptors open in this process.
    pub(crate) fds: BTreeMap<Fd, Stream>,

    /// Execution state of the process.
    state: ProcessState,

    /// True when `state` has changed but not yet reported to the parent
    /// process.
    ///
    /// The change of `state` is reported when the parent `wait`s for this
    /// process.
    state_has_changed: bool,

    /// Currently set signal handlers.
    ///
    /// For signals not contained in this hash map, the default handler is
    /// assumed.
    signal_handlings: HashMap<Signal, SignalHandling>,

    /// Set of blocked signals.
    blocked_signals: SigSet,

    /// Set of pending signals.
    pending_signals: SigSet,

    /// List of signals that have been delivered and caught.
    pub(crate) caught_signals: Vec<Signal>,

    /// Copy of arguments passed to [`execvp`](crate::System::execvp).
    pub(crate) last_exec: Option<(CString, Vec<CString>)>,
}

/// Result of sending or unblocking a signal
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[must_use]
pub struct SignalResult {
    /// Whether the process was stopped, continued, or terminated.
    pub process_state_changed: bool,
}

impl std::ops::BitOrAssign for SignalResult {
    fn bitor_assign(&mut self, rhs: Self) {
        self.process_state_changed |= rhs.process_state_changed;
    }
}

/// Default action of a signal
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DefaultAction {
    Ignore,
    Terminate,
    Stop,
    Continue,
}

fn default_action(signal: Signal) -> DefaultAction {
    use Signal::*;
    match signal {
        SIGCHLD | SIGURG | SIGWINCH => DefaultAction::Ignore,
        SIGCONT => DefaultAction::Continue,
        SIGSTOP | SIGTSTP | SIGTTIN | SIGTTOU => DefaultAction::Stop,
        _ => DefaultAction::Terminate,
    }
}

impl Process {
    /// Creates a new running process.
    pub fn with_parent_and_group(ppid: Pid, pgid: Pid) -> Process {
        Process {
            ppid,
            pgid,
            fds: BTreeMap::new(),
            state: ProcessState::Running,
            state_has_changed: false,
            signal_handlings: HashMap::new(),
            blocked_signals: SigSet::empty(),
            pending_signals: SigSet::empty(),
            caught_signals: Vec::new(),
            last_exec: None,
        }
    }

    /// Creates a new running process as a child of the given parent.
    ///
    /// Some part of the parent process state is copied to the new process.
    /// Pending signals are not inherited.
    pub fn fork_from(ppid: Pid, parent: &Process) -> Process {
        let mut child = Self::with_parent_and_group(ppid, parent.pgid);
        child.fds = parent.fds.clone();
        child.signal_handlings = parent.signal_handlings.clone();
        child.blocked_signals = parent.blocked_signals;
        child
    }

    /// Returns the process ID of the parent process.
    #[inline(always)]
    #[must_use]
    pub fn ppid(&self) -> Pid {
        self.ppid
    }

    /// Returns the process group ID of this process.
    #[inline(always)]
    #[must_use]
    pub fn pgid(&self) -> Pid {
        self.pgid
    }

    /// Returns the process state.
    #[inline(always)]
    #[must_use]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Sets the state of this process.
    ///
    /// Returns true if the state changed.
    pub fn set_state(&mut self, state: ProcessState) -> bool {
        let changed = self.state != state;
        if changed {
            self.state = state;
            self.state_has_changed = true;
        }
        changed
    }

    /// Returns true if a new state has not been reported to the parent.
    #[must_use]
    pub fn state_has_changed(&self) -> bool {
        self.state_has_changed
    }

    /// Returns the current state and marks it as reported.
    pub fn take_state(&mut self) -> ProcessState {
        self.state_has_changed = false;
        self.state
    }

    /// Returns the currently blocked signals.
    #[must_use]
    pub fn blocked_signals(&self) -> &SigSet {
        &self.blocked_signals
    }

    /// Returns the currently pending signals.
    ///
    /// A signal is pending when it has been raised but not yet delivered
    /// because it is being blocked.
    #[must_use]
    pub fn pending_signals(&self) -> &SigSet {
        &self.pending_signals
    }

    /// Updates the signal blocking mask for this process.
    ///
    /// Pending signals that are no longer blocked are delivered.
    pub fn block_signals(&mut self, how: SigmaskHow, signals: &SigSet) -> SignalResult {
        match how {
            SigmaskHow::SIG_SETMASK => self.blocked_signals = *signals,
            SigmaskHow::SIG_BLOCK => {
                for signal in signals.iter() {
                    self.blocked_signals.add(signal);
                }
            }
            SigmaskHow::SIG_UNBLOCK => {
                for signal in signals.iter() {
                    self.blocked_signals.remove(signal);
                }
            }
            _ => (),
        }

        let mut result = SignalResult::default();
        for signal in Signal::iterator() {
            if self.pending_signals.contains(signal) && !self.blocked_signals.contains(signal) {
                self.pending_signals.remove(signal);
                result |= self.deliver_signal(signal);
            }
        }
        result
    }

    /// Returns the current handling for the signal.
    #[must_use]
    pub fn signal_handling(&self, signal: Signal) -> SignalHandling {
        self.signal_handlings
            .get(&signal)
            .copied()
            .unwrap_or_default()
    }

    /// Gets and sets the handling for the signal.
    ///
    /// This function sets the handling to `handling` and returns the previous
    /// handling.
    pub fn set_signal_handling(
        &mut self,
        signal: Signal,
        handling: SignalHandling,
    ) -> SignalHandling {
        let old_handling = self.signal_handlings.insert(signal, handling);
        old_handling.unwrap_or_default()
    }

    /// Resets caught signals to the default handling.
    ///
    /// This is what replacing the process image does to signal handlers.
    /// Ignored signals stay ignored.
    pub fn reset_caught_signal_handlings(&mut self) {
        for handling in self.signal_handlings.values_mut() {
            if *handling == SignalHandling::Catch {
                *handling = SignalHandling::Default;
            }
        }
    }

    /// Delivers a signal to this process.
    ///
    /// The action taken on the delivery depends on the current signal
    /// handling for the signal.
    fn deliver_signal(&mut self, signal: Signal) -> SignalResult {
        let handling = if signal == Signal::SIGKILL || signal == Signal::SIGSTOP {
            SignalHandling::Default
        } else {
            self.signal_handling(signal)
        };
        let mut result = SignalResult::default();
        match handling {
            SignalHandling::Default => {
                let new_state = match default_action(signal) {
                    DefaultAction::Ignore | DefaultAction::Continue => None,
                    DefaultAction::Terminate => Some(ProcessState::Signaled(signal)),
                    DefaultAction::Stop => Some(ProcessState::Stopped(signal)),
                };
                if let Some(new_state) = new_state {
                    result.process_state_changed = self.set_state(new_state);
                }
            }
            SignalHandling::Ignore => (),
            SignalHandling::Catch => self.caught_signals.push(signal),
        }
        result
    }

    /// Sends a signal to this process.
    ///
    /// If the signal is being blocked, it will remain pending. Otherwise, it is
    /// immediately delivered. `SIGCONT` resumes a stopped process in either
    /// case. A terminated process ignores any signal.
    pub fn raise_signal(&mut self, signal: Signal) -> SignalResult {
        let mut result = SignalResult::default();
        if !self.state.is_alive() {
            return result;
        }

        if signal == Signal::SIGCONT {
            if let ProcessState::Stopped(_) = self.state {
                result.process_state_changed = self.set_state(ProcessState::Running);
            }
        }

        if signal != Signal::SIGKILL
            && signal != Signal::SIGSTOP
            && self.blocked_signals().contains(signal)
        {
            self.pending_signals.add(signal);
        } else {
            result |= self.deliver_signal(signal);
        }
        result
    }

    /// Returns the arguments to the last call to
    /// [`execvp`](crate::System::execvp) on this process.
    #[inline(always)]
    #[must_use]
    pub fn last_exec(&self) -> &Option<(CString, Vec<CString>)> {
        &self.last_exec
    }
}

/// State of a process.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ProcessState {
    Running,
    Stopped(Signal),
    Exited(ExitStatus),
    Signaled(Signal),
}

impl ProcessState {
    /// Whether the process is not yet terminated.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        match self {
            ProcessState::Running | ProcessState::Stopped(_) => true,
            ProcessState::Exited(_) | ProcessState::Signaled(_) => false,
        }
    }

    /// Converts `ProcessState` to `WaitStatus`.
    #[must_use]
    pub fn to_wait_status(self, pid: Pid) -> WaitStatus {
        match self {
            ProcessState::Running => WaitStatus::Continued(pid),
            ProcessState::Exited(exit_status) => WaitStatus::Exited(pid, exit_status.0),
            ProcessState::Stopped(signal) => WaitStatus::Stopped(pid, signal),
            ProcessState::Signaled(signal) => WaitStatus::Signaled(pid, signal, false),
        }
    }
}

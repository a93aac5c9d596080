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

//! System simulated in Rust.
//!
//! [`VirtualSystem`] is a pure Rust implementation of [`System`] that simulates
//! the behavior of the underlying system without any interaction with the
//! actual system. `VirtualSystem` is used for testing the behavior of the shell
//! in unit tests.
//!
//! This module also defines elements that compose a virtual system.
//!
//! # Processes
//!
//! A virtual system contains a set of [`Process`]es. A process is running,
//! stopped, or terminated. Signals sent to a process change its state according
//! to the signal handling set in the process: a signal having the default
//! handling stops, continues, or terminates the process, or has no effect. A
//! caught signal is recorded so that [`caught_signals`](System::caught_signals)
//! reports it. Whenever a child process changes its state, `SIGCHLD` is sent to
//! its parent.
//!
//! [`new_child_process`](System::new_child_process) creates a new process and
//! runs the child task synchronously to completion. If the task calls
//! [`execvp`](System::execvp) with one of the [executables] registered in the
//! system state, the process is considered to be running the external program
//! after the task completes. In this case, the process stays running until a
//! signal or a [scheduled event](SystemState::schedule) terminates it, and
//! anything the task writes after the `execvp` call is discarded. Otherwise,
//! the process exits with the exit status of the task when the task completes.
//!
//! # Waiting
//!
//! The virtual system never blocks. When [`sigsuspend`](System::sigsuspend)
//! would block, it runs the first [scheduled event](SystemState::events)
//! instead, which typically changes the state of some processes. It fails with
//! `EDEADLK` if there are no events to run and no signals to be caught.
//!
//! # Standard streams
//!
//! The standard input, output, and error of all processes are shared buffers
//! in the [`SystemState`]. Processes refer to them through their file
//! descriptors.
//!
//! [executables]: SystemState::executables

mod process;

pub use self::process::*;
use super::ChildProcessStarter;
use super::Errno;
use super::SigSet;
use super::SigmaskHow;
use super::Signal;
use super::SignalHandling;
use super::System;
use super::WaitStatus;
use crate::io::Fd;
use crate::job::Pid;
use crate::semantics::ExitStatus;
use std::cell::Ref;
use std::cell::RefCell;
use std::cell::RefMut;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::ffi::CStr;
use std::ffi::CString;
use std::fmt::Debug;
use std::rc::Rc;

/// Simulated system.
///
/// See the [module-level documentation](self) to grasp a basic understanding of
/// `VirtualSystem`.
///
/// A `VirtualSystem` instance has two members: `state` and `process_id`. The
/// former is a [`SystemState`] that effectively contains the state of the
/// system. The state is contained in `Rc` so that processes can share the same
/// state. The latter is a process ID that identifies a process calling the
/// [`System`] interface.
#[derive(Clone, Debug)]
pub struct VirtualSystem {
    /// State of the system.
    pub state: Rc<RefCell<SystemState>>,

    /// Process ID of the process that is interacting with the system.
    pub process_id: Pid,
}

impl VirtualSystem {
    /// Creates a virtual system with an almost empty state.
    ///
    /// The `process_id` of the returned `VirtualSystem` will be 2.
    /// (Process ID 1 has special meaning in some system calls, so we don't use
    /// it as a default value.) The process is the leader of its own process
    /// group and has the standard input, output, and error open as file
    /// descriptors 0, 1, and 2.
    pub fn new() -> VirtualSystem {
        let process_id = Pid::from_raw(2);
        let mut process = Process::with_parent_and_group(Pid::from_raw(1), process_id);
        process.fds.insert(Fd::STDIN, Stream::Stdin);
        process.fds.insert(Fd::STDOUT, Stream::Stdout);
        process.fds.insert(Fd::STDERR, Stream::Stderr);

        let mut state = SystemState::default();
        state.processes.insert(process_id, process);
        let state = Rc::new(RefCell::new(state));
        VirtualSystem { state, process_id }
    }

    /// Finds the current process from the system state.
    ///
    /// # Panics
    ///
    /// This function will panic if it cannot find a process having
    /// `self.process_id`.
    pub fn current_process(&self) -> Ref<'_, Process> {
        Ref::map(self.state.borrow(), |state| {
            &state.processes[&self.process_id]
        })
    }

    /// Finds the current process from the system state.
    ///
    /// # Panics
    ///
    /// This function will panic if it cannot find a process having
    /// `self.process_id`.
    pub fn current_process_mut(&mut self) -> RefMut<'_, Process> {
        RefMut::map(self.state.borrow_mut(), |state| {
            state
                .processes
                .get_mut(&self.process_id)
                .expect("current process not found")
        })
    }

    /// Temporarily applies `mask` to the current process to let pending
    /// signals be delivered.
    ///
    /// Returns true if the process has caught any signals.
    fn catch_with_mask(&mut self, mask: &SigSet) -> bool {
        let mut state = self.state.borrow_mut();
        let process = state
            .processes
            .get_mut(&self.process_id)
            .expect("current process not found");
        let old_mask = *process.blocked_signals();
        let result = process.block_signals(SigmaskHow::SIG_SETMASK, mask);
        let _ = process.block_signals(SigmaskHow::SIG_SETMASK, &old_mask);
        let caught = !process.caught_signals.is_empty();
        let ppid = process.ppid;
        if result.process_state_changed {
            raise_sigchld(&mut state, ppid);
        }
        caught
    }
}

impl Default for VirtualSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for VirtualSystem {
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> nix::Result<usize> {
        let mut state = self.state.borrow_mut();
        let stream = state.processes[&self.process_id].fds.get(&fd).copied();
        match stream {
            Some(Stream::Stdin) => {
                let count = buffer.len().min(state.stdin.len());
                for (slot, byte) in buffer.iter_mut().zip(state.stdin.drain(..count)) {
                    *slot = byte;
                }
                Ok(count)
            }
            Some(Stream::Stdout | Stream::Stderr) | None => Err(Errno::EBADF),
        }
    }

    /// Writes to the standard output or error buffer.
    ///
    /// Writes from a process that has performed a successful `execvp` are
    /// discarded because the calling code would no longer exist in a real
    /// system.
    fn write(&mut self, fd: Fd, buffer: &[u8]) -> nix::Result<usize> {
        let mut state = self.state.borrow_mut();
        let process = &state.processes[&self.process_id];
        let stream = process.fds.get(&fd).copied();
        if process.last_exec.is_some() {
            return stream.map(|_| buffer.len()).ok_or(Errno::EBADF);
        }
        match stream {
            Some(Stream::Stdout) => state.stdout.extend_from_slice(buffer),
            Some(Stream::Stderr) => state.stderr.extend_from_slice(buffer),
            Some(Stream::Stdin) | None => return Err(Errno::EBADF),
        }
        Ok(buffer.len())
    }

    fn dup2(&mut self, from: Fd, to: Fd) -> nix::Result<Fd> {
        let mut process = self.current_process_mut();
        let stream = *process.fds.get(&from).ok_or(Errno::EBADF)?;
        process.fds.insert(to, stream);
        Ok(to)
    }

    fn sigmask(
        &mut self,
        how: SigmaskHow,
        set: Option<&SigSet>,
        oldset: Option<&mut SigSet>,
    ) -> nix::Result<()> {
        let mut state = self.state.borrow_mut();
        let process = state
            .processes
            .get_mut(&self.process_id)
            .expect("current process not found");

        if let Some(oldset) = oldset {
            *oldset = *process.blocked_signals();
        }

        if let Some(set) = set {
            let result = process.block_signals(how, set);
            if result.process_state_changed {
                let parent_pid = process.ppid;
                raise_sigchld(&mut state, parent_pid);
            }
        }

        Ok(())
    }

    fn sigaction(
        &mut self,
        signal: Signal,
        handling: SignalHandling,
    ) -> nix::Result<SignalHandling> {
        if signal == Signal::SIGKILL || signal == Signal::SIGSTOP {
            return Err(Errno::EINVAL);
        }
        let mut process = self.current_process_mut();
        Ok(process.set_signal_handling(signal, handling))
    }

    fn caught_signals(&mut self) -> Vec<Signal> {
        let mut signals = std::mem::take(&mut self.current_process_mut().caught_signals);
        // A real system reports each signal once.
        let mut seen = BTreeSet::new();
        signals.retain(|&signal| seen.insert(signal as i32));
        signals
    }

    /// Sends a signal to the target process.
    ///
    /// A target of 0 means the process group of the current process, -1 means
    /// all processes, and any other negative value means the process group
    /// whose ID is the absolute value.
    fn kill(&mut self, target: Pid, signal: Option<Signal>) -> nix::Result<()> {
        let mut state = self.state.borrow_mut();
        match target.as_raw() {
            0 => {
                let pgid = state.processes[&self.process_id].pgid;
                state.signal_processes(Some(pgid), signal)
            }
            -1 => state.signal_processes(None, signal),
            raw if raw > 0 => state.signal_process(target, signal),
            negative => state.signal_processes(Some(Pid::from_raw(-negative)), signal),
        }
    }

    fn sigsuspend(&mut self, mask: &SigSet) -> nix::Result<()> {
        loop {
            if self.catch_with_mask(mask) {
                return Err(Errno::EINTR);
            }
            let event = self.state.borrow_mut().events.0.pop_front();
            match event {
                Some(event) => event(&mut self.state.borrow_mut()),
                None => return Err(Errno::EDEADLK),
            }
        }
    }

    /// Checks for signals while waiting for input.
    ///
    /// The standard input of a virtual system is always ready for reading, so
    /// this function returns immediately. If `signal_mask` lets a pending
    /// signal be caught, the function fails with `EINTR`.
    fn select(&mut self, reader: Fd, signal_mask: Option<&SigSet>) -> nix::Result<()> {
        if !self.current_process().fds.contains_key(&reader) {
            return Err(Errno::EBADF);
        }
        match signal_mask {
            Some(mask) if self.catch_with_mask(mask) => Err(Errno::EINTR),
            _ => Ok(()),
        }
    }

    fn getpid(&self) -> Pid {
        self.process_id
    }

    /// Modifies the process group ID of a process.
    ///
    /// The current implementation does not support the concept of sessions.
    fn setpgid(&mut self, mut pid: Pid, mut pgid: Pid) -> nix::Result<()> {
        if pgid.as_raw() < 0 {
            return Err(Errno::EINVAL);
        }
        if pid.as_raw() == 0 {
            pid = self.process_id;
        }
        if pgid.as_raw() == 0 {
            pgid = pid;
        }

        let mut state = self.state.borrow_mut();
        if pgid != pid && !state.processes.values().any(|p| p.pgid == pgid) {
            return Err(Errno::EPERM);
        }
        let process = state.processes.get_mut(&pid).ok_or(Errno::ESRCH)?;
        if pid != self.process_id && process.ppid != self.process_id {
            return Err(Errno::ESRCH);
        }
        if process.last_exec.is_some() {
            return Err(Errno::EACCES);
        }

        process.pgid = pgid;
        Ok(())
    }

    /// Creates a new child process.
    ///
    /// This implementation does not create any real child process. Instead,
    /// it returns a child process starter that runs its task to completion in
    /// the same thread before returning the child process ID.
    ///
    /// The process ID of the child will be the maximum of existing process IDs
    /// plus 1.
    fn new_child_process(&mut self) -> nix::Result<ChildProcessStarter<Self>> {
        let mut state = self.state.borrow_mut();
        let process_id = state
            .processes
            .keys()
            .max()
            .map_or(Pid::from_raw(2), |pid| Pid::from_raw(pid.as_raw() + 1));
        let parent_process = &state.processes[&self.process_id];
        let child_process = Process::fork_from(self.process_id, parent_process);
        state.processes.insert(process_id, child_process);
        drop(state);

        let state = Rc::clone(&self.state);
        Ok(Box::new(move |parent_env, task| {
            let system = VirtualSystem { state, process_id };
            let mut child_env = parent_env.clone_with_system(system.clone());
            task(&mut child_env);

            let mut state = system.state.borrow_mut();
            let process = state
                .processes
                .get_mut(&process_id)
                .expect("missing child process");
            if process.last_exec.is_none()
                && process.state() == ProcessState::Running
                && process.set_state(ProcessState::Exited(child_env.exit_status))
            {
                let ppid = process.ppid;
                raise_sigchld(&mut state, ppid);
            }
            process_id
        }))
    }

    /// Reports a child whose state has changed.
    ///
    /// A terminated child is removed from the system once reported. Continued
    /// children are not reported.
    fn wait(&mut self, target: Pid) -> nix::Result<WaitStatus> {
        let parent_pid = self.process_id;
        let mut state = self.state.borrow_mut();
        let children: Vec<Pid> = state
            .processes
            .iter()
            .filter(|(pid, process)| {
                process.ppid == parent_pid && (target.as_raw() == -1 || **pid == target)
            })
            .map(|(pid, _)| *pid)
            .collect();
        if children.is_empty() {
            return Err(Errno::ECHILD);
        }

        for pid in children {
            let process = state.processes.get_mut(&pid).expect("missing child process");
            if !process.state_has_changed() {
                continue;
            }
            let process_state = process.take_state();
            if process_state == ProcessState::Running {
                continue;
            }
            if !process_state.is_alive() {
                state.processes.remove(&pid);
            }
            return Ok(process_state.to_wait_status(pid));
        }
        Ok(WaitStatus::StillAlive)
    }

    /// Stub for the `execvp` system call.
    ///
    /// The `execvp` system call cannot be simulated in the userland. This
    /// function records the arguments in the current process and returns
    /// `ENOSYS` if `file` is one of the [executables](SystemState::executables)
    /// and `ENOENT` otherwise. On success, caught signals are reset to the
    /// default handling as the new image would have them.
    fn execvp(&mut self, file: &CStr, args: &[CString]) -> nix::Result<Infallible> {
        let mut state = self.state.borrow_mut();
        let found = file
            .to_str()
            .is_ok_and(|name| state.executables.contains(name));
        if !found {
            return Err(Errno::ENOENT);
        }
        let process = state
            .processes
            .get_mut(&self.process_id)
            .expect("current process not found");
        process.last_exec = Some((file.to_owned(), args.to_owned()));
        process.reset_caught_signal_handlings();
        Err(Errno::ENOSYS)
    }
}

fn raise_sigchld(state: &mut SystemState, target_pid: Pid) {
    if let Some(target) = state.processes.get_mut(&target_pid) {
        let result = target.raise_signal(Signal::SIGCHLD);
        debug_assert!(!result.process_state_changed);
    }
}

/// Standard stream a file descriptor refers to
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

/// Function that changes the system state while a process is waiting
pub type Event = Box<dyn FnOnce(&mut SystemState)>;

/// Queue of [`Event`]s
#[derive(Default)]
pub struct Events(pub VecDeque<Event>);

impl Debug for Events {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Events")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

/// State of the virtual system.
#[derive(Debug, Default)]
pub struct SystemState {
    /// Processes running in the system
    pub processes: BTreeMap<Pid, Process>,

    /// Content of the standard input not yet read
    pub stdin: VecDeque<u8>,

    /// Content written to the standard output
    pub stdout: Vec<u8>,

    /// Content written to the standard error
    pub stderr: Vec<u8>,

    /// Names of the commands that [`execvp`](System::execvp) can find
    pub executables: BTreeSet<String>,

    /// Events to run when a process would block in
    /// [`sigsuspend`](System::sigsuspend)
    pub events: Events,
}

impl SystemState {
    /// Adds an event to the end of the event queue.
    pub fn schedule<F: FnOnce(&mut SystemState) + 'static>(&mut self, event: F) {
        self.events.0.push_back(Box::new(event));
    }

    /// Sends a signal to a process.
    ///
    /// If `signal` is `None`, only the existence of the process is checked.
    pub fn signal_process(&mut self, pid: Pid, signal: Option<Signal>) -> nix::Result<()> {
        let process = self.processes.get_mut(&pid).ok_or(Errno::ESRCH)?;
        if let Some(signal) = signal {
            let result = process.raise_signal(signal);
            if result.process_state_changed {
                let ppid = process.ppid;
                raise_sigchld(self, ppid);
            }
        }
        Ok(())
    }

    /// Sends a signal to all processes in a process group, or all processes if
    /// `target_pgid` is `None`.
    pub fn signal_processes(
        &mut self,
        target_pgid: Option<Pid>,
        signal: Option<Signal>,
    ) -> nix::Result<()> {
        let targets: Vec<Pid> = self
            .processes
            .iter()
            .filter(|(_, process)| target_pgid.is_none_or(|pgid| process.pgid == pgid))
            .map(|(pid, _)| *pid)
            .collect();
        if targets.is_empty() {
            return Err(Errno::ESRCH);
        }
        for pid in targets {
            self.signal_process(pid, signal)?;
        }
        Ok(())
    }

    /// Terminates a process with an exit status.
    ///
    /// This simulates an external program exiting by itself.
    pub fn exit_process(&mut self, pid: Pid, exit_status: ExitStatus) {
        if let Some(process) = self.processes.get_mut(&pid) {
            if process.state().is_alive() && process.set_state(ProcessState::Exited(exit_status)) {
                let ppid = process.ppid;
                raise_sigchld(self, ppid);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Env;
    use crate::system::signal_set;
    use assert_matches::assert_matches;

    fn system_with_child() -> (VirtualSystem, Pid) {
        let system = VirtualSystem::new();
        let child = Pid::from_raw(10);
        let process = Process::with_parent_and_group(system.process_id, child);
        system.state.borrow_mut().processes.insert(child, process);
        (system, child)
    }

    #[test]
    fn read_and_write_standard_streams() {
        let mut system = VirtualSystem::new();
        system.state.borrow_mut().stdin.extend(b"abc");
        let mut buffer = [0; 2];
        assert_eq!(system.read(Fd::STDIN, &mut buffer), Ok(2));
        assert_eq!(&buffer, b"ab");
        assert_eq!(system.read(Fd::STDIN, &mut buffer), Ok(1));
        assert_eq!(system.read(Fd::STDIN, &mut buffer), Ok(0));

        assert_eq!(system.write(Fd::STDOUT, b"out"), Ok(3));
        assert_eq!(system.write(Fd::STDERR, b"err"), Ok(3));
        assert_eq!(system.write(Fd(5), b"x"), Err(Errno::EBADF));
        let state = system.state.borrow();
        assert_eq!(state.stdout, b"out");
        assert_eq!(state.stderr, b"err");
    }

    #[test]
    fn dup2_redirects_stderr_to_stdout() {
        let mut system = VirtualSystem::new();
        system.dup2(Fd::STDOUT, Fd::STDERR).unwrap();
        system.write(Fd::STDERR, b"err").unwrap();
        assert_eq!(system.state.borrow().stdout, b"err");
    }

    #[test]
    fn kill_process_group() {
        let (mut system, child) = system_with_child();
        let result = system.kill(Pid::from_raw(-child.as_raw()), Some(Signal::SIGTSTP));
        assert_eq!(result, Ok(()));
        let state = system.state.borrow();
        assert_eq!(
            state.processes[&child].state(),
            ProcessState::Stopped(Signal::SIGTSTP)
        );
        // The parent received SIGCHLD, which has no effect by default.
        assert_eq!(
            state.processes[&system.process_id].state(),
            ProcessState::Running
        );
    }

    #[test]
    fn kill_non_existent_process_group() {
        let mut system = VirtualSystem::new();
        let result = system.kill(Pid::from_raw(-50), Some(Signal::SIGINT));
        assert_eq!(result, Err(Errno::ESRCH));
        let result = system.kill(Pid::from_raw(50), None);
        assert_eq!(result, Err(Errno::ESRCH));
    }

    #[test]
    fn sigchld_is_caught_on_child_state_change() {
        let (mut system, child) = system_with_child();
        system.sigaction(Signal::SIGCHLD, SignalHandling::Catch).unwrap();
        system
            .state
            .borrow_mut()
            .signal_process(child, Some(Signal::SIGINT))
            .unwrap();
        assert_eq!(system.caught_signals(), [Signal::SIGCHLD]);
        assert_eq!(system.caught_signals(), []);
    }

    #[test]
    fn sigsuspend_runs_events_until_signal_is_caught() {
        let (mut system, child) = system_with_child();
        system.sigaction(Signal::SIGCHLD, SignalHandling::Catch).unwrap();
        let set = signal_set([Signal::SIGCHLD]);
        system.sigmask(SigmaskHow::SIG_BLOCK, Some(&set), None).unwrap();
        system
            .state
            .borrow_mut()
            .schedule(move |state| state.exit_process(child, ExitStatus(3)));

        let result = system.sigsuspend(&SigSet::empty());
        assert_eq!(result, Err(Errno::EINTR));
        assert_eq!(system.caught_signals(), [Signal::SIGCHLD]);
        assert!(system.current_process().blocked_signals().contains(Signal::SIGCHLD));

        let result = system.sigsuspend(&SigSet::empty());
        assert_eq!(result, Err(Errno::EDEADLK));
    }

    #[test]
    fn select_is_interrupted_by_pending_signal() {
        let (mut system, child) = system_with_child();
        system.sigaction(Signal::SIGCHLD, SignalHandling::Catch).unwrap();
        let set = signal_set([Signal::SIGCHLD]);
        system.sigmask(SigmaskHow::SIG_BLOCK, Some(&set), None).unwrap();
        assert_eq!(system.select(Fd::STDIN, Some(&SigSet::empty())), Ok(()));

        let _ = system.kill(child, Some(Signal::SIGTERM));
        assert_eq!(system.caught_signals(), []);
        let result = system.select(Fd::STDIN, Some(&SigSet::empty()));
        assert_eq!(result, Err(Errno::EINTR));
        assert_eq!(system.caught_signals(), [Signal::SIGCHLD]);
    }

    #[test]
    fn wait_reports_changes_and_reaps() {
        let (mut system, child) = system_with_child();
        assert_eq!(system.wait(Pid::from_raw(-1)), Ok(WaitStatus::StillAlive));

        system.kill(child, Some(Signal::SIGTSTP)).unwrap();
        assert_eq!(
            system.wait(Pid::from_raw(-1)),
            Ok(WaitStatus::Stopped(child, Signal::SIGTSTP))
        );
        assert_eq!(system.wait(Pid::from_raw(-1)), Ok(WaitStatus::StillAlive));

        system.kill(child, Some(Signal::SIGCONT)).unwrap();
        assert_eq!(system.wait(Pid::from_raw(-1)), Ok(WaitStatus::StillAlive));

        system.kill(child, Some(Signal::SIGINT)).unwrap();
        assert_eq!(
            system.wait(Pid::from_raw(-1)),
            Ok(WaitStatus::Signaled(child, Signal::SIGINT, false))
        );
        assert_eq!(system.wait(Pid::from_raw(-1)), Err(Errno::ECHILD));
        assert!(!system.state.borrow().processes.contains_key(&child));
    }

    #[test]
    fn setpgid_of_child() {
        let (mut system, child) = system_with_child();
        assert_eq!(system.setpgid(child, child), Ok(()));
        assert_eq!(
            system.setpgid(child, Pid::from_raw(77)),
            Err(Errno::EPERM)
        );
        assert_eq!(
            system.setpgid(Pid::from_raw(77), Pid::from_raw(0)),
            Err(Errno::ESRCH)
        );
    }

    #[test]
    fn execvp_records_arguments() {
        let mut system = VirtualSystem::new();
        system
            .state
            .borrow_mut()
            .executables
            .insert("sleep".to_string());
        let file = CString::new("sleep").unwrap();
        let args = [file.clone(), CString::new("10").unwrap()];
        assert_eq!(system.execvp(&file, &args), Err(Errno::ENOSYS));
        assert_eq!(
            system.current_process().last_exec(),
            &Some((file, args.to_vec()))
        );

        // Writes after a successful exec are discarded.
        assert_eq!(system.write(Fd::STDOUT, b"lost"), Ok(4));
        assert_eq!(system.state.borrow().stdout, b"");
    }

    #[test]
    fn execvp_resets_caught_signals_to_default() {
        let mut system = VirtualSystem::new();
        system
            .state
            .borrow_mut()
            .executables
            .insert("sleep".to_string());
        system.sigaction(Signal::SIGINT, SignalHandling::Catch).unwrap();
        system.sigaction(Signal::SIGQUIT, SignalHandling::Ignore).unwrap();

        let file = CString::new("sleep").unwrap();
        assert_eq!(system.execvp(&file, &[file.clone()]), Err(Errno::ENOSYS));
        let process = system.current_process();
        assert_eq!(process.signal_handling(Signal::SIGINT), SignalHandling::Default);
        assert_eq!(process.signal_handling(Signal::SIGQUIT), SignalHandling::Ignore);
    }

    #[test]
    fn failed_execvp_keeps_caught_signals() {
        let mut system = VirtualSystem::new();
        system.sigaction(Signal::SIGINT, SignalHandling::Catch).unwrap();
        let file = CString::new("no_such_command").unwrap();
        assert_eq!(system.execvp(&file, &[file.clone()]), Err(Errno::ENOENT));
        let handling = system.current_process().signal_handling(Signal::SIGINT);
        assert_eq!(handling, SignalHandling::Catch);
    }

    #[test]
    fn execvp_not_found() {
        let mut system = VirtualSystem::new();
        let file = CString::new("no_such_command").unwrap();
        assert_eq!(system.execvp(&file, &[file.clone()]), Err(Errno::ENOENT));
        assert_eq!(system.current_process().last_exec(), &None);
    }

    #[test]
    fn child_process_exits_with_task_exit_status() {
        let system = VirtualSystem::new();
        let state = Rc::clone(&system.state);
        let mut env = Env::with_system(system);
        env.system
            .sigaction(Signal::SIGCHLD, SignalHandling::Catch)
            .unwrap();

        let starter = env.system.new_child_process().unwrap();
        let child = starter(
            &mut env,
            Box::new(|env| {
                assert_eq!(env.system.getpid(), Pid::from_raw(3));
                env.exit_status = ExitStatus(42);
            }),
        );
        assert_eq!(child, Pid::from_raw(3));
        assert_matches!(
            state.borrow().processes[&child].state(),
            ProcessState::Exited(ExitStatus(42))
        );
        assert_eq!(env.system.caught_signals(), [Signal::SIGCHLD]);
        assert_eq!(
            env.system.wait(Pid::from_raw(-1)),
            Ok(WaitStatus::Exited(child, 42))
        );
    }

    #[test]
    fn child_process_keeps_running_after_exec() {
        let system = VirtualSystem::new();
        let state = Rc::clone(&system.state);
        state.borrow_mut().executables.insert("cat".to_string());
        let mut env = Env::with_system(system);

        let starter = env.system.new_child_process().unwrap();
        let child = starter(
            &mut env,
            Box::new(|env| {
                let file = CString::new("cat").unwrap();
                let _ = env.system.execvp(&file, &[file.clone()]);
                env.exit_status = ExitStatus(1);
            }),
        );
        assert_eq!(state.borrow().processes[&child].state(), ProcessState::Running);
        assert_eq!(env.system.wait(Pid::from_raw(-1)), Ok(WaitStatus::StillAlive));
    }
}

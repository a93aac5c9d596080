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

//! [System] and its implementors.
//!
//! The [`System`] trait abstracts the system calls the shell makes. The
//! [`RealSystem`](real::RealSystem) implementation performs the actual system
//! calls, while the [`VirtualSystem`](r#virtual::VirtualSystem) simulates them
//! in memory so that the shell's behavior can be tested without creating real
//! processes.

pub mod real;
pub mod r#virtual;

use crate::Env;
use crate::io::Fd;
use crate::job::Pid;
#[doc(no_inline)]
pub use nix::errno::Errno;
#[doc(no_inline)]
pub use nix::sys::signal::SigSet;
#[doc(no_inline)]
pub use nix::sys::signal::SigmaskHow;
#[doc(no_inline)]
pub use nix::sys::signal::Signal;
#[doc(no_inline)]
pub use nix::sys::wait::WaitStatus;
use std::convert::Infallible;
use std::ffi::CStr;
use std::ffi::CString;
use std::fmt::Debug;

/// API to the system-managed parts of the environment.
///
/// The `System` trait defines a collection of methods to access the underlying
/// operating system from the shell as an application program. There are two
/// substantial implementors for this trait:
/// [`RealSystem`](real::RealSystem) and
/// [`VirtualSystem`](r#virtual::VirtualSystem).
pub trait System: Debug {
    /// Reads from the file descriptor.
    ///
    /// This is a thin wrapper around the `read` system call. Unlike the
    /// system call, this function retries on `EINTR`.
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> nix::Result<usize>;

    /// Writes to the file descriptor.
    ///
    /// This is a thin wrapper around the `write` system call. Unlike the
    /// system call, this function retries on `EINTR`.
    fn write(&mut self, fd: Fd, buffer: &[u8]) -> nix::Result<usize>;

    /// Duplicates a file descriptor onto another.
    fn dup2(&mut self, from: Fd, to: Fd) -> nix::Result<Fd>;

    /// Gets and/or sets the signal blocking mask.
    fn sigmask(
        &mut self,
        how: SigmaskHow,
        set: Option<&SigSet>,
        oldset: Option<&mut SigSet>,
    ) -> nix::Result<()>;

    /// Sets how a signal is handled.
    ///
    /// Returns the previous handling.
    fn sigaction(&mut self, signal: Signal, handling: SignalHandling)
    -> nix::Result<SignalHandling>;

    /// Returns signals this process has caught, if any.
    ///
    /// An implementor records a signal when it is caught by the handler set by
    /// [`sigaction`](Self::sigaction) with [`SignalHandling::Catch`]. This
    /// function returns the recorded signals in the order they were caught and
    /// forgets them. A signal caught more than once before this function is
    /// called may be reported only once.
    fn caught_signals(&mut self) -> Vec<Signal>;

    /// Sends a signal.
    ///
    /// A negative `target` denotes the process group whose ID is `-target`.
    /// If `signal` is `None`, no signal is sent but the target is checked for
    /// existence.
    fn kill(&mut self, target: Pid, signal: Option<Signal>) -> nix::Result<()>;

    /// Waits for a signal with a temporary signal blocking mask.
    ///
    /// The blocking mask is replaced with `mask` until a signal is caught and
    /// then restored. This function returns `Err(Errno::EINTR)` when a signal
    /// has been caught.
    fn sigsuspend(&mut self, mask: &SigSet) -> nix::Result<()>;

    /// Waits until the file descriptor is ready for reading.
    ///
    /// If `signal_mask` is `Some`, the blocking mask is replaced with it while
    /// waiting, and the function returns `Err(Errno::EINTR)` if a signal is
    /// caught in the meantime.
    fn select(&mut self, reader: Fd, signal_mask: Option<&SigSet>) -> nix::Result<()>;

    /// Returns the process ID of the current process.
    fn getpid(&self) -> Pid;

    /// Modifies the process group ID of a process.
    ///
    /// A zero `pid` means the current process and a zero `pgid` means the
    /// same as `pid`.
    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> nix::Result<()>;

    /// Creates a new child process.
    ///
    /// This is a wrapper around the `fork` system call. Users of [`Env`]
    /// should use [`Subshell`](crate::subshell::Subshell) instead.
    ///
    /// If successful, this function returns a [`ChildProcessStarter`] in the
    /// parent. Calling it with a task runs the task in the child and returns
    /// the child's process ID in the parent.
    fn new_child_process(&mut self) -> nix::Result<ChildProcessStarter<Self>>
    where
        Self: Sized;

    /// Reports a child whose status has changed, without blocking.
    ///
    /// This is a wrapper around the `waitpid` system call with the `WNOHANG`
    /// and `WUNTRACED` flags. A `target` of `-1` means any child. The function
    /// returns `WaitStatus::StillAlive` if there are children but none of them
    /// has changed its status, and `Err(Errno::ECHILD)` if there are no
    /// children to wait for.
    fn wait(&mut self, target: Pid) -> nix::Result<WaitStatus>;

    /// Replaces the current process image, searching `$PATH` for `file`.
    ///
    /// This function returns only on failure.
    fn execvp(&mut self, file: &CStr, args: &[CString]) -> nix::Result<Infallible>;
}

/// How to handle a signal
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SignalHandling {
    /// Perform the default action for the signal.
    #[default]
    Default,
    /// Ignore the signal.
    Ignore,
    /// Catch the signal.
    Catch,
}

/// Task executed in a child process
pub type ChildProcessTask<S> = Box<dyn FnOnce(&mut Env<S>)>;

/// Abstract function that starts a child process
///
/// [`System::new_child_process`] returns a child process starter. You need to
/// pass the parent environment and a task to run in the child.
///
/// The starter returns the child process ID in the parent. In the child
/// process, the starter runs the task and exits the process with the exit
/// status held in the child environment.
pub type ChildProcessStarter<S> = Box<dyn FnOnce(&mut Env<S>, ChildProcessTask<S>) -> Pid>;

/// Extension for [`System`]
///
/// This trait provides some extension methods for `System`.
pub trait SystemEx: System {
    /// Writes the whole buffer to the file descriptor.
    ///
    /// This function calls [`write`](System::write) repeatedly until the whole
    /// `buffer` is written.
    fn write_all(&mut self, fd: Fd, mut buffer: &[u8]) -> nix::Result<()> {
        while !buffer.is_empty() {
            match self.write(fd, buffer) {
                Ok(0) => return Err(Errno::EIO),
                Ok(count) => buffer = &buffer[count..],
                Err(Errno::EINTR) => (),
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }
}

impl<T: System + ?Sized> SystemEx for T {}

/// Returns a signal set containing the given signals.
#[must_use]
pub fn signal_set<I: IntoIterator<Item = Signal>>(signals: I) -> SigSet {
    let mut set = SigSet::empty();
    for signal in signals {
        set.add(signal);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::r#virtual::VirtualSystem;
    use super::*;

    #[test]
    fn write_all_writes_everything() {
        let mut system = VirtualSystem::new();
        system.write_all(Fd::STDOUT, b"hello, ").unwrap();
        system.write_all(Fd::STDOUT, b"world\n").unwrap();
        system.write_all(Fd::STDOUT, b"").unwrap();
        assert_eq!(system.state.borrow().stdout, b"hello, world\n");
    }

    #[test]
    fn signal_set_from_signals() {
        let set = signal_set([Signal::SIGCHLD, Signal::SIGINT]);
        assert!(set.contains(Signal::SIGCHLD));
        assert!(set.contains(Signal::SIGINT));
        assert!(!set.contains(Signal::SIGTSTP));
    }
}

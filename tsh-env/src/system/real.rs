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

//! Implementation of `System` that actually interacts with the system.
//!
//! Signals are handled in two steps. The signal-catching function
//! [`catch_signal`] only records the signal number in a static array of
//! atomic slots. The shell later takes the recorded signals out with
//! [`caught_signals`](System::caught_signals) and acts on them outside the
//! signal handler.

use super::ChildProcessStarter;
use super::Errno;
use super::SigSet;
use super::SigmaskHow;
use super::Signal;
use super::SignalHandling;
use super::System;
use super::WaitStatus;
#[cfg(doc)]
use crate::Env;
use crate::io::Fd;
use crate::job::Pid;
use nix::sys::signal::SaFlags;
use nix::sys::signal::SigAction;
use nix::sys::signal::SigHandler;
use nix::sys::wait::WaitPidFlag;
use std::convert::Infallible;
use std::ffi::CStr;
use std::ffi::CString;
use std::ffi::c_int;
use std::mem::MaybeUninit;
use std::sync::atomic::AtomicIsize;
use std::sync::atomic::Ordering;
use std::sync::atomic::compiler_fence;

static CAUGHT_SIGNALS: [AtomicIsize; 8] = {
    // In the array creation, the repeat operand must be const.
    #[allow(clippy::declare_interior_mutable_const)]
    const SIGNAL_SLOT: AtomicIsize = AtomicIsize::new(0);
    [SIGNAL_SLOT; 8]
};

/// Signal catching function.
///
/// The function records the signal in the first free slot of
/// `CAUGHT_SIGNALS` unless a slot already holds it.
extern "C" fn catch_signal(signal: c_int) {
    // This function can only perform async-signal-safe operations.
    // Performing unsafe operations is undefined behavior!
    let signal = signal as isize;
    for slot in &CAUGHT_SIGNALS {
        match slot.compare_exchange(0, signal, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(slot_value) if slot_value == signal => break,
            _ => continue,
        }
    }
}

/// Implementation of `System` that actually interacts with the system.
///
/// `RealSystem` is an empty `struct` because the underlying operating system
/// manages the system's internal state.
#[derive(Debug)]
pub struct RealSystem(());

impl RealSystem {
    /// Returns an instance of `RealSystem`.
    ///
    /// # Safety
    ///
    /// This function is marked `unsafe` because improper use of `RealSystem`
    /// may lead to undefined behavior. Remember that most operations performed
    /// on the system by [`Env`] are not thread-safe. You should never use
    /// `RealSystem` in a multi-threaded program, and it is your responsibility
    /// to make sure you are using only one instance of `RealSystem` in the
    /// process.
    pub unsafe fn new() -> Self {
        RealSystem(())
    }
}

impl System for RealSystem {
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> nix::Result<usize> {
        loop {
            let result = unsafe { libc::read(fd.0, buffer.as_mut_ptr().cast(), buffer.len()) };
            match Errno::result(result) {
                Err(Errno::EINTR) => continue,
                result => return result.map(|count| count as usize),
            }
        }
    }

    fn write(&mut self, fd: Fd, buffer: &[u8]) -> nix::Result<usize> {
        loop {
            let result = unsafe { libc::write(fd.0, buffer.as_ptr().cast(), buffer.len()) };
            match Errno::result(result) {
                Err(Errno::EINTR) => continue,
                result => return result.map(|count| count as usize),
            }
        }
    }

    fn dup2(&mut self, from: Fd, to: Fd) -> nix::Result<Fd> {
        loop {
            let result = unsafe { libc::dup2(from.0, to.0) };
            match Errno::result(result) {
                Err(Errno::EINTR) => continue,
                result => return result.map(Fd),
            }
        }
    }

    fn sigmask(
        &mut self,
        how: SigmaskHow,
        set: Option<&SigSet>,
        oldset: Option<&mut SigSet>,
    ) -> nix::Result<()> {
        nix::sys::signal::sigprocmask(how, set, oldset)
    }

    fn sigaction(
        &mut self,
        signal: Signal,
        handling: SignalHandling,
    ) -> nix::Result<SignalHandling> {
        let handler = match handling {
            SignalHandling::Default => SigHandler::SigDfl,
            SignalHandling::Ignore => SigHandler::SigIgn,
            SignalHandling::Catch => SigHandler::Handler(catch_signal),
        };
        // SA_RESTART keeps reads and writes going; the waiting functions are
        // interrupted regardless.
        let new_action = SigAction::new(handler, SaFlags::SA_RESTART, SigSet::empty());
        // SAFETY: The `catch_signal` function only accesses atomic variables.
        let old_action = unsafe { nix::sys::signal::sigaction(signal, &new_action) }?;
        let old_handling = match old_action.handler() {
            SigHandler::SigDfl => SignalHandling::Default,
            SigHandler::SigIgn => SignalHandling::Ignore,
            SigHandler::Handler(_) | SigHandler::SigAction(_) => SignalHandling::Catch,
        };
        Ok(old_handling)
    }

    fn caught_signals(&mut self) -> Vec<Signal> {
        let mut signals = Vec::new();
        for slot in &CAUGHT_SIGNALS {
            // Need a fence to ensure we examine the slots in order.
            compiler_fence(Ordering::Acquire);

            let signal = slot.swap(0, Ordering::Relaxed);
            if signal == 0 {
                // The `catch_signal` function always fills the first unused
                // slot, so there is no more slot filled with a signal.
                break;
            }

            if let Ok(signal) = Signal::try_from(signal as c_int) {
                signals.push(signal)
            } else {
                // ignore unknown signal
            }
        }
        signals
    }

    fn kill(&mut self, target: Pid, signal: Option<Signal>) -> nix::Result<()> {
        nix::sys::signal::kill(target, signal)
    }

    fn sigsuspend(&mut self, mask: &SigSet) -> nix::Result<()> {
        // sigsuspend returns only when interrupted.
        unsafe { libc::sigsuspend(mask.as_ref()) };
        Err(Errno::last())
    }

    fn select(&mut self, reader: Fd, signal_mask: Option<&SigSet>) -> nix::Result<()> {
        let mut readers = MaybeUninit::<libc::fd_set>::uninit();
        let mut readers = unsafe {
            libc::FD_ZERO(readers.as_mut_ptr());
            libc::FD_SET(reader.0, readers.as_mut_ptr());
            readers.assume_init()
        };
        let signal_mask = signal_mask.map_or(std::ptr::null(), |mask| {
            let mask: &libc::sigset_t = mask.as_ref();
            mask as *const libc::sigset_t
        });
        let result = unsafe {
            libc::pselect(
                reader.0 + 1,
                &mut readers,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null(),
                signal_mask,
            )
        };
        Errno::result(result).map(drop)
    }

    fn getpid(&self) -> Pid {
        nix::unistd::getpid()
    }

    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> nix::Result<()> {
        nix::unistd::setpgid(pid, pgid)
    }

    /// Creates a new child process.
    ///
    /// This implementation calls the `fork` system call and returns in both
    /// the parent and child process. In the parent, the returned starter
    /// ignores its arguments and returns the child process ID. In the child,
    /// the starter runs the task and exits the process.
    fn new_child_process(&mut self) -> nix::Result<ChildProcessStarter<Self>> {
        use nix::unistd::ForkResult::*;
        // SAFETY: As stated on RealSystem::new, the caller is responsible for
        // making only one instance of RealSystem in the process.
        match unsafe { nix::unistd::fork()? } {
            Parent { child } => Ok(Box::new(move |_env, _task| child)),
            Child => Ok(Box::new(|env, task| {
                task(env);
                std::process::exit(env.exit_status.0)
            })),
        }
    }

    fn wait(&mut self, target: Pid) -> nix::Result<WaitStatus> {
        let options = WaitPidFlag::WUNTRACED | WaitPidFlag::WNOHANG;
        nix::sys::wait::waitpid(target, Some(options))
    }

    fn execvp(&mut self, file: &CStr, args: &[CString]) -> nix::Result<Infallible> {
        loop {
            let result = nix::unistd::execvp(file, args);
            if result != Err(Errno::EINTR) {
                return result;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // This test depends on static variables.
    #[test]
    fn real_system_caught_signals() {
        unsafe {
            let mut system = RealSystem::new();
            let result = system.caught_signals();
            assert_eq!(result, []);

            catch_signal(Signal::SIGINT as c_int);
            catch_signal(Signal::SIGTSTP as c_int);
            catch_signal(Signal::SIGTSTP as c_int);
            catch_signal(Signal::SIGCHLD as c_int);

            let result = system.caught_signals();
            assert_eq!(result, [Signal::SIGINT, Signal::SIGTSTP, Signal::SIGCHLD]);
            let result = system.caught_signals();
            assert_eq!(result, []);
        }
    }

    #[test]
    fn real_system_wait_without_children() {
        let mut system = unsafe { RealSystem::new() };
        // The test harness may have children of its own, so either result is
        // acceptable as long as the call does not block.
        match system.wait(Pid::from_raw(-1)) {
            Ok(_) | Err(Errno::ECHILD) => (),
            Err(errno) => panic!("unexpected error {errno}"),
        }
    }
}

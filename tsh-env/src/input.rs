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

//! Reading command lines
//!
//! [`FdReader`] reads a file descriptor line by line. Before each read, it
//! waits for the file descriptor to become readable with
//! [`System::select`], temporarily applying the signal mask given by the
//! caller. This lets a caught signal interrupt the wait so that the caller can
//! handle the signal before the user enters the next line.

use crate::io::Fd;
use crate::system::SigSet;
use crate::system::System;
use std::slice::from_mut;

/// Maximum length of a command line in bytes, including the terminating null
/// byte of the C string that would hold it.
///
/// A line of `MAX_LINE - 1` or more bytes is returned in pieces.
pub const MAX_LINE: usize = 1024;

/// Line reader for a file descriptor.
///
/// The reader keeps the bytes of an incomplete line when it is interrupted, so
/// the next call to [`next_line`](Self::next_line) resumes the line.
#[derive(Clone, Debug, Eq, PartialEq)]
#[must_use = "FdReader does nothing unless you read lines from it"]
pub struct FdReader {
    /// File descriptor to read from
    fd: Fd,
    /// Bytes of the line being read
    pending: Vec<u8>,
}

impl FdReader {
    /// Creates a new `FdReader` instance.
    pub fn new(fd: Fd) -> Self {
        let pending = Vec::new();
        FdReader { fd, pending }
    }

    /// Reads the next line.
    ///
    /// Returns the line including the trailing newline. If the input ends
    /// without a newline, the remaining bytes are returned with a newline
    /// appended. At the end of input, returns `Ok(None)`.
    ///
    /// `signal_mask` is applied while waiting for input. If a signal is caught
    /// during the wait, this function fails with `EINTR` and keeps the bytes
    /// read so far for the next call.
    pub fn next_line<S: System>(
        &mut self,
        system: &mut S,
        signal_mask: Option<&SigSet>,
    ) -> nix::Result<Option<String>> {
        while self.pending.len() < MAX_LINE - 1 {
            system.select(self.fd, signal_mask)?;

            let mut byte = 0;
            match system.read(self.fd, from_mut(&mut byte))? {
                // End of input
                0 => {
                    if self.pending.is_empty() {
                        return Ok(None);
                    }
                    self.pending.push(b'\n');
                    break;
                }

                _ => {
                    self.pending.push(byte);
                    if byte == b'\n' {
                        break;
                    }
                }
            }
        }

        let bytes = std::mem::take(&mut self.pending);
        let line = String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(&e.into_bytes()).into());
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VirtualSystem;
    use crate::job::Pid;
    use crate::system::Errno;
    use crate::system::SigmaskHow;
    use crate::system::Signal;
    use crate::system::SignalHandling;
    use crate::system::r#virtual::Process;
    use crate::system::signal_set;

    fn system_with_input(input: &str) -> VirtualSystem {
        let system = VirtualSystem::new();
        system.state.borrow_mut().stdin.extend(input.as_bytes());
        system
    }

    #[test]
    fn empty_input() {
        let mut system = system_with_input("");
        let mut reader = FdReader::new(Fd::STDIN);
        assert_eq!(reader.next_line(&mut system, None), Ok(None));
    }

    #[test]
    fn lines_with_newlines() {
        let mut system = system_with_input("jobs\nfg %1\n");
        let mut reader = FdReader::new(Fd::STDIN);
        let line = reader.next_line(&mut system, None).unwrap();
        assert_eq!(line.as_deref(), Some("jobs\n"));
        let line = reader.next_line(&mut system, None).unwrap();
        assert_eq!(line.as_deref(), Some("fg %1\n"));
        assert_eq!(reader.next_line(&mut system, None), Ok(None));
    }

    #[test]
    fn last_line_without_newline() {
        let mut system = system_with_input("quit");
        let mut reader = FdReader::new(Fd::STDIN);
        let line = reader.next_line(&mut system, None).unwrap();
        assert_eq!(line.as_deref(), Some("quit\n"));
        assert_eq!(reader.next_line(&mut system, None), Ok(None));
    }

    #[test]
    fn long_line_is_split() {
        let input = format!("{}\n", "x".repeat(MAX_LINE + 10));
        let mut system = system_with_input(&input);
        let mut reader = FdReader::new(Fd::STDIN);
        let first = reader.next_line(&mut system, None).unwrap().unwrap();
        assert_eq!(first.len(), MAX_LINE - 1);
        assert!(!first.ends_with('\n'));
        let second = reader.next_line(&mut system, None).unwrap().unwrap();
        assert_eq!(second.len(), 12);
        assert!(second.ends_with('\n'));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut system = VirtualSystem::new();
        system.state.borrow_mut().stdin.extend(b"a\xFFb\n");
        let mut reader = FdReader::new(Fd::STDIN);
        let line = reader.next_line(&mut system, None).unwrap();
        assert_eq!(line.as_deref(), Some("a\u{FFFD}b\n"));
    }

    #[test]
    fn interrupted_by_caught_signal() {
        let mut system = system_with_input("jobs\n");
        let child = Pid::from_raw(5);
        let process = Process::with_parent_and_group(system.process_id, child);
        system.state.borrow_mut().processes.insert(child, process);
        system
            .sigaction(Signal::SIGCHLD, SignalHandling::Catch)
            .unwrap();
        let set = signal_set([Signal::SIGCHLD]);
        system
            .sigmask(SigmaskHow::SIG_BLOCK, Some(&set), None)
            .unwrap();
        system.kill(child, Some(Signal::SIGKILL)).unwrap();

        let mut reader = FdReader::new(Fd::STDIN);
        let empty = SigSet::empty();
        let result = reader.next_line(&mut system, Some(&empty));
        assert_eq!(result, Err(Errno::EINTR));
        assert_eq!(system.caught_signals(), [Signal::SIGCHLD]);

        let line = reader.next_line(&mut system, Some(&empty)).unwrap();
        assert_eq!(line.as_deref(), Some("jobs\n"));
    }
}

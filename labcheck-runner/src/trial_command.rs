// Copyright (c) The labcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spawning and output collection for trial processes.

use bytes::{Bytes, BytesMut};
use camino::Utf8Path;
use std::{io, process::Stdio, time::Duration};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::{Child, ChildStdout},
};
use tracing::debug;

/// The size of the buffered reader's buffer, and the granularity at which the
/// accumulator grows.
const CHUNK_SIZE: usize = 4 * 1024;

/// How long [`StdoutAccumulator::drain`] waits for the pipe to reach EOF.
///
/// A killed child's own children may inherit the write end and keep it open;
/// they must not stall the next trial.
const DRAIN_TIMEOUT: Duration = Duration::from_millis(100);

/// A to-be-run trial command for a target program.
///
/// The target contract is fixed: no arguments, no standard input, run from
/// the current directory, result written to standard output. Standard error
/// stays attached to the parent's so a chatty solution can never block on a
/// full pipe.
pub(crate) struct TrialCommand {
    command: std::process::Command,
}

impl TrialCommand {
    pub(crate) fn new(program: &Utf8Path) -> Self {
        // A bare `part1` must resolve relative to the current directory, not
        // through PATH.
        let program = if program.components().count() == 1 {
            Utf8Path::new(".").join(program)
        } else {
            program.to_owned()
        };

        let mut command = std::process::Command::new(&program);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        Self { command }
    }

    pub(crate) fn spawn(self) -> io::Result<TrialChild> {
        let mut command = tokio::process::Command::from(self.command);
        let mut child = command.spawn()?;
        let stdout = child.stdout.take().expect("stdout was set to piped");

        Ok(TrialChild {
            child,
            stdout: StdoutAccumulator::new(stdout),
        })
    }
}

/// A spawned trial process along with its stdout accumulator.
pub(crate) struct TrialChild {
    pub(crate) child: Child,
    pub(crate) stdout: StdoutAccumulator,
}

/// Accumulates a child's standard output.
///
/// `fill_buf` is cancel-safe, so it can be raced inside a `select!` against
/// process exit and the trial deadline without losing data.
pub(crate) struct StdoutAccumulator {
    reader: BufReader<ChildStdout>,
    buf: BytesMut,
    done: bool,
}

impl StdoutAccumulator {
    fn new(stdout: ChildStdout) -> Self {
        Self {
            reader: BufReader::with_capacity(CHUNK_SIZE, stdout),
            buf: BytesMut::with_capacity(CHUNK_SIZE),
            done: false,
        }
    }

    /// Reads the next available chunk of output. Does nothing once the pipe
    /// has reached EOF or errored.
    pub(crate) async fn fill_buf(&mut self) {
        if self.done {
            return;
        }

        match self.reader.fill_buf().await {
            Ok(chunk) => {
                if chunk.is_empty() {
                    self.done = true;
                }
                let len = chunk.len();
                self.buf.extend_from_slice(chunk);
                self.reader.consume(len);
            }
            Err(error) => {
                // Read errors never abort a trial: it is scored on whatever
                // bytes were captured before the error.
                debug!(%error, "error reading trial stdout");
                self.done = true;
            }
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    /// Reads any output still buffered in the pipe, then freezes the
    /// accumulated bytes.
    ///
    /// Called after the child has been reaped, so this normally terminates
    /// as soon as the pipe is exhausted. The wait for EOF is bounded by
    /// [`DRAIN_TIMEOUT`]: draining is best-effort.
    pub(crate) async fn drain(mut self) -> Bytes {
        let mut sleep = std::pin::pin!(tokio::time::sleep(DRAIN_TIMEOUT));
        while !self.done {
            tokio::select! {
                () = self.fill_buf() => {}
                () = &mut sleep => break,
            }
        }
        self.buf.freeze()
    }
}

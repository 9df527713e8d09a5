//! `ScriptedSource` - replays iterator output from memory.
//!
//! Each `open()` replays the same script from the start, one step per read.
//! Byte steps longer than the read buffer are split across reads the way a
//! seq_file would, so a captured raw dump can be replayed as a single step.

use std::collections::VecDeque;
use std::io;

use nsiter_core::source::IterSource;
use nsiter_core::stream::{ByteStream, ReadOutcome};

/// One read of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Return these bytes.
    Bytes(Vec<u8>),
    /// Return these bytes and report an error in the same read.
    BytesWithError(Vec<u8>, io::ErrorKind),
    /// Return no bytes, only an error.
    Error(io::ErrorKind),
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    steps: Vec<Step>,
    open_error: Option<io::ErrorKind>,
    opens: usize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay a raw dump of concatenated records.
    pub fn from_dump(dump: Vec<u8>) -> Self {
        Self::new().step(Step::Bytes(dump))
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Append one read returning `bytes`.
    pub fn record(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.step(Step::Bytes(bytes.into()))
    }

    /// Append one read failing with `kind`.
    pub fn fault(self, kind: io::ErrorKind) -> Self {
        self.step(Step::Error(kind))
    }

    /// Make every `open()` fail with `kind`.
    pub fn fail_open(mut self, kind: io::ErrorKind) -> Self {
        self.open_error = Some(kind);
        self
    }

    /// Number of successful opens so far.
    pub fn opens(&self) -> usize {
        self.opens
    }
}

impl IterSource for ScriptedSource {
    type Stream = ScriptedStream;

    fn open(&mut self) -> io::Result<ScriptedStream> {
        if let Some(kind) = self.open_error {
            return Err(kind.into());
        }
        self.opens += 1;
        Ok(ScriptedStream {
            steps: self.steps.iter().cloned().collect(),
        })
    }
}

#[derive(Debug)]
pub struct ScriptedStream {
    steps: VecDeque<Step>,
}

impl ScriptedStream {
    /// Copy as much of `data` as fits, pushing the rest back for the next
    /// read. Returns the number of bytes copied.
    fn fill(&mut self, buf: &mut [u8], mut data: Vec<u8>, kind: Option<io::ErrorKind>) -> usize {
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        if n < data.len() {
            let rest = data.split_off(n);
            self.steps.push_front(match kind {
                Some(kind) => Step::BytesWithError(rest, kind),
                None => Step::Bytes(rest),
            });
        }
        n
    }
}

impl ByteStream for ScriptedStream {
    fn read_chunk(&mut self, buf: &mut [u8]) -> ReadOutcome {
        match self.steps.pop_front() {
            None => ReadOutcome::bytes(0),
            Some(Step::Bytes(data)) => ReadOutcome::bytes(self.fill(buf, data, None)),
            Some(Step::BytesWithError(data, kind)) => {
                let whole = data.len() <= buf.len();
                let n = self.fill(buf, data, Some(kind));
                if whole {
                    ReadOutcome::failed(n, kind.into())
                } else {
                    ReadOutcome::bytes(n)
                }
            }
            Some(Step::Error(kind)) => ReadOutcome::failed(0, kind.into()),
        }
    }
}

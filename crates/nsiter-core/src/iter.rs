//! Owned and volatile record iterators.
//!
//! Both iterators share one state machine:
//!
//! ```text
//!   Unopened ──open ok──▶ Open ──full read──▶ Open (record)
//!      │                   │
//!      │ open err          ├─short read, no error / EOF──▶ Done
//!      ▼                   └─short read + error─────────▶ Done (one Err)
//!   Done (one Err)
//! ```
//!
//! A full read that also reported an error still yields its record; the
//! error is kept and surfaced on the next pull instead. Errors of kind
//! `UnexpectedEof` mean "no more records" and are never handed out.
//!
//! The stream is dropped the moment the state machine reaches `Done`, or
//! when the iterator itself is dropped early.

use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::ControlFlow;
use std::io;

use log::{debug, trace};

use crate::error::{IterError, Result};
use crate::record::{Record, RecordRef};
use crate::source::IterSource;
use crate::stream::{ByteStream, ReadOutcome};

enum State<'s, S: IterSource> {
    Unopened(&'s mut S),
    Open {
        stream: S::Stream,
        deferred: Option<io::Error>,
    },
    Done,
}

enum Step {
    Record,
    Fault(IterError),
    End,
}

/// Pulls fixed-width chunks from a source into a single reused buffer.
struct Reader<'s, S: IterSource> {
    state: State<'s, S>,
    buf: Vec<u8>,
    count: u64,
}

impl<'s, S: IterSource> Reader<'s, S> {
    fn new(source: &'s mut S, size: usize) -> Self {
        Self {
            state: State::Unopened(source),
            buf: vec![0u8; size],
            count: 0,
        }
    }

    fn step(&mut self) -> Step {
        loop {
            match core::mem::replace(&mut self.state, State::Done) {
                State::Done => return Step::End,
                State::Unopened(source) => match source.open() {
                    Ok(stream) => {
                        debug!("iterator stream opened, record size {}", self.buf.len());
                        self.state = State::Open { stream, deferred: None };
                    }
                    Err(e) => {
                        debug!("cannot open iterator stream: {}", e);
                        return Step::Fault(IterError::Open(e));
                    }
                },
                State::Open { mut stream, deferred } => {
                    if let Some(e) = deferred {
                        return self.finish(Some(e));
                    }
                    if self.buf.is_empty() {
                        return self.finish(None);
                    }
                    let ReadOutcome { len, error } = stream.read_chunk(&mut self.buf);
                    if len == self.buf.len() {
                        self.count += 1;
                        trace!("record #{} read", self.count);
                        self.state = State::Open { stream, deferred: error };
                        return Step::Record;
                    }
                    drop(stream);
                    return self.finish(error);
                }
            }
        }
    }

    /// Map the terminal condition of an already released stream.
    fn finish(&mut self, error: Option<io::Error>) -> Step {
        match error {
            Some(e) if !ReadOutcome::is_exhausted(&e) => {
                debug!("iterator stream failed after {} records: {}", self.count, e);
                Step::Fault(IterError::Read(e))
            }
            _ => {
                debug!("iterator stream exhausted after {} records", self.count);
                Step::End
            }
        }
    }
}

impl<S: IterSource> Drop for Reader<'_, S> {
    fn drop(&mut self) {
        if let State::Open { .. } = self.state {
            debug!("iterator stream released early after {} records", self.count);
        }
    }
}

/// Iterator over independent record values.
///
/// Opens the source on the first pull. Yields `Err` at most once, as the
/// last element.
pub struct Records<'s, S: IterSource, R> {
    reader: Reader<'s, S>,
    _record: PhantomData<fn() -> R>,
}

impl<'s, S: IterSource, R: Record> Records<'s, S, R> {
    pub fn new(source: &'s mut S) -> Self {
        Self {
            reader: Reader::new(source, R::SIZE),
            _record: PhantomData,
        }
    }
}

impl<S: IterSource, R: Record> Iterator for Records<'_, S, R> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.step() {
            Step::Record => Some(Ok(R::decode(&self.reader.buf))),
            Step::Fault(e) => Some(Err(e)),
            Step::End => None,
        }
    }
}

impl<S: IterSource, R: Record> FusedIterator for Records<'_, S, R> {}

/// Lending iterator over records in one reused buffer.
///
/// Every [`RecordRef`] borrows the iterator, so it is gone before the next
/// pull can happen. Copy out with [`RecordRef::to_record`] where needed.
pub struct VolatileRecords<'s, S: IterSource, R> {
    reader: Reader<'s, S>,
    _record: PhantomData<fn() -> R>,
}

impl<'s, S: IterSource, R: Record> VolatileRecords<'s, S, R> {
    pub fn new(source: &'s mut S) -> Self {
        Self {
            reader: Reader::new(source, R::SIZE),
            _record: PhantomData,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Result<RecordRef<'_, R>>> {
        match self.reader.step() {
            Step::Record => Some(Ok(RecordRef::new(&self.reader.buf))),
            Step::Fault(e) => Some(Err(e)),
            Step::End => None,
        }
    }

    /// Run `f` on each record until the stream ends, `f` breaks, or a fault
    /// occurs. Only a fault is returned as `Err`.
    pub fn try_for_each<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(RecordRef<'_, R>) -> ControlFlow<()>,
    {
        while let Some(item) = self.next() {
            if f(item?).is_break() {
                break;
            }
        }
        Ok(())
    }
}

/// Owned-copy record iterator over a fresh pass of `source`.
pub fn records<S: IterSource, R: Record>(source: &mut S) -> Records<'_, S, R> {
    Records::new(source)
}

/// Buffer-reusing record iterator over a fresh pass of `source`.
pub fn volatile_records<S: IterSource, R: Record>(source: &mut S) -> VolatileRecords<'_, S, R> {
    VolatileRecords::new(source)
}

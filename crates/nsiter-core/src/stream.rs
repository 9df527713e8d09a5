//! Byte stream read contract.
//!
//! An iterator file hands out the records written by the kernel side,
//! up to the buffer size per read. A read may report some bytes *and* an
//! error at the same time, so the contract here keeps both instead of
//! folding them into one `io::Result`.
//!
//! The end of a pass shows as a short read without error, or as an error of
//! kind [`io::ErrorKind::UnexpectedEof`].

use std::io::{self, Read};

/// Result of a single read from a [`ByteStream`].
#[derive(Debug)]
pub struct ReadOutcome {
    /// Number of bytes placed at the start of the buffer.
    pub len: usize,
    /// Error reported alongside (or instead of) the bytes.
    pub error: Option<io::Error>,
}

impl ReadOutcome {
    pub fn bytes(len: usize) -> Self {
        Self { len, error: None }
    }

    pub fn failed(len: usize, error: io::Error) -> Self {
        Self { len, error: Some(error) }
    }

    /// True if `error` signals normal end of data.
    pub fn is_exhausted(error: &io::Error) -> bool {
        error.kind() == io::ErrorKind::UnexpectedEof
    }
}

/// A readable stream of iterator output.
///
/// Dropping the stream releases it.
pub trait ByteStream {
    /// Fill as much of `buf` as currently available with a single read.
    fn read_chunk(&mut self, buf: &mut [u8]) -> ReadOutcome;
}

/// [`ByteStream`] over any [`std::io::Read`].
///
/// Each `read_chunk` maps to exactly one `read` call; `EINTR` is retried.
#[derive(Debug)]
pub struct IoStream<T> {
    inner: T,
}

impl<T: Read> IoStream<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Read> ByteStream for IoStream<T> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> ReadOutcome {
        loop {
            match self.inner.read(buf) {
                Ok(n) => return ReadOutcome::bytes(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return ReadOutcome::failed(0, e),
            }
        }
    }
}

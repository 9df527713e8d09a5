//! Record iteration error types.

use std::io;

/// Faults surfaced by record iterators.
///
/// Benign exhaustion of a byte stream is never an error; it simply ends the
/// iteration.
#[derive(Debug, thiserror::Error)]
pub enum IterError {
    /// The byte-producing resource could not be opened.
    #[error("cannot open iterator: {0}")]
    Open(#[source] io::Error),
    /// A read failed mid-stream.
    #[error("iterator read failed: {0}")]
    Read(#[source] io::Error),
    /// The resource has already been released.
    #[error("iterator already closed")]
    Closed,
}

impl IterError {
    /// The underlying OS error number, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::Open(e) | Self::Read(e) => e.raw_os_error(),
            Self::Closed => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, IterError>;

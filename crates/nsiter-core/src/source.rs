//! Producer of iterator byte streams.
//!
//! # Implementors (nsiter-module)
//!
//! - `PinnedIter`: an iterator pinned into bpffs. Every open of the pin
//!   starts a fresh pass over the kernel objects.
//! - `ScriptedSource`: replays scripted reads from memory.
//!
//! [`Attached`] wraps any of them so that acquiring the iterator happens at
//! construction, where a failure can still be refused.

use std::io;

use log::debug;

use crate::stream::ByteStream;

/// Something that can be opened into a fresh [`ByteStream`].
///
/// Each call to `open` returns a new, independent point-in-time pass.
/// Streams can't be rewound; iterate again by opening again.
pub trait IterSource {
    type Stream: ByteStream;

    fn open(&mut self) -> io::Result<Self::Stream>;
}

impl<S: IterSource + ?Sized> IterSource for &mut S {
    type Stream = S::Stream;

    fn open(&mut self) -> io::Result<Self::Stream> {
        (**self).open()
    }
}

/// A source opened once up front.
///
/// The stream obtained at construction serves the first pass; later passes
/// open the source again. If the first open fails, the source is dropped
/// and the error returned.
pub struct Attached<S: IterSource> {
    source: S,
    first: Option<S::Stream>,
}

impl<S: IterSource> Attached<S> {
    pub fn new(mut source: S) -> io::Result<Self> {
        let first = source.open()?;
        debug!("iterator attached");
        Ok(Self { source, first: Some(first) })
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// True until the stream opened at construction has been handed out.
    pub fn is_primed(&self) -> bool {
        self.first.is_some()
    }
}

impl<S: IterSource> IterSource for Attached<S> {
    type Stream = S::Stream;

    fn open(&mut self) -> io::Result<Self::Stream> {
        match self.first.take() {
            Some(stream) => Ok(stream),
            None => self.source.open(),
        }
    }
}

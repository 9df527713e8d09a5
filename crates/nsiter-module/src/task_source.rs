//! `TaskIterSource` - the task iterator picked by configuration.
//!
//! The pinned iterator is opened once while constructing, so a pin that
//! can't be read fails setup instead of every later pass.

use std::io;

use log::debug;

use nsiter_core::source::{Attached, IterSource};

use crate::config::SourceConfig;
use crate::error::{Result, SourceError};
use crate::pinned_iter::PinnedIter;

pub struct TaskIterSource {
    inner: Attached<PinnedIter>,
}

impl TaskIterSource {
    /// Build and attach the source described by `config`.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let pin = config.validate()?;
        let inner = Attached::new(PinnedIter::new(pin)).map_err(|source| SourceError::Attach {
            path: pin.to_path_buf(),
            source,
        })?;
        debug!("attached to pinned iterator {}", pin.display());
        Ok(Self { inner })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_config(&SourceConfig::from_env())
    }

    pub fn pinned(&self) -> &PinnedIter {
        self.inner.get_ref()
    }
}

impl IterSource for TaskIterSource {
    type Stream = <PinnedIter as IterSource>::Stream;

    fn open(&mut self) -> io::Result<Self::Stream> {
        self.inner.open()
    }
}

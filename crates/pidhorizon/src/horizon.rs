//! `PidHorizon` - builds local-to-root PID/TID mappings from a task TID
//! iterator.
//!
//! Each mapping is one full pass over the iterator. Tasks can exit while a
//! pass runs, so a pass that ends on a fault still returns whatever it
//! gathered up to that point; [`PidHorizon::new_mapping_with_outcome`] also
//! tells whether the pass ended cleanly.

use core::fmt;
use core::marker::PhantomData;
use core::ops::ControlFlow;

use log::{debug, warn};

use nsiter_core::error::IterError;
use nsiter_core::iter::volatile_records;
use nsiter_core::pid::Pid;
use nsiter_core::source::IterSource;
use nsiter_module::config::SourceConfig;
use nsiter_module::error::SourceError;
use nsiter_module::task_records::TaskTid;
use nsiter_module::task_source::TaskIterSource;

use crate::mapping::Mapping;

/// How a mapping pass ended.
#[derive(Debug)]
pub enum Outcome {
    /// The iterator ran out of tasks.
    Exhausted,
    /// A fault ended the pass early; the mapping is partial.
    Stopped(IterError),
}

impl Outcome {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Outcome::Exhausted)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Exhausted => write!(f, "exhausted"),
            Outcome::Stopped(e) => write!(f, "stopped: {}", e),
        }
    }
}

/// Looks beyond the current PID namespace horizon to learn the PIDs/TIDs
/// of visible tasks in the initial PID namespace.
///
/// Holds on to its iterator source until [`PidHorizon::close`] or drop.
pub struct PidHorizon<P, S = TaskIterSource> {
    source: Option<S>,
    _pid: PhantomData<fn() -> P>,
}

impl<P: Pid> PidHorizon<P> {
    /// Set up from the `PIDHORIZON_*` environment.
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&SourceConfig::from_env())
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        TaskIterSource::from_config(config).map(Self::with_source)
    }
}

impl<P, S> PidHorizon<P, S> {
    pub fn with_source(source: S) -> Self {
        Self { source: Some(source), _pid: PhantomData }
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Release the iterator source. Safe to call any number of times.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            debug!("pid horizon closed");
        }
    }
}

impl<P: Pid, S: IterSource> PidHorizon<P, S> {
    /// Returns a new mapping from this process's PID namespace to the
    /// initial PID namespace, for all tasks visible to this process.
    ///
    /// A fault during the pass ends it early without being reported.
    pub fn new_mapping(&mut self) -> Mapping<P> {
        let (m, outcome) = self.new_mapping_with_outcome();
        if let Outcome::Stopped(e) = outcome {
            warn!("task iteration stopped after {} tasks: {}", m.len(), e);
        }
        m
    }

    /// Like [`PidHorizon::new_mapping`], but also tells how the pass ended.
    pub fn new_mapping_with_outcome(&mut self) -> (Mapping<P>, Outcome) {
        let mut m = Mapping::new();
        let Some(source) = self.source.as_mut() else {
            return (m, Outcome::Stopped(IterError::Closed));
        };
        let res = volatile_records::<_, TaskTid>(source).try_for_each(|rec| {
            m.insert(
                P::from_raw(TaskTid::tid_of(&rec)),
                P::from_raw(TaskTid::root_tid_of(&rec)),
            );
            ControlFlow::Continue(())
        });
        debug!("mapped {} tasks", m.len());
        match res {
            Ok(()) => (m, Outcome::Exhausted),
            Err(e) => (m, Outcome::Stopped(e)),
        }
    }
}

impl<P, S> Drop for PidHorizon<P, S> {
    fn drop(&mut self) {
        self.close();
    }
}

//! # pidhorizon
//!
//! Look beyond your own PID namespace: learn the PID/TID each task you can
//! see has in the initial ("root") PID namespace.
//!
//! This doesn't let you see any more tasks than your PID namespace already
//! shows you. It only tells you their other number.
//!
//! ```rust,ignore
//! use pidhorizon::{reverse, PidHorizon};
//!
//! let mut horizon = PidHorizon::<i32>::new()?;
//! let local_to_root = horizon.new_mapping();
//! let root_to_local = reverse(&local_to_root);
//! horizon.close();
//! ```

pub mod mapping;
pub mod horizon;

pub use mapping::{lookup, reverse, Mapping};
pub use horizon::{Outcome, PidHorizon};

pub use nsiter_core::pid::{Pid, RawPid};
pub use nsiter_module::{SourceConfig, SourceError};

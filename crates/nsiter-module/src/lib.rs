//! # nsiter-module - Default iterator sources and record shapes
//!
//! ## Sources
//!
//! | Source          | Backed by                                  |
//! |-----------------|--------------------------------------------|
//! | PinnedIter      | iterator pinned in bpffs                   |
//! | ScriptedSource  | in-memory read script                      |
//! | TaskIterSource  | configured pin, attached at construction   |
//!
//! ## Records
//!
//! `TaskTid`, `TaskStatus`, `TaskInfo` and `TaskNsInfo` mirror the structs
//! written by the kernel-side task iterator programs.

pub mod error;
pub mod config;
pub mod pinned_iter;
pub mod scripted;
pub mod task_source;
pub mod task_records;

pub use error::{Result, SourceError};
pub use config::SourceConfig;
pub use pinned_iter::PinnedIter;
pub use scripted::{ScriptedSource, ScriptedStream, Step};
pub use task_source::TaskIterSource;
pub use task_records::{TaskInfo, TaskNsInfo, TaskStatus, TaskTid};

//! # nsiter-core
//!
//! Turns the byte output of an eBPF iterator into typed, fixed-size records.
//!
//! This crate contains no knowledge of how an iterator gets loaded or
//! attached. It only defines the boundary to such a producer
//! ([`IterSource`], [`ByteStream`]) and the protocol for pulling records
//! out of it. Concrete producers live in `nsiter-module`.
//!
//! ## Modules
//!
//! - `pid` - PID/TID representation constraint
//! - `record` - Fixed-width record trait and borrowed record views
//! - `name` - Fixed-width name field decoding
//! - `stream` - Byte stream read contract
//! - `source` - Producer of byte streams
//! - `iter` - Owned and volatile record iterators
//! - `error` - Error types
//! - `env` - Environment variable utilities

pub mod pid;
pub mod record;
pub mod name;
pub mod stream;
pub mod source;
pub mod iter;
pub mod error;
pub mod env;

// Re-exports for convenience
pub use pid::{Pid, RawPid};
pub use record::{Record, RecordRef};
pub use name::decode_name;
pub use stream::{ByteStream, IoStream, ReadOutcome};
pub use source::{Attached, IterSource};
pub use iter::{records, volatile_records, Records, VolatileRecords};
pub use error::{IterError, Result};
pub use env::{env_get_bool, env_get_path};

//! Errors raised while setting up an iterator source.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// No pinned iterator was configured.
    #[error("no iterator source configured (set PIDHORIZON_PIN)")]
    NotConfigured,
    /// statfs on the pin path failed.
    #[error("cannot stat {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: nix::Error,
    },
    /// The pin path does not live on a bpf filesystem.
    #[error("{} is not on a bpf filesystem", path.display())]
    NotBpffs { path: PathBuf },
    /// The iterator could not be opened at construction.
    #[error("cannot attach to {}: {source}", path.display())]
    Attach {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SourceError>;

//! Iterator source configuration
//!
//! Library defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Builder calls
//! 2. Environment variables (`from_env`)
//! 3. Library defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use nsiter_module::config::SourceConfig;
//!
//! let config = SourceConfig::from_env();
//!
//! let config = SourceConfig::new()
//!     .pin("/sys/fs/bpf/task_tid")
//!     .require_bpffs(true);
//! ```

use std::path::{Path, PathBuf};

use nsiter_core::env::{env_get_bool, env_get_path};

use crate::error::{Result, SourceError};
use crate::pinned_iter::PinnedIter;

/// Library defaults.
pub mod defaults {
    /// Refuse pin paths outside bpffs.
    pub const REQUIRE_BPFFS: bool = false;
}

/// Which iterator to read from, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Pinned iterator in bpffs.
    pub pin: Option<PathBuf>,
    /// Fail instead of warn when `pin` is not on bpffs.
    pub require_bpffs: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            pin: None,
            require_bpffs: defaults::REQUIRE_BPFFS,
        }
    }
}

impl SourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from library defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `PIDHORIZON_PIN` - Path of a pinned iterator
    /// - `PIDHORIZON_REQUIRE_BPFFS` - Reject pins outside bpffs (0/1)
    pub fn from_env() -> Self {
        Self {
            pin: env_get_path("PIDHORIZON_PIN"),
            require_bpffs: env_get_bool("PIDHORIZON_REQUIRE_BPFFS", defaults::REQUIRE_BPFFS),
        }
    }

    pub fn pin(mut self, path: impl Into<PathBuf>) -> Self {
        self.pin = Some(path.into());
        self
    }

    pub fn require_bpffs(mut self, enable: bool) -> Self {
        self.require_bpffs = enable;
        self
    }

    /// Validate configuration against the running system and return the
    /// pin path to use.
    pub fn validate(&self) -> Result<&Path> {
        let pin = self.pin.as_deref().ok_or(SourceError::NotConfigured)?;
        if !PinnedIter::new(pin).is_on_bpffs()? && self.require_bpffs {
            return Err(SourceError::NotBpffs { path: pin.to_path_buf() });
        }
        Ok(pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_pin(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("nsiter-cfg-{}-{}", std::process::id(), name));
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let cfg = SourceConfig::new();
        assert!(cfg.pin.is_none());
        assert!(!cfg.require_bpffs);
        assert!(matches!(cfg.validate(), Err(SourceError::NotConfigured)));
    }

    #[test]
    fn test_builder() {
        let cfg = SourceConfig::new().pin("/sys/fs/bpf/task_tid").require_bpffs(true);
        assert_eq!(cfg.pin, Some(PathBuf::from("/sys/fs/bpf/task_tid")));
        assert!(cfg.require_bpffs);
    }

    #[test]
    fn test_validate_pin() {
        let path = scratch_pin("validate");
        let cfg = SourceConfig::new().pin(&path);
        assert_eq!(cfg.validate().unwrap(), path.as_path());
        assert!(matches!(
            cfg.clone().require_bpffs(true).validate(),
            Err(SourceError::NotBpffs { .. })
        ));
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(cfg.validate(), Err(SourceError::Stat { .. })));
    }
}

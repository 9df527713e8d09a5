//! Environment variable utilities
//!
//! Small readers for the `PIDHORIZON_*` settings. Unset, empty or unparsable
//! variables fall back to the given default.
//!
//! # Usage
//!
//! ```ignore
//! use nsiter_core::env::{env_get_bool, env_get_path};
//!
//! let pin = env_get_path("PIDHORIZON_PIN");
//! let strict = env_get_bool("PIDHORIZON_REQUIRE_BPFFS", false);
//! ```

use std::path::PathBuf;

/// Non-empty value of `key`, if any.
#[inline]
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get environment variable as boolean
///
/// Accepts "1", "true", "yes", "on" (case-insensitive) as true, and "0",
/// "false", "no", "off" as false. Anything else returns the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match env_value(key).map(|v| v.to_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

/// Get environment variable as a filesystem path
#[inline]
pub fn env_get_path(key: &str) -> Option<PathBuf> {
    env_value(key).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_defaults() {
        assert!(env_get_bool("__PIDHORIZON_TEST_UNSET__", true));
        assert!(env_get_path("__PIDHORIZON_TEST_UNSET__").is_none());
    }

    #[test]
    fn test_empty_counts_as_unset() {
        std::env::set_var("__PIDHORIZON_TEST_EMPTY__", "");
        assert!(env_get_path("__PIDHORIZON_TEST_EMPTY__").is_none());
        assert!(!env_get_bool("__PIDHORIZON_TEST_EMPTY__", false));
        std::env::remove_var("__PIDHORIZON_TEST_EMPTY__");
    }

    #[test]
    fn test_path_value() {
        std::env::set_var("__PIDHORIZON_TEST_PATH__", "/sys/fs/bpf/task_tid");
        assert_eq!(
            env_get_path("__PIDHORIZON_TEST_PATH__"),
            Some(PathBuf::from("/sys/fs/bpf/task_tid"))
        );
        std::env::remove_var("__PIDHORIZON_TEST_PATH__");
    }

    #[test]
    fn test_bool_variants() {
        std::env::set_var("__PIDHORIZON_TEST_BOOL__", "On");
        assert!(env_get_bool("__PIDHORIZON_TEST_BOOL__", false));

        std::env::set_var("__PIDHORIZON_TEST_BOOL__", "no");
        assert!(!env_get_bool("__PIDHORIZON_TEST_BOOL__", true));

        std::env::set_var("__PIDHORIZON_TEST_BOOL__", "garbage");
        assert!(env_get_bool("__PIDHORIZON_TEST_BOOL__", true));

        std::env::remove_var("__PIDHORIZON_TEST_BOOL__");
    }
}

//! `PinnedIter` - iterator pinned into bpffs.
//!
//! An iterator link pinned with e.g. `bpftool iter pin` shows up as a file
//! in bpffs. Every `open()` of that file starts a new pass over the kernel's
//! tasks, so one `PinnedIter` can be iterated any number of times.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use nix::sys::statfs::statfs;

use nsiter_core::source::IterSource;
use nsiter_core::stream::IoStream;

use crate::error::{Result, SourceError};

/// `BPF_FS_MAGIC` from `include/uapi/linux/magic.h`.
const BPF_FS_MAGIC: i64 = 0xcafe_4a11;

#[derive(Debug, Clone)]
pub struct PinnedIter {
    path: PathBuf,
}

impl PinnedIter {
    /// Wrap a pin path. Nothing is opened until the first pass.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_on_bpffs(&self) -> Result<bool> {
        let fs = statfs(self.path.as_path()).map_err(|source| SourceError::Stat {
            path: self.path.clone(),
            source,
        })?;
        #[allow(clippy::unnecessary_cast)]
        let magic = fs.filesystem_type().0 as i64;
        if magic != BPF_FS_MAGIC {
            warn!("{} is not on bpffs (magic {:#x})", self.path.display(), magic);
        }
        Ok(magic == BPF_FS_MAGIC)
    }
}

impl IterSource for PinnedIter {
    type Stream = IoStream<File>;

    fn open(&mut self) -> io::Result<Self::Stream> {
        debug!("opening pinned iterator {}", self.path.display());
        File::open(&self.path).map(IoStream::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsiter_core::stream::ByteStream;
    use std::io::Write;

    fn scratch_file(name: &str, data: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("nsiter-{}-{}", std::process::id(), name));
        let mut f = File::create(&path).unwrap();
        f.write_all(data).unwrap();
        path
    }

    #[test]
    fn test_each_open_is_a_fresh_pass() {
        let path = scratch_file("fresh", &[1, 2, 3, 4]);
        let mut it = PinnedIter::new(&path);
        for _ in 0..2 {
            let mut s = it.open().unwrap();
            let mut buf = [0u8; 4];
            assert_eq!(s.read_chunk(&mut buf).len, 4);
            assert_eq!(buf, [1, 2, 3, 4]);
        }
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_pin_fails_open() {
        let mut it = PinnedIter::new("/nonexistent/nsiter/pin");
        assert_eq!(it.open().unwrap_err().kind(), io::ErrorKind::NotFound);
        assert!(matches!(it.is_on_bpffs(), Err(SourceError::Stat { .. })));
    }

    #[test]
    fn test_regular_file_is_not_bpffs() {
        let path = scratch_file("notbpffs", &[]);
        assert!(!PinnedIter::new(&path).is_on_bpffs().unwrap());
        std::fs::remove_file(path).unwrap();
    }
}

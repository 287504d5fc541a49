//! Advisory locks on the data files.
//!
//! Input tables are read under a shared lock, the prediction table is written under an exclusive
//! one. The lock is held until the `LockedFile` is dropped.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use fs2::FileExt;
use log::warn;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LockMode::Shared => write!(f, "shared"),
            LockMode::Exclusive => write!(f, "exclusive"),
        }
    }
}

pub struct LockedFile {
    file: File,
    mode: LockMode,
}

impl LockedFile {
    /// Open an input table for reading; concurrent readers are allowed, writers wait.
    pub fn open_shared(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        file.lock_shared()?;
        Ok(LockedFile {
            file,
            mode: LockMode::Shared,
        })
    }

    /// Open an output table for writing, creating it if needed.
    ///
    /// Existing content is only discarded once the lock is held, so readers never see a
    /// half-truncated file.
    pub fn create_exclusive(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().write(true).create(true).open(path)?;
        file.lock_exclusive()?;
        file.set_len(0)?;
        Ok(LockedFile {
            file,
            mode: LockMode::Exclusive,
        })
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!("Failed to release {} file lock: {}", self.mode, e);
        }
    }
}

impl Read for LockedFile {
    #[inline(always)]
    fn read(&mut self, data: &mut [u8]) -> io::Result<usize> {
        self.file.read(data)
    }
}

impl Write for LockedFile {
    #[inline(always)]
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.file.write(data)
    }

    #[inline(always)]
    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

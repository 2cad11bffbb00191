//! Append-only line writer with numbered rotation.
//!
//! When the active file grows past its size limit it is shifted to `<name>.1`,
//! the previous `<name>.1` to `<name>.2`, and so on; the oldest backup beyond
//! the retention count is deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Default size limit of the active file (5 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Default number of rotated backups kept.
pub const DEFAULT_BACKUPS: usize = 2;

struct Active {
    file: File,
    written: u64,
}

/// Rotating line writer. Safe to share between threads.
pub struct RotatingWriter {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    active: Mutex<Option<Active>>,
}

impl RotatingWriter {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_limits(path, DEFAULT_MAX_BYTES, DEFAULT_BACKUPS)
    }

    #[must_use]
    pub const fn with_limits(path: PathBuf, max_bytes: u64, backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            backups,
            active: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline, rotating first if the line would push
    /// the active file past its limit.
    ///
    /// # Errors
    ///
    /// Any I/O error from rotating, opening or writing.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);

        if active.is_none() {
            *active = Some(self.open()?);
        }
        let incoming = line.len() as u64 + 1;
        if active.as_ref().is_some_and(|a| a.written > 0 && a.written + incoming > self.max_bytes) {
            *active = None;
            self.rotate()?;
            *active = Some(self.open()?);
        }

        let Some(current) = active.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::Other, "trace file unavailable"));
        };
        writeln!(current.file, "{line}")?;
        current.file.flush()?;
        current.written += incoming;
        Ok(())
    }

    fn open(&self) -> io::Result<Active> {
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let written = file.metadata()?.len();
        Ok(Active { file, written })
    }

    fn rotate(&self) -> io::Result<()> {
        if self.backups == 0 {
            return fs::remove_file(&self.path).or_else(ignore_missing);
        }
        fs::remove_file(backup_path(&self.path, self.backups)).or_else(ignore_missing)?;
        for index in (1..self.backups).rev() {
            let from = backup_path(&self.path, index);
            if from.exists() {
                fs::rename(&from, backup_path(&self.path, index + 1))?;
            }
        }
        fs::rename(&self.path, backup_path(&self.path, 1)).or_else(ignore_missing)
    }
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn ignore_missing(e: io::Error) -> io::Result<()> {
    if e.kind() == io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(e)
    }
}

impl std::fmt::Debug for RotatingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingWriter")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("backups", &self.backups)
            .finish_non_exhaustive()
    }
}

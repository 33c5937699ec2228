//! Exclusive-create lockfiles
//!
//! A `Lockfile` guards a single file (the index, a ref) for a read-modify-write cycle.
//! Acquisition creates `<file>.lock` with create-new semantics, so a second writer fails
//! immediately instead of waiting. New content is written into the lockfile and published
//! by renaming it over the target; abandoning the update deletes the lockfile.

use crate::errors::RepositoryError;
use anyhow::Context;
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

const LOCK_SUFFIX: &str = ".lock";

#[derive(Debug)]
pub struct Lockfile {
    file_path: Box<Path>,
    lock_path: Box<Path>,
    lock: Option<File>,
}

impl Lockfile {
    pub fn new(file_path: Box<Path>) -> Self {
        let mut lock_path = OsString::from(file_path.as_os_str());
        lock_path.push(LOCK_SUFFIX);

        Lockfile {
            file_path,
            lock_path: PathBuf::from(lock_path).into_boxed_path(),
            lock: None,
        }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    pub fn is_held(&self) -> bool {
        self.lock.is_some()
    }

    pub fn hold_for_update(&mut self) -> anyhow::Result<()> {
        if self.lock.is_some() {
            return Ok(());
        }

        let lock = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.lock_path);

        match lock {
            Ok(file) => {
                debug!(lock = %self.lock_path.display(), "lock acquired");
                self.lock = Some(file);
                Ok(())
            }
            Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(RepositoryError::LockContention(self.lock_path.to_path_buf()).into())
            }
            Err(error) => Err(error).with_context(|| {
                format!("Unable to create lockfile {}", self.lock_path.display())
            }),
        }
    }

    pub fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        let lock = self.lock.as_mut().with_context(|| {
            format!("Not holding lock on file: {}", self.lock_path.display())
        })?;

        lock.write_all(data)
            .with_context(|| format!("Unable to write lockfile {}", self.lock_path.display()))
    }

    /// Publish the written content by renaming the lockfile over the target.
    pub fn commit(&mut self) -> anyhow::Result<()> {
        let lock = self.lock.take().with_context(|| {
            format!("Not holding lock on file: {}", self.lock_path.display())
        })?;

        lock.sync_all()
            .with_context(|| format!("Unable to flush lockfile {}", self.lock_path.display()))?;
        drop(lock);

        std::fs::rename(&self.lock_path, &self.file_path).with_context(|| {
            format!(
                "Unable to rename {} to {}",
                self.lock_path.display(),
                self.file_path.display()
            )
        })?;
        debug!(file = %self.file_path.display(), "lock committed");

        Ok(())
    }

    /// Drop the lock without touching the target. Releasing a lock that is not held is a no-op.
    pub fn rollback(&mut self) -> anyhow::Result<()> {
        if let Some(lock) = self.lock.take() {
            drop(lock);
            match std::fs::remove_file(&self.lock_path) {
                Ok(()) => {}
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
                Err(error) => {
                    return Err(error).with_context(|| {
                        format!("Unable to remove lockfile {}", self.lock_path.display())
                    });
                }
            }
            trace!(lock = %self.lock_path.display(), "lock released");
        }

        Ok(())
    }
}

impl Drop for Lockfile {
    fn drop(&mut self) {
        if self.lock.is_some()
            && let Err(error) = self.rollback()
        {
            tracing::warn!("{error:#}");
        }
    }
}

//! Working directory access
//!
//! Everything the core reads from or writes to the user's files goes through [`Workspace`]:
//! scanning, stat snapshots, blob content, and the filesystem mutations a checkout performs.
//! Paths handed in and out are relative to the workspace root; the metadata directory is
//! never listed.

use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::{EntryMetadata, parent_dirs};
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".git", ".", ".."];

/// A regular file found by [`Workspace::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFile {
    pub name: PathBuf,
    pub stat: EntryMetadata,
}

impl WorkspaceFile {
    pub fn parent_dirs(&self) -> Vec<&Path> {
        parent_dirs(&self.name)
    }
}

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| match component {
            std::path::Component::Normal(name) => {
                IGNORED_PATHS.contains(&name.to_string_lossy().as_ref())
            }
            _ => false,
        })
    }

    fn relative(&self, path: &Path) -> Option<PathBuf> {
        path.strip_prefix(&self.path).ok().map(Path::to_path_buf)
    }

    /// Direct children of a directory (the root when `None`), sorted by name.
    pub fn list_dir(&self, dir_path: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
        let dir_path = match dir_path {
            Some(dir_path) => self.path.join(dir_path),
            None => self.path.to_path_buf(),
        };

        let mut children = std::fs::read_dir(&dir_path)
            .with_context(|| format!("Unable to list directory {}", dir_path.display()))?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| self.relative(&entry.path()))
            .filter(|path| !Self::is_ignored(path))
            .collect::<Vec<_>>();
        children.sort();

        Ok(children)
    }

    /// Every regular file at or below `root` (the whole workspace when `None`), depth-first
    /// in name order.
    pub fn list_files(&self, root: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
        let root = match root {
            Some(root) => self.path.join(root),
            None => self.path.to_path_buf(),
        };

        if !root.exists() {
            anyhow::bail!("pathspec '{}' did not match any files", root.display());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.path)
                    .is_ok_and(|relative| !Self::is_ignored(relative))
            });

        for entry in walker {
            let entry =
                entry.with_context(|| format!("Unable to scan {}", root.display()))?;
            if entry.file_type().is_file()
                && let Some(relative) = self.relative(entry.path())
            {
                files.push(relative);
            }
        }

        Ok(files)
    }

    /// Files below `root` together with their stat snapshot.
    pub fn scan(&self, root: Option<&Path>) -> anyhow::Result<Vec<WorkspaceFile>> {
        self.list_files(root)?
            .into_iter()
            .map(|name| {
                let stat = self
                    .stat_file(&name)?
                    .with_context(|| format!("{} vanished while scanning", name.display()))?;
                Ok(WorkspaceFile { name, stat })
            })
            .collect()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);
        let content = std::fs::read(&full_path)
            .with_context(|| format!("open('{}'): Permission denied", file_path.display()))?;

        Ok(Bytes::from(content))
    }

    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(file_path)?))
    }

    /// Stat snapshot of a path, `None` when nothing exists there.
    pub fn stat_file(&self, file_path: &Path) -> anyhow::Result<Option<EntryMetadata>> {
        let full_path = self.path.join(file_path);

        match std::fs::metadata(&full_path) {
            Ok(metadata) => Ok(Some((full_path.as_path(), metadata).try_into()?)),
            Err(error)
                if matches!(error.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) =>
            {
                Ok(None)
            }
            Err(error) => Err(error)
                .with_context(|| format!("stat('{}'): Permission denied", file_path.display())),
        }
    }

    /// Write `data` to a file with the permission bits of `mode`, replacing whatever is there.
    pub fn write_file(&self, file_path: &Path, data: &[u8], mode: EntryMode) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_dir() {
            std::fs::remove_dir_all(&full_path).with_context(|| {
                format!("Unable to remove directory {}", file_path.display())
            })?;
        }

        std::fs::write(&full_path, data)
            .with_context(|| format!("Unable to write {}", file_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(mode.as_u32() & 0o777);
            std::fs::set_permissions(&full_path, permissions).with_context(|| {
                format!("Unable to set permissions of {}", file_path.display())
            })?;
        }

        trace!(path = %file_path.display(), %mode, "file written");
        Ok(())
    }

    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        let removed = if full_path.is_dir() {
            std::fs::remove_dir_all(&full_path)
        } else {
            std::fs::remove_file(&full_path)
        };

        match removed {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => {
                Err(error).with_context(|| format!("Unable to remove {}", file_path.display()))
            }
        }
    }

    /// Remove a directory if it is empty. A missing or non-empty directory is left alone.
    pub fn remove_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        match std::fs::remove_dir(self.path.join(dir_path)) {
            Ok(()) => Ok(()),
            Err(error)
                if matches!(
                    error.kind(),
                    ErrorKind::NotFound | ErrorKind::DirectoryNotEmpty | ErrorKind::NotADirectory
                ) =>
            {
                Ok(())
            }
            Err(error) => Err(error)
                .with_context(|| format!("Unable to remove directory {}", dir_path.display())),
        }
    }

    /// Create a directory, replacing a file of the same name.
    pub fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(dir_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Unable to remove {}", dir_path.display()))?;
        }

        if !full_path.is_dir() {
            std::fs::create_dir(&full_path)
                .with_context(|| format!("Unable to create directory {}", dir_path.display()))?;
        }

        Ok(())
    }

    /// Deletions first, then directory removal deepest-first, directory creation
    /// shallowest-first, then updated and finally created files.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for (file_path, _) in migration.actions(ActionType::Delete) {
            self.remove_file(file_path)?;
        }

        for dir_path in migration.rmdirs().iter().rev() {
            self.remove_directory(dir_path)?;
        }

        for dir_path in migration.mkdirs() {
            self.make_directory(dir_path)?;
        }

        for action in [ActionType::Update, ActionType::Create] {
            for (file_path, entry) in migration.actions(action) {
                let entry = entry
                    .as_ref()
                    .with_context(|| format!("no target entry for {}", file_path.display()))?;
                let blob = migration.blob(&entry.oid)?;
                self.write_file(file_path, blob.content(), entry.mode)?;
            }
        }

        debug!(workspace = %self.path.display(), "migration applied to workspace");
        Ok(())
    }
}

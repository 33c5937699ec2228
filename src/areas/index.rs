//! Index (staging area)
//!
//! The index records what the next commit will contain: one entry per staged file with its blob
//! id and the stat snapshot taken when it was staged.
//!
//! ## Index File Format
//!
//! The index file contains:
//! - Header: Signature, version, and entry count
//! - Entries: Sorted list of tracked files with metadata
//! - Checksum: SHA-1 hash of everything before it
//!
//! ## Data Structures
//!
//! - `entries`: Maps file paths to their index entries
//! - `parents`: Maps every directory holding staged files to the staged paths beneath it
//!
//! Mutating commands call [`Index::load_for_update`], which takes `index.lock` for the whole
//! read-modify-write cycle, then publish with [`Index::write_updates`] or give up with
//! [`Index::release_lock`].

use crate::areas::lockfile::Lockfile;
use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{
    ENTRY_BLOCK, ENTRY_MIN_SIZE, EntryMetadata, IndexEntry,
};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::HEADER_SIZE;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use anyhow::Context;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

#[derive(Debug)]
pub struct Index {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
    /// Tracked files mapped by path
    entries: BTreeMap<PathBuf, IndexEntry>,
    /// Directory -> staged paths nested anywhere below it
    parents: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    lockfile: Lockfile,
    /// Set when entries or stat snapshots changed since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            lockfile: Lockfile::new(path.clone()),
            path,
            entries: BTreeMap::new(),
            parents: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.parents.clear();
        self.changed = false;
    }

    /// Load the index from disk for reading only.
    ///
    /// A missing or empty index file is an empty index. A shared lock is held on the file while
    /// its bytes are read.
    pub fn load(&mut self) -> anyhow::Result<()> {
        self.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open index {}", self.path.display()))?;
        let mut content = Vec::new();
        {
            let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;
            lock.read_to_end(&mut content)
                .with_context(|| format!("Unable to read index {}", self.path.display()))?;
        }

        if content.is_empty() {
            return Ok(());
        }

        self.parse(Cursor::new(content))?;
        debug!(entries = self.entries.len(), "index loaded");

        Ok(())
    }

    /// Take `index.lock`, then load. The lock stays held until written or released.
    pub fn load_for_update(&mut self) -> anyhow::Result<()> {
        self.lockfile.hold_for_update()?;

        if let Err(error) = self.load() {
            self.lockfile.rollback()?;
            return Err(error);
        }

        Ok(())
    }

    /// Replace the in-memory state with the index encoded in `reader`.
    pub fn parse(&mut self, reader: impl Read) -> anyhow::Result<()> {
        self.clear();

        let mut reader = Checksum::new(reader);
        let entries_count = Self::parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;

        reader.verify()
    }

    fn parse_header(reader: &mut Checksum<impl Read>) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(Cursor::new(header_bytes))?;
        header.validate()?;

        Ok(header.entries_count)
    }

    /// Entries are variable-length: a fixed prefix, then 8-byte blocks until the block that
    /// ends in the name's NUL padding.
    fn parse_entries(
        &mut self,
        entries_count: u32,
        reader: &mut Checksum<impl Read>,
    ) -> anyhow::Result<()> {
        for _ in 0..entries_count {
            let mut entry_bytes = reader.read(ENTRY_MIN_SIZE)?.to_vec();

            while entry_bytes.last() != Some(&0) {
                entry_bytes.extend_from_slice(&reader.read(ENTRY_BLOCK)?);
            }

            let entry = IndexEntry::deserialize(Cursor::new(entry_bytes))?;
            self.store_entry(entry);
        }

        Ok(())
    }

    /// Header, entries in path order, then the trailing checksum.
    pub fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut writer = Checksum::new(Vec::new());

        let header = IndexHeader::for_entries(self.entries.len() as u32);
        writer.write(&header.serialize()?)?;

        for entry in self.entries.values() {
            writer.write(&entry.serialize()?)?;
        }

        writer.write_checksum()?;
        Ok(Bytes::from(writer.into_inner()))
    }

    /// Publish the index through the held lock; an unchanged index just releases it.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return self.release_lock();
        }

        let content = self.serialize()?;
        self.lockfile.write(&content)?;
        self.lockfile.commit()?;
        self.changed = false;

        debug!(entries = self.entries.len(), "index written");
        Ok(())
    }

    pub fn release_lock(&mut self) -> anyhow::Result<()> {
        self.lockfile.rollback()
    }

    /// Staged file or directory holding staged files.
    pub fn is_tracked(&self, path: &Path) -> bool {
        self.entries.contains_key(path) || self.parents.contains_key(path)
    }

    pub fn is_tracked_file(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn add(&mut self, entry: IndexEntry) {
        self.discard_conflicts(&entry);
        trace!(path = %entry.name.display(), oid = %entry.oid, "staging entry");
        self.store_entry(entry);
        self.changed = true;
    }

    /// Unstage `path` and everything nested under it.
    pub fn remove(&mut self, path: &Path) {
        self.remove_entry(path);
        self.remove_children(path);
        self.changed = true;
    }

    /// Make room for `entry`: a staged file at one of its ancestor paths goes, and so does
    /// everything below it if it used to be a directory.
    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        for parent in entry.parent_dirs() {
            self.remove_entry(parent);
        }
        self.remove_children(&entry.name);
    }

    fn store_entry(&mut self, entry: IndexEntry) {
        for parent in entry.parent_dirs() {
            self.parents
                .entry(parent.to_path_buf())
                .or_default()
                .insert(entry.name.clone());
        }

        self.entries.insert(entry.name.clone(), entry);
    }

    fn remove_children(&mut self, path: &Path) {
        if let Some(children) = self.parents.get(path).cloned() {
            for child in children {
                self.remove_entry(&child);
            }
        }
    }

    fn remove_entry(&mut self, path: &Path) {
        let Some(entry) = self.entries.remove(path) else {
            return;
        };

        for parent in entry.parent_dirs() {
            if let Some(children) = self.parents.get_mut(parent) {
                children.remove(path);
                if children.is_empty() {
                    self.parents.remove(parent);
                }
            }
        }
    }

    pub fn update_entry_stat(&mut self, path: &Path, stat: EntryMetadata) {
        if let Some(entry) = self.entries.get_mut(path)
            && entry.metadata != stat
        {
            entry.metadata = stat;
            self.changed = true;
        }
    }

    /// Whether the workspace file described by `stat` still holds the staged content.
    ///
    /// Size or mode differences answer immediately, and so do identical timestamps. Only then is
    /// the content read and hashed; a content match refreshes the stored snapshot so the next
    /// check is cheap again.
    pub fn matches(
        &mut self,
        path: &Path,
        stat: &EntryMetadata,
        read_content: impl FnOnce() -> anyhow::Result<Blob>,
    ) -> anyhow::Result<bool> {
        let Some(entry) = self.entries.get(path) else {
            return Ok(false);
        };

        if !entry.stat_match(stat) {
            return Ok(false);
        }
        if entry.times_match(stat) {
            return Ok(true);
        }

        let oid = read_content()?.object_id()?;
        if oid != entry.oid {
            return Ok(false);
        }

        self.update_entry_stat(path, stat.clone());
        Ok(true)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Staged paths equal to or below `path`; `.` selects everything.
    pub fn entries_under_path(&self, path: &Path) -> Vec<PathBuf> {
        self.entries
            .keys()
            .filter(|entry_path| path == Path::new(".") || entry_path.starts_with(path))
            .cloned()
            .collect()
    }
}

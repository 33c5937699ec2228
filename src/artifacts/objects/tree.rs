//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files (blobs) and
//! subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`, ordered byte-wise by name.
//!
//! ## Tree Building
//!
//! Trees are either built from index entries (nested `Directory` nodes, written bottom-up)
//! or parsed from the database, where subdirectories stay `LazyDirectory` until walked.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, envelope};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    /// Blob reference
    File(DatabaseEntry),
    /// Nested tree being built
    Directory(Tree),
    /// Subtree known only by its id
    LazyDirectory(DatabaseEntry),
}

impl TreeEntry {
    pub fn object_type(&self) -> ObjectType {
        match self {
            TreeEntry::File(_) => ObjectType::Blob,
            TreeEntry::Directory(_) | TreeEntry::LazyDirectory(_) => ObjectType::Tree,
        }
    }

    pub fn mode(&self) -> EntryMode {
        match self {
            TreeEntry::File(entry) | TreeEntry::LazyDirectory(entry) => entry.mode,
            TreeEntry::Directory(_) => EntryMode::Directory,
        }
    }

    pub fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeEntry::File(entry) | TreeEntry::LazyDirectory(entry) => Ok(entry.oid.clone()),
            TreeEntry::Directory(tree) => tree.object_id(),
        }
    }

    pub fn database_entry(&self) -> anyhow::Result<DatabaseEntry> {
        Ok(DatabaseEntry::new(self.oid()?, self.mode()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build a tree from index entries, whatever order they arrive in.
    pub fn build<'e>(entries: impl IntoIterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut entries = entries.into_iter().collect::<Vec<_>>();
        entries.sort_by(|a, b| {
            a.name
                .as_os_str()
                .as_encoded_bytes()
                .cmp(b.name.as_os_str().as_encoded_bytes())
        });

        let mut root = Self::default();
        for entry in entries {
            root.add_entry(&entry.parent_dirs(), entry)?;
        }

        Ok(root)
    }

    /// Visit every subtree before its parent, so child ids exist before the parent is stored.
    pub fn traverse<F>(&self, func: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Tree) -> anyhow::Result<()>,
    {
        for entry in self.entries.values() {
            if let TreeEntry::Directory(tree) = entry {
                tree.traverse(func)?;
            }
        }
        func(self)
    }

    fn add_entry(&mut self, parents: &[&Path], entry: &IndexEntry) -> anyhow::Result<()> {
        match parents.split_first() {
            None => {
                self.entries.insert(
                    entry.basename()?.to_string(),
                    TreeEntry::File(DatabaseEntry::new(entry.oid.clone(), entry.mode())),
                );
            }
            Some((parent, rest)) => {
                let name = parent
                    .file_name()
                    .and_then(|name| name.to_str())
                    .with_context(|| format!("Invalid directory name {}", parent.display()))?;

                let slot = self
                    .entries
                    .entry(name.to_string())
                    .or_insert_with(|| TreeEntry::Directory(Tree::default()));
                if !matches!(slot, TreeEntry::Directory(_)) {
                    *slot = TreeEntry::Directory(Tree::default());
                }
                if let TreeEntry::Directory(tree) = slot {
                    tree.add_entry(rest, entry)?;
                }
            }
        }

        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &TreeEntry)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name to (oid, mode) view of the direct children.
    pub fn database_entries(&self) -> anyhow::Result<BTreeMap<String, DatabaseEntry>> {
        self.entries
            .iter()
            .map(|(name, entry)| Ok((name.clone(), entry.database_entry()?)))
            .collect()
    }

    fn payload(&self) -> anyhow::Result<Vec<u8>> {
        let mut payload = Vec::new();
        for (name, entry) in &self.entries {
            write!(payload, "{:o} {}", entry.mode().as_u32(), name)?;
            payload.push(0);
            entry.oid()?.write_h40_to(&mut payload)?;
        }

        Ok(payload)
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(envelope(ObjectType::Tree, &self.payload()?))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            if reader.read_until(b' ', &mut mode_bytes)? == 0 {
                break;
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(RepositoryError::MalformedObject("unexpected EOF in tree mode".into()).into());
            }
            let mode = EntryMode::try_from(std::str::from_utf8(&mode_bytes)?)?;

            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(RepositoryError::MalformedObject("unexpected EOF in tree entry name".into()).into());
            }
            let name = String::from_utf8(name_bytes.clone())
                .map_err(|_| RepositoryError::MalformedObject("tree entry name is not UTF-8".into()))?;

            let oid = ObjectId::read_h40_from(&mut reader)?;
            let entry = DatabaseEntry::new(oid, mode);
            let entry = if mode.is_tree() {
                TreeEntry::LazyDirectory(entry)
            } else {
                TreeEntry::File(entry)
            };

            entries.insert(name, entry);
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(name, entry)| {
                format!(
                    "{:0>6} {} {}\t{}",
                    entry.mode(),
                    entry.object_type(),
                    entry.oid().unwrap_or_default(),
                    name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

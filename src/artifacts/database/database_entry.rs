use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct DatabaseEntry {
    pub oid: ObjectId,
    pub mode: EntryMode,
}

impl DatabaseEntry {
    pub fn is_tree(&self) -> bool {
        self.mode.is_tree()
    }

    /// Whether the staged entry records the same content and mode.
    pub fn matches_index_entry(&self, entry: &IndexEntry) -> bool {
        self.oid == entry.oid && self.mode == entry.mode()
    }
}

/// Every blob reachable from a tree, keyed by its workspace-relative path.
pub type FlatTree = BTreeMap<PathBuf, DatabaseEntry>;

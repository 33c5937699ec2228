use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use derive_new::new;
use std::path::Path;

/// Compares one path across the workspace, the index and a tree.
#[derive(Debug, Clone, Copy, new)]
pub struct Inspector<'r> {
    workspace: &'r Workspace,
}

impl<'r> Inspector<'r> {
    /// A file is trackable when the index does not hold it; a directory when anything below
    /// it is. Empty directories are never trackable.
    pub fn trackable_file(
        &self,
        index: &Index,
        path: &Path,
        stat: &EntryMetadata,
    ) -> anyhow::Result<bool> {
        if !stat.mode.is_tree() {
            return Ok(!index.is_tracked_file(path));
        }

        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for child in self.workspace.list_dir(Some(path))? {
            if let Some(stat) = self.workspace.stat_file(&child)? {
                if stat.mode.is_tree() {
                    dirs.push((child, stat));
                } else {
                    files.push((child, stat));
                }
            }
        }

        for (child, stat) in files.iter().chain(dirs.iter()) {
            if self.trackable_file(index, child, stat)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// How the workspace file at `path` differs from its staged entry. A content match found
    /// by hashing refreshes the staged stat snapshot.
    pub fn compare_index_to_workspace(
        &self,
        index: &mut Index,
        path: &Path,
        stat: Option<&EntryMetadata>,
    ) -> anyhow::Result<WorkspaceChangeType> {
        if !index.is_tracked_file(path) {
            return Ok(WorkspaceChangeType::Untracked);
        }

        let Some(stat) = stat else {
            return Ok(WorkspaceChangeType::Deleted);
        };

        if index.matches(path, stat, || self.workspace.parse_blob(path))? {
            Ok(WorkspaceChangeType::None)
        } else {
            Ok(WorkspaceChangeType::Modified)
        }
    }

    /// How a staged entry differs from the tree entry at the same path.
    pub fn compare_tree_to_index(
        &self,
        tree_entry: Option<&DatabaseEntry>,
        index_entry: Option<&IndexEntry>,
    ) -> IndexChangeType {
        match (tree_entry, index_entry) {
            (None, None) => IndexChangeType::None,
            (None, Some(_)) => IndexChangeType::Added,
            (Some(_), None) => IndexChangeType::Deleted,
            (Some(tree_entry), Some(index_entry)) if !tree_entry.matches_index_entry(index_entry) => {
                IndexChangeType::Modified
            }
            (Some(_), Some(_)) => IndexChangeType::None,
        }
    }
}

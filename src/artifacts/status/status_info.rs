use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::database::database_entry::FlatTree;
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::{
    FileChange, FileChangeType, IndexChangeType, WorkspaceChangeType,
};
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

pub type FileStatSet = BTreeMap<PathBuf, EntryMetadata>;
pub type ChangeSet = BTreeMap<PathBuf, FileChangeType>;

/// Snapshot of the three-way comparison between HEAD, the index and the workspace.
#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    /// Stat snapshots of every tracked file present in the workspace
    pub file_stats: FileStatSet,
    /// Untracked files, and untracked directories with a trailing `/`
    pub untracked_files: BTreeSet<PathBuf>,
    pub changed_files: BTreeMap<PathBuf, FileChange>,
    pub head_tree: FlatTree,
}

impl StatusInfo {
    pub fn index_changeset(&self) -> ChangeSet {
        self.changed_files
            .iter()
            .filter(|(_, change)| change.index_change != IndexChangeType::None)
            .map(|(path, change)| (path.clone(), FileChangeType::Index(change.index_change)))
            .collect()
    }

    pub fn workspace_changeset(&self) -> ChangeSet {
        self.changed_files
            .iter()
            .filter(|(_, change)| change.workspace_change != WorkspaceChangeType::None)
            .map(|(path, change)| {
                (
                    path.clone(),
                    FileChangeType::Workspace(change.workspace_change),
                )
            })
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.changed_files.is_empty() && self.untracked_files.is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
}

impl<'r> Status<'r> {
    /// Compare HEAD (`None` when unborn), the index and the workspace. Stat snapshots that
    /// turn out to be stale but whose content is unchanged are refreshed in `index`.
    pub fn initialize(&self, index: &mut Index, head: Option<&ObjectId>) -> anyhow::Result<StatusInfo> {
        let inspector = Inspector::new(self.workspace);
        let mut status = StatusInfo {
            head_tree: self.database.flatten_tree(head)?,
            ..Default::default()
        };

        self.scan_workspace(None, index, &inspector, &mut status)?;
        self.check_index_entries(index, &inspector, &mut status)?;
        self.collect_deleted_head_files(index, &mut status);

        debug!(
            changed = status.changed_files.len(),
            untracked = status.untracked_files.len(),
            "status collected"
        );
        Ok(status)
    }

    fn scan_workspace(
        &self,
        prefix: Option<&Path>,
        index: &Index,
        inspector: &Inspector<'_>,
        status: &mut StatusInfo,
    ) -> anyhow::Result<()> {
        for path in self.workspace.list_dir(prefix)? {
            let Some(stat) = self.workspace.stat_file(&path)? else {
                continue;
            };

            if index.is_tracked(&path) {
                if stat.mode.is_tree() {
                    self.scan_workspace(Some(&path), index, inspector, status)?;
                } else {
                    status.file_stats.insert(path, stat);
                }
            } else if inspector.trackable_file(index, &path, &stat)? {
                let mut path = path;
                if stat.mode.is_tree() {
                    path.push("");
                }
                status.untracked_files.insert(path);
            }
        }

        Ok(())
    }

    fn check_index_entries(
        &self,
        index: &mut Index,
        inspector: &Inspector<'_>,
        status: &mut StatusInfo,
    ) -> anyhow::Result<()> {
        let entries = index.entries().cloned().collect::<Vec<_>>();

        for entry in entries {
            let stat = status.file_stats.get(&entry.name);
            let workspace_change =
                inspector.compare_index_to_workspace(index, &entry.name, stat)?;
            let index_change =
                inspector.compare_tree_to_index(status.head_tree.get(&entry.name), Some(&entry));

            if workspace_change != WorkspaceChangeType::None
                || index_change != IndexChangeType::None
            {
                status.changed_files.insert(
                    entry.name.clone(),
                    FileChange {
                        index_change,
                        workspace_change,
                    },
                );
            }
        }

        Ok(())
    }

    fn collect_deleted_head_files(&self, index: &Index, status: &mut StatusInfo) {
        for path in status.head_tree.keys() {
            if !index.is_tracked_file(path) {
                status.changed_files.entry(path.clone()).or_default().index_change =
                    IndexChangeType::Deleted;
            }
        }
    }
}

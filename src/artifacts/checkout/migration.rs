//! Checkout migration and conflict detection
//!
//! A [`Migration`] turns a tree diff into filesystem and index changes:
//!
//! 1. Plan: classify every change as create, delete or update and collect the directories
//!    that have to appear or may disappear
//! 2. Check: compare index, workspace and both trees for every changed path, collecting
//!    every conflict before giving up
//! 3. Load every target blob, so a missing object fails before any file is touched
//! 4. Apply to the workspace, in the phase order [`Workspace::apply_migration`] uses
//! 5. Apply to the index
//!
//! Nothing is written unless the check finds no conflict at all.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::conflict::{ConflictReport, ConflictType};
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::tree_diff::{ChangeSet, TreeChangeType};
use crate::artifacts::index::index_entry::{IndexEntry, parent_dirs};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::inspector::Inspector;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionType {
    Create,
    Delete,
    Update,
}

/// Planned file actions; deletions carry no target entry.
pub type ActionsSet = BTreeMap<ActionType, Vec<(PathBuf, Option<DatabaseEntry>)>>;

pub struct Migration<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
    index: &'r mut Index,
    changes: ChangeSet,
    actions: ActionsSet,
    mkdirs: BTreeSet<PathBuf>,
    rmdirs: BTreeSet<PathBuf>,
    blobs: BTreeMap<ObjectId, Blob>,
    conflicts: ConflictReport,
}

impl<'r> Migration<'r> {
    pub fn new(
        database: &'r Database,
        workspace: &'r Workspace,
        index: &'r mut Index,
        changes: ChangeSet,
    ) -> Self {
        Migration {
            database,
            workspace,
            index,
            changes,
            actions: ActionsSet::new(),
            mkdirs: BTreeSet::new(),
            rmdirs: BTreeSet::new(),
            blobs: BTreeMap::new(),
            conflicts: ConflictReport::default(),
        }
    }

    pub fn actions(&self, action: ActionType) -> &[(PathBuf, Option<DatabaseEntry>)] {
        self.actions.get(&action).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn mkdirs(&self) -> &BTreeSet<PathBuf> {
        &self.mkdirs
    }

    pub fn rmdirs(&self) -> &BTreeSet<PathBuf> {
        &self.rmdirs
    }

    /// A target blob loaded before the workspace was touched.
    pub fn blob(&self, oid: &ObjectId) -> anyhow::Result<&Blob> {
        self.blobs
            .get(oid)
            .with_context(|| format!("blob {oid} was not loaded for checkout"))
    }

    /// Plan, check, then update the workspace and the index. On conflict nothing is touched
    /// and every conflict found is returned as one [`RepositoryError::Conflict`].
    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.plan_changes()?;

        if !self.conflicts.is_empty() {
            let conflicts = std::mem::take(&mut self.conflicts);
            self.discard_plan();
            info!(conflicts = conflicts.len(), "checkout aborted");
            return Err(RepositoryError::Conflict(conflicts).into());
        }

        if let Err(error) = self.load_blobs() {
            self.discard_plan();
            return Err(error);
        }

        let workspace = self.workspace;
        workspace.apply_migration(self)?;
        self.update_index()?;

        Ok(())
    }

    fn plan_changes(&mut self) -> anyhow::Result<()> {
        let changes = std::mem::take(&mut self.changes);

        for (path, change) in &changes {
            self.check_for_conflict(path, change)?;
            self.record_change(path, change);
        }

        debug!(
            creates = self.actions(ActionType::Create).len(),
            deletes = self.actions(ActionType::Delete).len(),
            updates = self.actions(ActionType::Update).len(),
            "migration planned"
        );
        self.changes = changes;

        Ok(())
    }

    fn discard_plan(&mut self) {
        self.actions.clear();
        self.mkdirs.clear();
        self.rmdirs.clear();
        self.blobs.clear();
    }

    fn load_blobs(&mut self) -> anyhow::Result<()> {
        let targets = [ActionType::Create, ActionType::Update]
            .into_iter()
            .flat_map(|action| self.actions(action))
            .filter_map(|(_, entry)| entry.as_ref().map(|entry| entry.oid.clone()))
            .collect::<BTreeSet<_>>();

        for oid in targets {
            let blob = self.database.load_blob(&oid)?;
            self.blobs.insert(oid, blob);
        }

        Ok(())
    }

    fn check_for_conflict(&mut self, path: &Path, change: &TreeChangeType) -> anyhow::Result<()> {
        let inspector = Inspector::new(self.workspace);
        let entry = self.index.entry_by_path(path).cloned();
        let (old_entry, new_entry) = (change.old_entry(), change.new_entry());

        if Self::index_differs_from_trees(&inspector, entry.as_ref(), old_entry, new_entry) {
            self.conflicts.record(ConflictType::StaleFile, path.to_path_buf());
            return Ok(());
        }

        let stat = self.workspace.stat_file(path)?;
        let conflict_type = ConflictType::classify(stat.as_ref(), entry.as_ref(), new_entry);

        match stat {
            Some(stat) if stat.mode.is_tree() => {
                if inspector.trackable_file(self.index, path, &stat)? {
                    self.conflicts.record(conflict_type, path.to_path_buf());
                }
            }
            Some(stat) => {
                let change = inspector.compare_index_to_workspace(self.index, path, Some(&stat))?;
                if change != WorkspaceChangeType::None {
                    self.conflicts.record(conflict_type, path.to_path_buf());
                }
            }
            None => {
                if let Some(parent) = self.untracked_parent(&inspector, path)? {
                    let reported = if entry.is_some() { path.to_path_buf() } else { parent };
                    self.conflicts.record(conflict_type, reported);
                }
            }
        }

        Ok(())
    }

    /// Nearest ancestor of `path` that is an untracked file in the workspace.
    fn untracked_parent(
        &self,
        inspector: &Inspector<'_>,
        path: &Path,
    ) -> anyhow::Result<Option<PathBuf>> {
        for parent in parent_dirs(path).into_iter().rev() {
            match self.workspace.stat_file(parent)? {
                Some(stat) if !stat.mode.is_tree() => {
                    if inspector.trackable_file(self.index, parent, &stat)? {
                        return Ok(Some(parent.to_path_buf()));
                    }
                }
                _ => {}
            }
        }

        Ok(None)
    }

    /// A staged entry that matches neither side would be lost by the checkout.
    fn index_differs_from_trees(
        inspector: &Inspector<'_>,
        index_entry: Option<&IndexEntry>,
        old_entry: Option<&DatabaseEntry>,
        new_entry: Option<&DatabaseEntry>,
    ) -> bool {
        inspector.compare_tree_to_index(old_entry, index_entry) != IndexChangeType::None
            && inspector.compare_tree_to_index(new_entry, index_entry) != IndexChangeType::None
    }

    fn record_change(&mut self, path: &Path, change: &TreeChangeType) {
        let ancestors = parent_dirs(path)
            .into_iter()
            .map(Path::to_path_buf)
            .collect::<Vec<_>>();

        let (action, entry) = match change {
            TreeChangeType::Added(new) => {
                self.mkdirs.extend(ancestors);
                (ActionType::Create, Some(new.clone()))
            }
            TreeChangeType::Deleted(_) => {
                self.rmdirs.extend(ancestors);
                (ActionType::Delete, None)
            }
            TreeChangeType::Modified { new, .. } => {
                self.mkdirs.extend(ancestors);
                (ActionType::Update, Some(new.clone()))
            }
        };

        self.actions
            .entry(action)
            .or_default()
            .push((path.to_path_buf(), entry));
    }

    fn update_index(&mut self) -> anyhow::Result<()> {
        for (path, _) in self.actions(ActionType::Delete).to_vec() {
            self.index.remove(&path);
        }

        for action in [ActionType::Create, ActionType::Update] {
            for (path, entry) in self.actions(action).to_vec() {
                let entry =
                    entry.with_context(|| format!("no target entry for {}", path.display()))?;
                let stat = self
                    .workspace
                    .stat_file(&path)?
                    .with_context(|| format!("{} missing after checkout", path.display()))?;

                self.index.add(IndexEntry::new(path, entry.oid, stat));
            }
        }

        debug!(entries = self.index.len(), "migration applied to index");
        Ok(())
    }
}

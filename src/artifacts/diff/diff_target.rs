use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use anyhow::Context;
use std::path::{Path, PathBuf};

const NULL_OID_RAW: &str = "0000000000000000000000000000000000000000";
const NULL_PATH: &str = "/dev/null";

pub type LineSet = Vec<String>;

/// One side of a file diff: a blob from a tree, the index or the workspace, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffTarget {
    pub file: PathBuf,
    pub oid: ObjectId,
    /// `None` when the file does not exist on this side
    pub mode: Option<EntryMode>,
    pub data: LineSet,
}

impl DiffTarget {
    /// The blob a tree records for `file`, or nothing when the tree has no such entry.
    pub fn from_entry(
        file: &Path,
        entry: Option<&DatabaseEntry>,
        database: &Database,
    ) -> anyhow::Result<Self> {
        let Some(entry) = entry else {
            return Self::from_nothing(file);
        };

        let blob = database.load_blob(&entry.oid)?;
        Ok(DiffTarget {
            file: file.to_path_buf(),
            oid: entry.oid.clone(),
            mode: Some(entry.mode),
            data: blob.lines(),
        })
    }

    pub fn from_index(file: &Path, index: &Index, database: &Database) -> anyhow::Result<Self> {
        let entry = index
            .entry_by_path(file)
            .with_context(|| format!("path '{}' is not staged", file.display()))?;

        let blob = database.load_blob(&entry.oid)?;
        Ok(DiffTarget {
            file: file.to_path_buf(),
            oid: entry.oid.clone(),
            mode: Some(entry.mode()),
            data: blob.lines(),
        })
    }

    /// The workspace file, hashed without being stored.
    pub fn from_file(file: &Path, workspace: &Workspace, stat: &EntryMetadata) -> anyhow::Result<Self> {
        let blob = workspace.parse_blob(file)?;

        Ok(DiffTarget {
            file: file.to_path_buf(),
            oid: blob.object_id()?,
            mode: Some(stat.mode),
            data: blob.lines(),
        })
    }

    pub fn from_nothing(file: &Path) -> anyhow::Result<Self> {
        Ok(DiffTarget {
            file: file.to_path_buf(),
            oid: ObjectId::try_parse(NULL_OID_RAW.to_string())?,
            mode: None,
            data: LineSet::new(),
        })
    }

    pub fn exists(&self) -> bool {
        self.mode.is_some()
    }

    /// Path shown on the `---`/`+++` lines, under the given `a`/`b` prefix.
    pub fn diff_path(&self, prefix: &str) -> String {
        if self.exists() {
            format!("{prefix}/{}", self.file.display())
        } else {
            NULL_PATH.to_string()
        }
    }

    pub fn pretty_mode(&self) -> &'static str {
        self.mode.map(|mode| mode.as_str()).unwrap_or("100644")
    }
}

/// Old and new side of one changed file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDiff {
    pub a: DiffTarget,
    pub b: DiffTarget,
}

impl FileDiff {
    pub fn new(a: DiffTarget, b: DiffTarget) -> Self {
        FileDiff { a, b }
    }

    /// Staged entry against the workspace file.
    pub fn index_to_workspace(
        file: &Path,
        change: WorkspaceChangeType,
        stat: Option<&EntryMetadata>,
        index: &Index,
        database: &Database,
        workspace: &Workspace,
    ) -> anyhow::Result<Option<Self>> {
        let b = match (change, stat) {
            (WorkspaceChangeType::Modified, Some(stat)) => DiffTarget::from_file(file, workspace, stat)?,
            (WorkspaceChangeType::Deleted, _) => DiffTarget::from_nothing(file)?,
            _ => return Ok(None),
        };

        Ok(Some(FileDiff::new(DiffTarget::from_index(file, index, database)?, b)))
    }

    /// HEAD entry against the staged entry.
    pub fn tree_to_index(
        file: &Path,
        change: IndexChangeType,
        head_entry: Option<&DatabaseEntry>,
        index: &Index,
        database: &Database,
    ) -> anyhow::Result<Option<Self>> {
        let (a, b) = match change {
            IndexChangeType::None => return Ok(None),
            IndexChangeType::Added => (
                DiffTarget::from_nothing(file)?,
                DiffTarget::from_index(file, index, database)?,
            ),
            IndexChangeType::Modified => (
                DiffTarget::from_entry(file, head_entry, database)?,
                DiffTarget::from_index(file, index, database)?,
            ),
            IndexChangeType::Deleted => (
                DiffTarget::from_entry(file, head_entry, database)?,
                DiffTarget::from_nothing(file)?,
            ),
        };

        Ok(Some(FileDiff::new(a, b)))
    }

    /// `A`, `D` or `M`, as `--name-status` prints it.
    pub fn status_char(&self) -> char {
        match (self.a.exists(), self.b.exists()) {
            (false, _) => 'A',
            (_, false) => 'D',
            _ => 'M',
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.a.oid == self.b.oid && self.a.mode == self.b.mode
    }
}

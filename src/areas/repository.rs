use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::revision::{Revision, RevisionResolver};
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::diff::tree_diff::ChangeSet;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::status_info::Status;
use crate::errors::{AmbiguousCandidate, RepositoryError, repository_error};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const METADATA_DIR: &str = ".git";

/// A workspace together with its metadata directory, and the sink command output goes to.
pub struct Repository {
    path: Box<Path>,
    writer: Box<dyn Write>,
    index: Index,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &Path, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;
        let git_path = path.join(METADATA_DIR);

        Ok(Repository {
            index: Index::new(git_path.join("index").into_boxed_path()),
            database: Database::new(git_path.join("objects").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(git_path.into_boxed_path()),
            path: path.into_boxed_path(),
            writer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn writer(&mut self) -> &mut dyn Write {
        self.writer.as_mut()
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut Index {
        &mut self.index
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// The status collector alongside the index it refreshes.
    pub fn status_parts(&mut self) -> (Status<'_>, &mut Index) {
        (Status::new(&self.database, &self.workspace), &mut self.index)
    }

    /// A checkout migration over this repository's stores and its index.
    pub fn migration(&mut self, changes: ChangeSet) -> Migration<'_> {
        Migration::new(&self.database, &self.workspace, &mut self.index, changes)
    }

    pub fn resolve_revision(&self, revision: &str) -> anyhow::Result<ObjectId> {
        Revision::try_parse(revision)?.resolve(self)
    }

    /// Resolve an abbreviated id to a unique commit.
    fn resolve_prefix(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        let mut candidates = self.database.load_prefix(prefix)?;

        match candidates.len() {
            0 => Err(RepositoryError::ObjectNotFound(prefix.to_string()).into()),
            1 => {
                let (oid, object) = candidates.remove(0);
                match object {
                    ObjectBox::Commit(_) => Ok(oid),
                    other => Err(RepositoryError::NotACommit {
                        oid: oid.to_short_oid(),
                        object_type: other.object_type().to_string(),
                    }
                    .into()),
                }
            }
            _ => Err(RepositoryError::AmbiguousReference {
                prefix: prefix.to_string(),
                candidates: candidates
                    .into_iter()
                    .map(|(oid, object)| {
                        let object_type = object.object_type().to_string();
                        let title = object.into_commit().map(|commit| {
                            format!("{} - {}", commit.author().short_date(), commit.title())
                        });
                        AmbiguousCandidate {
                            short_oid: oid.to_short_oid(),
                            object_type,
                            title,
                        }
                    })
                    .collect(),
            }
            .into()),
        }
    }
}

impl RevisionResolver for Repository {
    /// Refs win over abbreviated ids; an unborn branch resolves to nothing.
    fn resolve_ref(&self, name: &str) -> anyhow::Result<ObjectId> {
        match self.refs.read_ref(name) {
            Ok(Some(oid)) => Ok(oid),
            Ok(None) => Err(RepositoryError::RefNotFound(name.to_string()).into()),
            Err(error)
                if matches!(repository_error(&error), Some(RepositoryError::RefNotFound(_)))
                    && ObjectId::is_prefix_candidate(name) =>
            {
                self.resolve_prefix(name)
            }
            Err(error) => Err(error),
        }
    }

    fn parent(&self, oid: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        Ok(self.database.load_commit(oid)?.parent().cloned())
    }
}

//! References (HEAD and branches)
//!
//! References are human-readable names pointing to commits. A reference file holds either:
//! - A 40-character object id (direct reference)
//! - `ref: <path>` (symbolic reference, e.g. HEAD -> refs/heads/master)
//!
//! An empty branch file is an unborn branch: it exists but points at no commit yet.
//!
//! Every write goes through a [`Lockfile`], so concurrent writers of the same ref fail fast
//! instead of interleaving.

use crate::areas::lockfile::Lockfile;
use crate::artifacts::branch::REF_ALIASES;
use crate::artifacts::branch::branch_name::{BranchName, REF_PREFIX, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata root (typically `.git`)
    path: Box<Path>,
}

const SYMREF_REGEX: &str = r"^ref: (.+)$";

pub const HEAD_REF_NAME: &str = "HEAD";

pub const DEFAULT_BRANCH: &str = "master";

#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef(SymRefName),
    Oid(ObjectId),
}

impl SymRefOrOid {
    /// `None` for a missing or empty ref file.
    fn read(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read ref file {}", path.display()))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref = regex::Regex::new(SYMREF_REGEX)
            .with_context(|| format!("invalid symref regex: {SYMREF_REGEX}"))?
            .captures(content);
        match symref {
            Some(symref) => Ok(Some(SymRefOrOid::SymRef(SymRefName::new(
                symref[1].to_string(),
            )))),
            None => Ok(Some(SymRefOrOid::Oid(
                ObjectId::try_parse(content.to_string()).map_err(|_| {
                    RepositoryError::MalformedObject(format!(
                        "ref {} holds '{content}'",
                        path.display()
                    ))
                })?,
            ))),
        }
    }
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    /// Point HEAD at the (unborn) default branch.
    pub fn init(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(self.heads_path()).with_context(|| {
            format!("Unable to create {}", self.heads_path().display())
        })?;

        self.write_ref_file(&self.head_path(), &format!("ref: {REF_PREFIX}{DEFAULT_BRANCH}"))
    }

    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.head_path())
    }

    /// Resolve a ref name. `HEAD` is the only ref read from the metadata root; any other name
    /// is searched as `refs/heads/<name>`, then `refs/<name>`.
    ///
    /// # Returns
    ///
    /// `None` when the ref exists but is unborn; [`RepositoryError::RefNotFound`] when no file
    /// matches.
    pub fn read_ref(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let ref_path = self.find_ref_path(name)?;
        self.read_symref(&ref_path)
    }

    fn find_ref_path(&self, name: &str) -> anyhow::Result<PathBuf> {
        if name == HEAD_REF_NAME {
            return Ok(self.head_path());
        }

        [self.heads_path(), self.refs_path()]
            .iter()
            .map(|base_path| base_path.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| RepositoryError::RefNotFound(name.to_string()).into())
    }

    fn read_symref(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        match SymRefOrOid::read(path)? {
            Some(SymRefOrOid::SymRef(sym_ref_name)) => {
                self.read_symref(&self.path.join(sym_ref_name.as_ref_path()))
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    /// The ref HEAD finally resolves to: `refs/heads/<branch>`, or `HEAD` when detached.
    pub fn current_ref(&self) -> anyhow::Result<SymRefName> {
        self.follow(SymRefName::new(HEAD_REF_NAME.to_string()))
    }

    fn follow(&self, source: SymRefName) -> anyhow::Result<SymRefName> {
        match SymRefOrOid::read(&self.path.join(source.as_ref_path()))? {
            Some(SymRefOrOid::SymRef(target)) => self.follow(target),
            Some(SymRefOrOid::Oid(_)) | None => Ok(source),
        }
    }

    /// Advance whatever HEAD ultimately points at: the current branch, or HEAD itself when
    /// detached.
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let target = self.current_ref()?;
        self.write_ref_file(&self.path.join(target.as_ref_path()), oid.as_ref())?;
        debug!(target = %target, %oid, "ref updated");

        Ok(())
    }

    /// Attach HEAD to `revision` when it names a branch, otherwise detach it at `oid`.
    /// `HEAD` itself (or an alias of it) leaves HEAD as it is.
    pub fn set_head(&self, revision: &str, oid: &ObjectId) -> anyhow::Result<()> {
        if *REF_ALIASES.get(revision).unwrap_or(&revision) == HEAD_REF_NAME {
            return Ok(());
        }

        if self.heads_path().join(revision).is_file() {
            self.write_ref_file(&self.head_path(), &format!("ref: {REF_PREFIX}{revision}"))
        } else {
            self.write_ref_file(&self.head_path(), oid.as_ref())
        }
    }

    pub fn create_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref());

        if branch_path.exists() {
            return Err(RepositoryError::BranchExists(name.to_string()).into());
        }

        self.write_ref_file(&branch_path, oid.as_ref())?;
        debug!(branch = %name, %oid, "branch created");

        Ok(())
    }

    /// Branch refs under `refs/heads`, sorted by name.
    pub fn list_branches(&self) -> anyhow::Result<Vec<SymRefName>> {
        let heads_path = self.heads_path();
        if !heads_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_none_or(|ext| ext != "lock"))
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&self.path).ok()?;
                Some(SymRefName::new(relative_path.to_string_lossy().into_owned()))
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    pub fn read_branch(&self, sym_ref: &SymRefName) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.path.join(sym_ref.as_ref_path()))
    }

    fn write_ref_file(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .with_context(|| format!("Invalid ref path {}", path.display()))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create ref directory {}", parent.display()))?;

        let mut lockfile = Lockfile::new(path.to_path_buf().into_boxed_path());
        lockfile.hold_for_update()?;
        lockfile.write(format!("{content}\n").as_bytes())?;
        lockfile.commit()
    }
}

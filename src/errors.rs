//! Typed failures surfaced by the repository core.
//!
//! Every fallible function returns `anyhow::Result`; the variants below are raised through
//! `anyhow` and recovered with `downcast_ref::<RepositoryError>()` where a caller needs to
//! tell them apart (the binary's exit code, tests).

use crate::artifacts::checkout::conflict::ConflictReport;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`RepositoryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    FormatError,
    LockContention,
    Conflict,
    AmbiguousReference,
    Usage,
}

/// One object matching an abbreviated id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousCandidate {
    pub short_oid: String,
    pub object_type: String,
    pub title: Option<String>,
}

impl std::fmt::Display for AmbiguousCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{} {} {}", self.short_oid, self.object_type, title),
            None => write!(f, "{} {}", self.short_oid, self.object_type),
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("object {0} not found")]
    ObjectNotFound(String),

    #[error("not a valid object name: '{0}'")]
    RefNotFound(String),

    #[error("object {expected} is corrupt: its content hashes to {actual}")]
    CorruptObject { expected: String, actual: String },

    #[error("malformed object: {0}")]
    MalformedObject(String),

    #[error("bad index file signature: {0:?}")]
    InvalidIndexSignature(String),

    #[error("bad index file version: {0}")]
    UnsupportedIndexVersion(u32),

    #[error("index checksum does not match value stored on disk")]
    IndexChecksumMismatch,

    #[error("unexpected end-of-file while reading index")]
    IndexTruncated,

    #[error(
        "unable to create '{}': File exists.\n\nAnother kit process seems to be running in this repository.",
        .0.display()
    )]
    LockContention(PathBuf),

    #[error("{0}")]
    Conflict(ConflictReport),

    #[error(
        "short object ID {prefix} is ambiguous\nhint: The candidates are:\n{}",
        format_hints(.candidates)
    )]
    AmbiguousReference {
        prefix: String,
        candidates: Vec<AmbiguousCandidate>,
    },

    #[error("revision {0} has no parent")]
    NoParent(String),

    #[error("object {oid} is a {object_type}, not a commit")]
    NotACommit { oid: String, object_type: String },

    #[error("not a valid revision: '{0}'")]
    InvalidRevision(String),

    #[error("a branch named '{0}' already exists")]
    BranchExists(String),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::ObjectNotFound(_)
            | RepositoryError::RefNotFound(_)
            | RepositoryError::NoParent(_) => ErrorKind::NotFound,
            RepositoryError::CorruptObject { .. }
            | RepositoryError::MalformedObject(_)
            | RepositoryError::InvalidIndexSignature(_)
            | RepositoryError::UnsupportedIndexVersion(_)
            | RepositoryError::IndexChecksumMismatch
            | RepositoryError::IndexTruncated => ErrorKind::FormatError,
            RepositoryError::LockContention(_) => ErrorKind::LockContention,
            RepositoryError::Conflict(_) => ErrorKind::Conflict,
            RepositoryError::AmbiguousReference { .. } => ErrorKind::AmbiguousReference,
            RepositoryError::NotACommit { .. }
            | RepositoryError::InvalidRevision(_)
            | RepositoryError::BranchExists(_) => ErrorKind::Usage,
        }
    }
}

fn format_hints(candidates: &[AmbiguousCandidate]) -> String {
    candidates
        .iter()
        .map(|candidate| format!("hint:   {candidate}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Find the typed error behind an `anyhow` chain, if any.
pub fn repository_error(error: &anyhow::Error) -> Option<&RepositoryError> {
    error.chain().find_map(|cause| cause.downcast_ref::<RepositoryError>())
}

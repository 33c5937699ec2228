use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;

/// Lookups a revision needs from the repository it is resolved against.
pub trait RevisionResolver {
    /// Commit id a ref name (or abbreviated id) stands for.
    fn resolve_ref(&self, name: &str) -> anyhow::Result<ObjectId>;

    /// Parent of a commit, `None` for a root commit.
    fn parent(&self, oid: &ObjectId) -> anyhow::Result<Option<ObjectId>>;
}

/// A revision expression.
///
/// - Branch/ref names: `main`, `feature/new-feature`, `HEAD`
/// - Aliases: `@` (resolves to `HEAD`)
/// - Abbreviated or full ids, resolved as a fallback when no ref has that name
/// - Parent notation: `<revision>^`
/// - Ancestor notation: `<revision>~<n>` (`~` alone is `~1`)
///
/// Operators bind to everything on their left, so `main~2^` is the parent of `main~2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Ref(BranchName),
    Parent(Box<Revision>),
    Ancestor(Box<Revision>, usize),
}

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let invalid = || RepositoryError::InvalidRevision(revision.to_string());

        if let Some(caps) = compile(PARENT_REGEX)?.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Parent(Box::new(base_revision)))
        } else if let Some(caps) = compile(ANCESTOR_REGEX)?.captures(revision) {
            let generations = match &caps[2] {
                "" => 1,
                digits => digits.parse::<usize>().map_err(|_| invalid())?,
            };
            let base_revision = Self::try_parse(&caps[1])?;

            Ok(Revision::Ancestor(Box::new(base_revision), generations))
        } else {
            let resolved_name = *REF_ALIASES.get(revision).unwrap_or(&revision);
            let branch_name =
                BranchName::try_parse(resolved_name.to_string()).map_err(|_| invalid())?;

            Ok(Revision::Ref(branch_name))
        }
    }

    pub fn resolve(&self, resolver: &impl RevisionResolver) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Ref(name) => resolver.resolve_ref(name.as_ref()),
            Revision::Parent(base_revision) => {
                let oid = base_revision.resolve(resolver)?;
                self.commit_parent(&oid, resolver)
            }
            Revision::Ancestor(base_revision, generations) => {
                let mut oid = base_revision.resolve(resolver)?;
                for _ in 0..*generations {
                    oid = self.commit_parent(&oid, resolver)?;
                }

                Ok(oid)
            }
        }
    }

    fn commit_parent(
        &self,
        oid: &ObjectId,
        resolver: &impl RevisionResolver,
    ) -> anyhow::Result<ObjectId> {
        resolver
            .parent(oid)?
            .ok_or_else(|| RepositoryError::NoParent(self.to_string()).into())
    }
}

fn compile(pattern: &str) -> anyhow::Result<regex::Regex> {
    regex::Regex::new(pattern).with_context(|| format!("invalid revision regex: {pattern}"))
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Revision::Ref(name) => write!(f, "{name}"),
            Revision::Parent(base) => write!(f, "{base}^"),
            Revision::Ancestor(base, generations) => write!(f, "{base}~{generations}"),
        }
    }
}

use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::RepositoryError;
use colored::Colorize;

impl Repository {
    /// Create `branch_name` at `source_revision`, or at HEAD when no revision is given.
    pub fn branch(&mut self, branch_name: &str, source_revision: Option<&str>) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;

        let source_oid = match source_revision {
            Some(revision) => self.resolve_revision(revision)?,
            None => self
                .refs()
                .read_head()?
                .ok_or_else(|| RepositoryError::RefNotFound("HEAD".to_string()))?,
        };

        self.refs().create_branch(&branch_name, &source_oid)
    }

    /// Print every branch, marking the one HEAD is attached to.
    pub fn list_branches(&mut self) -> anyhow::Result<()> {
        let current = self.refs().current_ref()?;

        for branch in self.refs().list_branches()? {
            if branch == current {
                writeln!(self.writer(), "* {}", branch.short_name().green())?;
            } else {
                writeln!(self.writer(), "  {}", branch.short_name())?;
            }
        }

        Ok(())
    }
}

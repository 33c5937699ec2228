use crate::areas::repository::Repository;

impl Repository {
    /// List every blob reachable from the tree a revision points at.
    pub fn ls_tree(&mut self, revision: &str) -> anyhow::Result<()> {
        let oid = self.resolve_revision(revision)?;
        let entries = self.database().flatten_tree(Some(&oid))?;

        for (path, entry) in entries {
            writeln!(
                self.writer(),
                "{} blob {}\t{}",
                entry.mode.as_str(),
                entry.oid,
                path.display()
            )?;
        }

        Ok(())
    }
}

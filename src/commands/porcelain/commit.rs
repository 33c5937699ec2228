use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::tree::Tree;
use tracing::info;

impl Repository {
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        self.index_mut().load()?;

        let tree = Tree::build(self.index().entries())?;
        tree.traverse(&mut |subtree: &Tree| self.database().store(subtree).map(|_| ()))?;
        let tree_id = self.database().store(&tree)?;

        let parent = self.refs().read_head()?;
        let is_root = if parent.is_some() { "" } else { "(root-commit) " };

        let author = Author::load_from_env()?;
        let commit = Commit::new(parent, tree_id, author, message.trim().to_string());
        let commit_id = self.database().store(&commit)?;
        self.refs().update_head(&commit_id)?;

        info!(commit = %commit_id, "commit created");
        writeln!(
            self.writer(),
            "[{}{}] {}",
            is_root,
            commit_id.to_short_oid(),
            commit.title()
        )?;

        Ok(())
    }
}

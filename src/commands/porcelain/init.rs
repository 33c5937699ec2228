use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use tracing::info;

impl Repository {
    /// Create the object store and point HEAD at the unborn default branch.
    pub fn init(&mut self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .git/objects directory")?;

        self.refs()
            .init()
            .context("Failed to create initial HEAD reference")?;

        let git_path = self.git_path();
        info!(path = %git_path.display(), "repository initialized");
        writeln!(
            self.writer(),
            "Initialized empty Git repository in {}",
            git_path.display()
        )?;

        Ok(())
    }
}

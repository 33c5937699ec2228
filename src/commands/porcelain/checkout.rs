use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::SymRefName;
use crate::artifacts::objects::object_id::ObjectId;
use tracing::info;

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around, make experimental
changes and commit them, and you can discard any commits you make in this
state without impacting any branches by performing another checkout.

If you want to create a new branch to retain commits you create, you may
do so (now or later) by using the branch command. Example:

    kit branch <new-branch-name>
"#;

impl Repository {
    /// Move the workspace, the index and HEAD to `target`. Any conflict leaves all three
    /// untouched.
    pub fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        let current_ref = self.refs().current_ref()?;
        let current_oid = self.refs().read_head()?;
        let target_oid = self.resolve_revision(target)?;

        self.index_mut().load_for_update()?;
        if let Err(error) = self.migrate(current_oid.as_ref(), &target_oid) {
            self.index_mut().release_lock()?;
            return Err(error);
        }
        self.index_mut().write_updates()?;

        self.refs().set_head(target, &target_oid)?;
        let new_ref = self.refs().current_ref()?;
        info!(from = %current_ref, to = %new_ref, oid = %target_oid, "checked out");

        self.print_previous_head(&current_ref, current_oid.as_ref(), &target_oid)?;
        self.print_detachment_notice(&current_ref, &new_ref, target);
        self.print_new_head(&current_ref, &new_ref, &target_oid, target)?;

        Ok(())
    }

    fn migrate(&mut self, current_oid: Option<&ObjectId>, target_oid: &ObjectId) -> anyhow::Result<()> {
        let changes = self
            .database()
            .tree_diff(current_oid, Some(target_oid))?
            .into_changes();

        self.migration(changes).apply_changes()
    }

    fn print_previous_head(
        &self,
        current_ref: &SymRefName,
        current_oid: Option<&ObjectId>,
        target_oid: &ObjectId,
    ) -> anyhow::Result<()> {
        if let Some(current_oid) = current_oid
            && current_ref.is_detached_head()
            && current_oid != target_oid
        {
            self.print_head_position("Previous HEAD position was", current_oid)?;
        }

        Ok(())
    }

    fn print_detachment_notice(&self, current_ref: &SymRefName, new_ref: &SymRefName, target: &str) {
        if !current_ref.is_detached_head() && new_ref.is_detached_head() {
            eprintln!("Note: checking out '{target}'.\n{DETACHMENT_NOTICE}");
        }
    }

    fn print_new_head(
        &self,
        current_ref: &SymRefName,
        new_ref: &SymRefName,
        target_oid: &ObjectId,
        target: &str,
    ) -> anyhow::Result<()> {
        if new_ref.is_detached_head() {
            self.print_head_position("HEAD is now at", target_oid)?;
        } else if new_ref == current_ref {
            eprintln!("Already on '{}'", new_ref.short_name());
        } else {
            eprintln!("Switched to branch '{target}'");
        }

        Ok(())
    }

    fn print_head_position(&self, message: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let commit = self.database().load_commit(oid)?;
        eprintln!("{message} {} {}", oid.to_short_oid(), commit.title());

        Ok(())
    }
}

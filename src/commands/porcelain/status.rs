use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{ChangeSet, StatusInfo};
use colored::Colorize;

const UNTRACKED_CODE: &str = "??";

impl Repository {
    /// Report HEAD vs index vs workspace. Stat snapshots refreshed along the way are written
    /// back to the index.
    pub fn status(&mut self, porcelain: bool) -> anyhow::Result<()> {
        self.index_mut().load_for_update()?;

        let status = match self.collect_status() {
            Ok(status) => status,
            Err(error) => {
                self.index_mut().release_lock()?;
                return Err(error);
            }
        };
        self.index_mut().write_updates()?;

        if porcelain {
            self.print_porcelain(&status)
        } else {
            self.print_long_format(&status)
        }
    }

    fn collect_status(&mut self) -> anyhow::Result<StatusInfo> {
        let head = self.refs().read_head()?;
        let (status, index) = self.status_parts();
        status.initialize(index, head.as_ref())
    }

    /// `XY path` lines, tracked and untracked interleaved by path.
    fn print_porcelain(&mut self, status: &StatusInfo) -> anyhow::Result<()> {
        let mut codes = status
            .changed_files
            .iter()
            .map(|(path, change)| (path, change.to_string()))
            .chain(
                status
                    .untracked_files
                    .iter()
                    .map(|path| (path, UNTRACKED_CODE.to_string())),
            )
            .collect::<Vec<_>>();
        codes.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (path, code) in codes {
            writeln!(self.writer(), "{code} {}", path.display())?;
        }

        Ok(())
    }

    fn print_long_format(&mut self, status: &StatusInfo) -> anyhow::Result<()> {
        self.print_changes("Changes to be committed:", &status.index_changeset())?;
        self.print_changes("Changes not staged for commit:", &status.workspace_changeset())?;

        if !status.untracked_files.is_empty() {
            writeln!(self.writer(), "Untracked files:\n")?;
            for path in &status.untracked_files {
                writeln!(self.writer(), "\t{}", path.display().to_string().red())?;
            }
            writeln!(self.writer())?;
        }

        self.print_commit_hint(status)
    }

    fn print_changes(&mut self, title: &str, changes: &ChangeSet) -> anyhow::Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        writeln!(self.writer(), "{title}\n")?;
        for (path, change) in changes {
            writeln!(self.writer(), "{change}{}", path.display())?;
        }
        writeln!(self.writer())?;

        Ok(())
    }

    fn print_commit_hint(&mut self, status: &StatusInfo) -> anyhow::Result<()> {
        if !status.index_changeset().is_empty() {
            return Ok(());
        }

        if !status.workspace_changeset().is_empty() {
            writeln!(self.writer(), "no changes added to commit")?;
        } else if !status.untracked_files.is_empty() {
            writeln!(self.writer(), "nothing added to commit but untracked files present")?;
        } else {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
        }

        Ok(())
    }
}

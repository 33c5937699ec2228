use crate::areas::repository::Repository;
use crate::artifacts::diff::diff_algorithm::{DiffAlgorithm, Edit, Hunk, MyersDiff};
use crate::artifacts::diff::diff_target::{DiffTarget, FileDiff};
use crate::artifacts::diff::tree_diff::DiffFilter;
use colored::Colorize;
use derive_new::new;

/// What to compare and how to print it.
#[derive(Debug, Clone, Default, new)]
pub struct DiffOptions {
    /// Compare HEAD with the index instead of the index with the workspace
    pub cached: bool,
    /// Two revisions to compare instead of the index
    pub revisions: Option<(String, String)>,
    pub name_status: bool,
    /// Only report changes of these kinds; empty means all
    pub filter: DiffFilter,
}

impl Repository {
    pub fn diff(&mut self, options: &DiffOptions) -> anyhow::Result<()> {
        let mut diffs = match &options.revisions {
            Some((old, new)) => self.diff_revisions(old, new)?,
            None => self.diff_index(options.cached)?,
        };

        if !options.filter.is_empty() {
            diffs.retain(|diff| {
                DiffFilter::try_parse(&diff.status_char().to_string())
                    .is_some_and(|kind| options.filter.contains(kind))
            });
        }

        for diff in &diffs {
            if options.name_status {
                writeln!(self.writer(), "{}\t{}", diff.status_char(), diff.a.file.display())?;
            } else {
                self.print_diff(diff)?;
            }
        }

        Ok(())
    }

    fn diff_revisions(&self, old: &str, new: &str) -> anyhow::Result<Vec<FileDiff>> {
        let old_oid = self.resolve_revision(old)?;
        let new_oid = self.resolve_revision(new)?;

        let database = self.database();
        database
            .tree_diff(Some(&old_oid), Some(&new_oid))?
            .changes()
            .iter()
            .map(|(path, change)| {
                Ok(FileDiff::new(
                    DiffTarget::from_entry(path, change.old_entry(), database)?,
                    DiffTarget::from_entry(path, change.new_entry(), database)?,
                ))
            })
            .collect()
    }

    fn diff_index(&mut self, cached: bool) -> anyhow::Result<Vec<FileDiff>> {
        self.index_mut().load()?;
        let head = self.refs().read_head()?;
        let status = {
            let (status, index) = self.status_parts();
            status.initialize(index, head.as_ref())?
        };

        let mut diffs = Vec::new();
        for (path, change) in &status.changed_files {
            let diff = if cached {
                FileDiff::tree_to_index(
                    path,
                    change.index_change,
                    status.head_tree.get(path),
                    self.index(),
                    self.database(),
                )?
            } else {
                FileDiff::index_to_workspace(
                    path,
                    change.workspace_change,
                    status.file_stats.get(path),
                    self.index(),
                    self.database(),
                    self.workspace(),
                )?
            };
            diffs.extend(diff);
        }

        Ok(diffs)
    }

    fn print_diff(&mut self, diff: &FileDiff) -> anyhow::Result<()> {
        if diff.is_unchanged() {
            return Ok(());
        }

        let (a, b) = (&diff.a, &diff.b);
        self.print_meta(&format!(
            "diff --git a/{} b/{}",
            a.file.display(),
            b.file.display()
        ))?;
        self.print_diff_mode(a, b)?;
        self.print_diff_content(a, b)
    }

    fn print_meta(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", line.bold())?;
        Ok(())
    }

    fn print_diff_mode(&mut self, a: &DiffTarget, b: &DiffTarget) -> anyhow::Result<()> {
        if !a.exists() {
            self.print_meta(&format!("new file mode {}", b.pretty_mode()))?;
        } else if !b.exists() {
            self.print_meta(&format!("deleted file mode {}", a.pretty_mode()))?;
        } else if a.mode != b.mode {
            self.print_meta(&format!("old mode {}", a.pretty_mode()))?;
            self.print_meta(&format!("new mode {}", b.pretty_mode()))?;
        }

        Ok(())
    }

    fn print_diff_content(&mut self, a: &DiffTarget, b: &DiffTarget) -> anyhow::Result<()> {
        if a.oid == b.oid {
            return Ok(());
        }

        let mut oid_range = format!("index {}..{}", a.oid.to_short_oid(), b.oid.to_short_oid());
        if a.mode == b.mode {
            oid_range.push_str(&format!(" {}", a.pretty_mode()));
        }

        self.print_meta(&oid_range)?;
        self.print_meta(&format!("--- {}", a.diff_path("a")))?;
        self.print_meta(&format!("+++ {}", b.diff_path("b")))?;

        for hunk in MyersDiff::new(&a.data, &b.data).hunks() {
            self.print_diff_hunk(&hunk)?;
        }

        Ok(())
    }

    fn print_diff_hunk(&mut self, hunk: &Hunk<String>) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", hunk.header().cyan())?;

        for edit in hunk.edits() {
            let line = edit.to_string();
            match edit {
                Edit::Delete { .. } => writeln!(self.writer(), "{}", line.red())?,
                Edit::Insert { .. } => writeln!(self.writer(), "{}", line.green())?,
                Edit::Equal { .. } => writeln!(self.writer(), "{line}")?,
            }
        }

        Ok(())
    }
}

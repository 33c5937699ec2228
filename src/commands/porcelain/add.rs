use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use std::path::{Path, PathBuf};
use tracing::debug;

impl Repository {
    /// Stage files and directories. Paths that do not exist are skipped with a warning, and
    /// staged files under a given path that no longer exist on disk are unstaged.
    pub fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        self.index_mut().load_for_update()?;

        let result = self.stage_paths(paths);
        match result {
            Ok(()) => self.index_mut().write_updates(),
            Err(error) => {
                self.index_mut().release_lock()?;
                Err(error)
            }
        }
    }

    fn stage_paths(&mut self, paths: &[String]) -> anyhow::Result<()> {
        for path in paths {
            let relative = self.relative_path(Path::new(path));

            if self.workspace().stat_file(&relative)?.is_none() {
                if self.index().is_tracked(&relative) {
                    self.unstage_missing(&relative)?;
                } else {
                    debug!(path = %relative.display(), "skipping missing path");
                    eprintln!("warning: pathspec '{path}' did not match any files");
                }
                continue;
            }

            self.unstage_missing(&relative)?;
            for file in self.workspace().scan(Some(&relative))? {
                let blob = self.workspace().parse_blob(&file.name)?;
                let oid = self.database().store(&blob)?;
                self.index_mut().add(IndexEntry::new(file.name, oid, file.stat));
            }
        }

        Ok(())
    }

    fn unstage_missing(&mut self, path: &Path) -> anyhow::Result<()> {
        let search = if path.as_os_str().is_empty() { Path::new(".") } else { path };

        for staged in self.index().entries_under_path(search) {
            if self.workspace().stat_file(&staged)?.is_none() {
                self.index_mut().remove(&staged);
            }
        }

        Ok(())
    }

    /// A command-line path relative to the workspace root.
    pub(crate) fn relative_path(&self, path: &Path) -> PathBuf {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.path().join(path)
        };

        let relative = absolute
            .strip_prefix(self.path())
            .map(Path::to_path_buf)
            .unwrap_or(absolute);

        relative
            .components()
            .filter(|component| !matches!(component, std::path::Component::CurDir))
            .collect()
    }
}

use colored::{ColoredString, Colorize};

const LABEL_WIDTH: usize = 12;

/// Workspace file compared with its staged entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WorkspaceChangeType {
    #[default]
    None,
    Untracked,
    Modified,
    Deleted,
}

impl WorkspaceChangeType {
    pub fn short_code(&self) -> &'static str {
        match self {
            WorkspaceChangeType::None => " ",
            WorkspaceChangeType::Untracked => "??",
            WorkspaceChangeType::Modified => "M",
            WorkspaceChangeType::Deleted => "D",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            WorkspaceChangeType::None | WorkspaceChangeType::Untracked => "",
            WorkspaceChangeType::Modified => "modified:",
            WorkspaceChangeType::Deleted => "deleted:",
        }
    }
}

/// Staged entry compared with the HEAD tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum IndexChangeType {
    #[default]
    None,
    Added,
    Modified,
    Deleted,
}

impl IndexChangeType {
    pub fn short_code(&self) -> &'static str {
        match self {
            IndexChangeType::None => " ",
            IndexChangeType::Added => "A",
            IndexChangeType::Modified => "M",
            IndexChangeType::Deleted => "D",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IndexChangeType::None => "",
            IndexChangeType::Added => "new file:",
            IndexChangeType::Modified => "modified:",
            IndexChangeType::Deleted => "deleted:",
        }
    }
}

/// One side of a change, as listed in a long-format status section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileChangeType {
    Workspace(WorkspaceChangeType),
    Index(IndexChangeType),
}

impl std::fmt::Display for FileChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label: ColoredString = match self {
            FileChangeType::Workspace(change) => {
                format!("{:<width$}", change.label(), width = LABEL_WIDTH).red()
            }
            FileChangeType::Index(change) => {
                format!("{:<width$}", change.label(), width = LABEL_WIDTH).green()
            }
        };
        write!(f, "\t{label}")
    }
}

/// Both sides of a tracked path's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FileChange {
    pub index_change: IndexChangeType,
    pub workspace_change: WorkspaceChangeType,
}

impl std::fmt::Display for FileChange {
    /// Porcelain `XY` code: index column, then workspace column.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            self.index_change.short_code(),
            self.workspace_change.short_code()
        )
    }
}

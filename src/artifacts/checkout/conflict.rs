use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[derive(Debug)]
pub struct ConflictMessage {
    pub header: &'static str,
    pub footer: Option<&'static str>,
}

impl From<ConflictType> for ConflictMessage {
    fn from(value: ConflictType) -> Self {
        match value {
            ConflictType::StaleFile => Self {
                header: "Your local changes to the following files would be overwritten by checkout:",
                footer: Some("Please commit your changes or stash them before you switch branches."),
            },
            ConflictType::StaleDirectory => Self {
                header: "Updating the following directories would lose untracked files in them:",
                footer: None,
            },
            ConflictType::UntrackedOverwritten => Self {
                header: "The following untracked working tree files would be overwritten by checkout:",
                footer: Some("Please move or remove them before you switch branches."),
            },
            ConflictType::UntrackedRemoved => Self {
                header: "The following untracked working tree files would be removed by checkout:",
                footer: Some("Please move or remove them before you switch branches."),
            },
        }
    }
}

/// Why a checkout cannot touch a path without losing local work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConflictType {
    StaleFile,
    StaleDirectory,
    UntrackedOverwritten,
    UntrackedRemoved,
}

impl ConflictType {
    pub fn classify(
        stat: Option<&EntryMetadata>,
        entry: Option<&IndexEntry>,
        new_entry: Option<&DatabaseEntry>,
    ) -> ConflictType {
        if entry.is_some() {
            ConflictType::StaleFile
        } else if let Some(stat) = stat
            && stat.mode.is_tree()
        {
            ConflictType::StaleDirectory
        } else if new_entry.is_some() {
            ConflictType::UntrackedOverwritten
        } else {
            ConflictType::UntrackedRemoved
        }
    }
}

/// Every conflict found by one checkout, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    conflicts: BTreeMap<ConflictType, BTreeSet<PathBuf>>,
}

impl ConflictReport {
    pub fn record(&mut self, conflict_type: ConflictType, path: PathBuf) {
        self.conflicts.entry(conflict_type).or_default().insert(path);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.values().all(BTreeSet::is_empty)
    }

    pub fn paths(&self, conflict_type: ConflictType) -> impl Iterator<Item = &PathBuf> {
        self.conflicts.get(&conflict_type).into_iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.conflicts.values().map(BTreeSet::len).sum()
    }
}

impl std::fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let blocks = self
            .conflicts
            .iter()
            .filter(|(_, paths)| !paths.is_empty())
            .map(|(conflict_type, paths)| {
                let ConflictMessage { header, footer } = (*conflict_type).into();
                let mut block = format!("error: {header}\n");
                for path in paths {
                    block.push_str(&format!("\t{}\n", path.display()));
                }
                match footer {
                    Some(footer) => block.push_str(footer),
                    None => {
                        block.pop();
                    }
                }
                block
            })
            .collect::<Vec<_>>();

        write!(f, "{}\nAborting", blocks.join("\n"))
    }
}

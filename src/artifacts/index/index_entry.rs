//! Index entry representation
//!
//! Each entry in the index represents a staged file with:
//! - File path (workspace-relative, `/`-separated)
//! - Content hash (object ID)
//! - Stat snapshot (mode, size, timestamps, device/inode, owner)
//!
//! ## Entry Format
//!
//! Entries are stored in a binary format with 8-byte alignment. The stat snapshot lets
//! change detection skip reading content when nothing about the file moved.

use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use is_executable::IsExecutable;
use std::cmp::min;
use std::ffi::OsStr;
use std::fs::Metadata;
use std::io::{BufRead, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::prelude::MetadataExt;
use std::path::{Path, PathBuf};

/// Maximum path length recorded in the flags field
const MAX_PATH_SIZE: usize = 4095;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Minimum size of an index entry in bytes
pub const ENTRY_MIN_SIZE: usize = 64;

/// Staged file: path, blob id and the stat snapshot taken when it was staged.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    pub name: PathBuf,
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn basename(&self) -> anyhow::Result<&str> {
        self.name
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name {}", self.name.display()))
    }

    /// Ancestor directories of the entry, outermost first (`a/b/c` gives `a`, `a/b`).
    pub fn parent_dirs(&self) -> Vec<&Path> {
        parent_dirs(&self.name)
    }

    pub fn mode(&self) -> EntryMode {
        self.metadata.mode
    }

    pub fn stat_match(&self, other: &EntryMetadata) -> bool {
        self.metadata.size == other.size && self.metadata.mode == other.mode
    }

    pub fn times_match(&self, other: &EntryMetadata) -> bool {
        self.metadata.ctime == other.ctime
            && self.metadata.ctime_nsec == other.ctime_nsec
            && self.metadata.mtime == other.mtime
            && self.metadata.mtime_nsec == other.mtime_nsec
    }
}

pub fn parent_dirs(path: &Path) -> Vec<&Path> {
    let mut dirs = path
        .ancestors()
        .skip(1)
        .filter(|ancestor| !ancestor.as_os_str().is_empty())
        .collect::<Vec<_>>();
    dirs.reverse();
    dirs
}

/// Stat snapshot stored per index entry.
///
/// Fields are kept at the width they have on disk, so a snapshot read back from the index
/// compares equal to the one it was written from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: EntryMode,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let name = self.name.as_os_str().as_bytes();
        let flags = min(name.len(), MAX_PATH_SIZE) as u16;

        let mut entry_bytes = Vec::with_capacity(ENTRY_MIN_SIZE + name.len());
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.ctime)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.ctime_nsec)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.mtime)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.mtime_nsec)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.dev)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.ino)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.mode.as_u32())?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.uid)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.gid)?;
        entry_bytes.write_u32::<NetworkEndian>(self.metadata.size)?;
        self.oid.write_h40_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<NetworkEndian>(flags)?;
        entry_bytes.write_all(name)?;

        // at least one NUL, then pad to the block size
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }
}

impl Unpackable for IndexEntry {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut fields = [0u32; 10];
        for field in fields.iter_mut() {
            *field = reader
                .read_u32::<NetworkEndian>()
                .map_err(|_| RepositoryError::IndexTruncated)?;
        }
        let [ctime, ctime_nsec, mtime, mtime_nsec, dev, ino, mode, uid, gid, size] = fields;

        let oid = ObjectId::read_h40_from(&mut reader)?;
        let _flags = reader
            .read_u16::<NetworkEndian>()
            .map_err(|_| RepositoryError::IndexTruncated)?;

        let mut name = Vec::new();
        reader.read_until(0, &mut name)?;
        if name.pop() != Some(0) {
            anyhow::bail!("Missing null terminator in index entry name");
        }

        Ok(IndexEntry {
            name: PathBuf::from(OsStr::from_bytes(&name)),
            oid,
            metadata: EntryMetadata {
                ctime,
                ctime_nsec,
                mtime,
                mtime_nsec,
                dev,
                ino,
                mode: EntryMode::try_from(mode)?,
                uid,
                gid,
                size,
            },
        })
    }
}

/// Build a snapshot from the absolute path of a file and its metadata.
impl TryFrom<(&Path, Metadata)> for EntryMetadata {
    type Error = anyhow::Error;

    fn try_from((file_path, metadata): (&Path, Metadata)) -> Result<Self, Self::Error> {
        let mode = if metadata.is_dir() {
            EntryMode::Directory
        } else if file_path.is_executable() {
            EntryMode::File(FileMode::Executable)
        } else {
            EntryMode::File(FileMode::Regular)
        };

        Ok(Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode,
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
        })
    }
}

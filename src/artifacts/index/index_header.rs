use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::RepositoryError;
use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub signature: String,
    pub version: u32,
    pub entries_count: u32,
}

impl IndexHeader {
    pub fn for_entries(entries_count: u32) -> Self {
        IndexHeader::new(String::from(SIGNATURE), VERSION, entries_count)
    }

    /// Reject anything that is not a version 2 index.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.signature != SIGNATURE {
            return Err(RepositoryError::InvalidIndexSignature(self.signature.clone()).into());
        }
        if self.version != VERSION {
            return Err(RepositoryError::UnsupportedIndexVersion(self.version).into());
        }

        Ok(())
    }
}

impl Packable for IndexHeader {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.write_all(self.signature.as_bytes())?;
        bytes.write_u32::<NetworkEndian>(self.version)?;
        bytes.write_u32::<NetworkEndian>(self.entries_count)?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for IndexHeader {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut signature = [0u8; 4];
        reader
            .read_exact(&mut signature)
            .map_err(|_| RepositoryError::IndexTruncated)?;
        let version = reader
            .read_u32::<NetworkEndian>()
            .map_err(|_| RepositoryError::IndexTruncated)?;
        let entries_count = reader
            .read_u32::<NetworkEndian>()
            .map_err(|_| RepositoryError::IndexTruncated)?;

        Ok(IndexHeader {
            signature: String::from_utf8_lossy(&signature).into_owned(),
            version,
            entries_count,
        })
    }
}

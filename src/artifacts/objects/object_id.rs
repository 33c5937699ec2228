//! Object identifier (SHA-1 hash)
//!
//! - Full: 40 hex characters
//! - Short: first 7 characters
//!
//! Objects live at `objects/<first-2-chars>/<remaining-38-chars>`.

use crate::artifacts::objects::object::hash_bytes;
use crate::artifacts::objects::{MIN_PREFIX_LENGTH, OBJECT_ID_LENGTH, SHORT_OID_LENGTH};
use crate::errors::RepositoryError;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            anyhow::bail!("Invalid object ID length: {}", id.len());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("Invalid object ID characters: {id}");
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Id of an already-enveloped object.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(hash_bytes(bytes))
    }

    /// Whether `candidate` can be used to look objects up by abbreviation.
    pub fn is_prefix_candidate(candidate: &str) -> bool {
        (MIN_PREFIX_LENGTH..=OBJECT_ID_LENGTH).contains(&candidate.len())
            && candidate.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Write the id in packed form (20 bytes), as trees and the index store it.
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        let packed = (0..OBJECT_ID_LENGTH)
            .step_by(2)
            .map(|i| u8::from_str_radix(&self.0[i..i + 2], 16))
            .collect::<Result<Vec<u8>, _>>()?;
        writer.write_all(&packed)?;

        Ok(())
    }

    /// Read a packed id (20 bytes).
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut packed = [0u8; OBJECT_ID_LENGTH / 2];
        reader.read_exact(&mut packed).map_err(|_| {
            RepositoryError::MalformedObject("truncated object id".to_string())
        })?;

        Ok(Self(packed.iter().map(|byte| format!("{byte:02x}")).collect()))
    }

    /// `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    pub fn to_short_oid(&self) -> String {
        self.0[..SHORT_OID_LENGTH].to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

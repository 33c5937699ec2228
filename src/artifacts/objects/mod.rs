//! Object types and operations
//!
//! All content is stored as immutable objects identified by the SHA-1 hash of their bytes:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Directory listing (names, modes, and object IDs)
//! - **Commit**: Snapshot with metadata (author, message, parent commit, tree)
//!
//! All objects serialize to the same envelope: `<type> <size>\0<content>`

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of an abbreviated object ID
pub const SHORT_OID_LENGTH: usize = 7;

/// Shortest hex prefix accepted when looking objects up by abbreviation
pub const MIN_PREFIX_LENGTH: usize = 4;

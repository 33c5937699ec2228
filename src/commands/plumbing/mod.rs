//! Plumbing commands
//!
//! Direct access to the object database, for scripting and debugging:
//!
//! - `cat-file`: print an object
//! - `hash-object`: compute a blob id, optionally storing the blob
//! - `ls-tree`: list the blobs below a revision's tree

pub mod cat_file;
pub mod hash_object;
pub mod ls_tree;

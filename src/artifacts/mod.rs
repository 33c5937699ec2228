//! Data structures and algorithms over the repository areas
//!
//! - `branch`: branch names and revision expressions
//! - `checkout`: the checkout migration and its conflict report
//! - `core`: output plumbing shared by the binary
//! - `database`: tree entries as stored in the database
//! - `diff`: tree diffs, diff targets and Myers line diffs
//! - `index`: index entry encoding
//! - `objects`: blob, tree and commit objects
//! - `status`: HEAD/index/workspace comparison

pub mod branch;
pub mod checkout;
pub mod core;
pub mod database;
pub mod diff;
pub mod index;
pub mod objects;
pub mod status;

//! Command implementations, as `impl Repository` blocks
//!
//! - `plumbing`: object-level commands (cat-file, hash-object, ls-tree)
//! - `porcelain`: the everyday workflow (init, add, commit, status, diff, branch, checkout)
//!
//! Commands write their output to the repository's writer; diagnostics go to stderr.

pub mod plumbing;
pub mod porcelain;

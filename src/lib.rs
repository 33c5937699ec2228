//! kit: the core engine of a small content-addressed version-control tool.
//!
//! - `areas`: on-disk state (object database, index, refs, workspace, lockfiles)
//! - `artifacts`: data structures and algorithms operating on that state
//! - `commands`: porcelain and plumbing operations exposed by the binary
//! - `errors`: the typed error taxonomy surfaced through `anyhow`

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

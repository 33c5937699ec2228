//! Checkout engine
//!
//! [`migration::Migration`] turns a tree diff into a plan of file creations, updates and
//! deletions, checks every changed path against the index and the workspace, and only applies
//! the plan when no conflict was found. [`conflict::ConflictReport`] collects every conflict of
//! a failed check, grouped by kind.

pub mod conflict;
pub mod migration;

//! Tree and line diffs
//!
//! - `tree_diff`: which paths differ between two trees
//! - `diff_algorithm`: Myers edit scripts and unified-diff hunks
//! - `diff_target`: the blob on each side of a file diff

pub mod diff_algorithm;
pub mod diff_target;
pub mod tree_diff;

//! Porcelain commands
//!
//! The user-facing workflow, composed from the areas and artifacts:
//!
//! - `init`: create the metadata directory
//! - `add`: stage files
//! - `commit`: record the index as a commit
//! - `status`: compare HEAD, index and workspace
//! - `diff`: line diffs between workspace, index and commits
//! - `branch`: list or create branches
//! - `checkout`: move the workspace to another commit

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod init;
pub mod status;

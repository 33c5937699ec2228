//! On-disk repository state
//!
//! - `database`: content-addressed object store
//! - `index`: the staging area
//! - `lockfile`: exclusive-create locks guarding index and ref writes
//! - `refs`: HEAD and branches
//! - `repository`: ties the areas together for the commands
//! - `workspace`: the working directory

pub mod database;
pub mod index;
pub mod lockfile;
pub mod refs;
pub mod repository;
pub mod workspace;

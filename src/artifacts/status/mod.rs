//! HEAD / index / workspace comparison
//!
//! [`status_info::Status`] walks the workspace and the index once, classifying every path
//! with the [`inspector::Inspector`] into the codes of [`file_change`].

pub mod file_change;
pub mod inspector;
pub mod status_info;

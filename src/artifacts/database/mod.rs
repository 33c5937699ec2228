//! Entries as the object database records them: an object id and its mode.

pub mod database_entry;

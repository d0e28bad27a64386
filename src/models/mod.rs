//! Data models

pub mod entry;

pub use entry::*;

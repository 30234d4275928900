//! Backends module - File system operations
//!
//! Provides:
//! - collect: Ordered, filtered file collection with walkdir

pub mod collect;

//! Flows module - Operations combining collection and rendering
//!
//! Provides:
//! - bundle: Collect, render and write the source document

pub mod bundle;

//! Core module - Data structures and utilities shared by the bundle flow
//!
//! This module provides:
//! - Collection configuration and defaults
//! - Candidate and summary model
//! - Path normalization and anchor derivation
//! - File reading with UTF-8 strategies
//! - Markdown rendering
//! - Token counting for bundle statistics

pub mod config;
pub mod error;
pub mod file_reader;
pub mod model;
pub mod paths;
pub mod render;
pub mod tokenizer;

//! Typed failures that abort a bundle run

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("root is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("failed to write bundle to {path}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

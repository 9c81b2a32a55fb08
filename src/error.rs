//! Error types for h5lens.
//!
//! This module provides a unified error handling approach using `thiserror`.

use crate::slicing::SliceError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for h5lens operations.
pub type Result<T> = std::result::Result<T, LensError>;

/// Errors that can occur in h5lens.
#[derive(Debug, Error)]
pub enum LensError {
    /// Failed to open a file.
    #[error("Failed to open file {path}: {reason}")]
    FileOpen {
        /// Path that could not be opened.
        path: PathBuf,
        /// Library message.
        reason: String,
    },

    /// Failed to read from a NetCDF/HDF5 file.
    #[error("NetCDF error: {0}")]
    NetCDF(String),

    /// Node not found in the file hierarchy.
    #[error("Node not found: {path}")]
    NodeNotFound {
        /// Requested node path.
        path: String,
    },

    /// A data operation was requested on a group.
    #[error("Not a dataset: {path}")]
    NotADataset {
        /// Offending node path.
        path: String,
    },

    /// The dimension spec could not be applied to the array.
    #[error("Slice error: {0}")]
    Slice(#[from] SliceError),

    /// Settings could not be read or written.
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// Failed to access clipboard.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LensError {
    /// Create a FileOpen error.
    pub fn file_open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FileOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a NodeNotFound error.
    pub fn node_not_found(path: impl Into<String>) -> Self {
        Self::NodeNotFound { path: path.into() }
    }

    /// Create a NotADataset error.
    pub fn not_a_dataset(path: impl Into<String>) -> Self {
        Self::NotADataset { path: path.into() }
    }
}

impl From<netcdf::Error> for LensError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCDF(err.to_string())
    }
}

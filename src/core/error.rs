//! Conversion error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::notebook::NotebookError;

/// Result type for tree conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that abort a conversion run.
///
/// Every variant is fatal: the converter never retries and never skips a
/// notebook it failed on.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Reading, writing, creating or removing a path failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory walk failed (missing input root, unreadable directory).
    #[error("Failed to walk input tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// A notebook could not be parsed or serialized.
    #[error("Failed to convert {path}: {source}")]
    Notebook {
        path: PathBuf,
        #[source]
        source: NotebookError,
    },

    /// Clearing the output root would delete the input notebooks.
    #[error("Refusing to clear output directory {output}: it contains the input directory {input}")]
    UnsafeOutputRoot { output: PathBuf, input: PathBuf },
}

impl ConvertError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Wrap a codec error with the notebook it happened on.
    pub fn notebook(path: impl Into<PathBuf>, source: NotebookError) -> Self {
        Self::Notebook { path: path.into(), source }
    }
}

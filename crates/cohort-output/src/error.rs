//! Error types for output generation.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    /// The output directory (or a group subdirectory) could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or renaming an output file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `no_clobber` was requested and the directory already has entries.
    #[error("output directory {path} is not empty")]
    DirectoryNotEmpty { path: PathBuf },

    /// A table could not be serialized.
    #[error("failed to render {name}: {message}")]
    Render { name: String, message: String },
}

pub type Result<T> = std::result::Result<T, OutputError>;

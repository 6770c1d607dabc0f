//! Error types for the re-import run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Boxed error from a model container implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that end a re-import run.
///
/// Bone-name problems never show up here: every name tier falls back to
/// the next one and the last tier cannot fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Input path does not carry the model extension.
    #[error("file should have .g1m extension: {0}")]
    InvalidExtension(PathBuf),

    /// The container could not be loaded.
    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Neither the conventional nor the entered working directory exists.
    #[error("that directory doesn't exist: {0}")]
    DirectoryNotFound(PathBuf),

    /// No submesh slot had both a `.vb` and an `.ib` file.
    #[error(
        "there weren't any files to import in {0}; name the .vb/.ib files like 0.vb, 0.ib, 1.vb, 1.ib"
    )]
    NoMatchingFiles(PathBuf),

    /// The container rejected a submesh's buffers.
    #[error("import of submesh {index} failed: {source}")]
    SubmeshImport {
        index: usize,
        #[source]
        source: BoxError,
    },

    /// The container could not be written back.
    #[error("failed to save {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Reading the directory path from the operator failed.
    #[error("failed to read directory path: {0}")]
    Prompt(#[source] io::Error),
}

/// Result type for re-import operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for rotating writer operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for rotating writer operations.
pub type RotateResult<T> = Result<T, RotateError>;

/// Errors that can occur while writing through a [`crate::RotatingFileWriter`].
#[derive(Debug, Error)]
pub enum RotateError {
    /// An I/O error occurred on the open file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The target file could not be created or opened.
    #[error("cannot open {}: {source}", .path.display())]
    OpenFailed {
        /// The resolved path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A multi-step write failed after some bytes reached the file.
    #[error("write failed after {written} bytes: {source}")]
    PartialWrite {
        /// Bytes written before the failure.
        written: usize,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The writer has been closed.
    #[error("writer is closed")]
    Closed,
}

/// Reasons the on-disk scan behind filename resolution can fail.
///
/// The writer never surfaces these from a write; it logs a warning and falls
/// back to the template path. They are returned by [`crate::naming::resolve`].
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The glob pattern built from the template is invalid.
    #[error("invalid pattern {pattern:?}: {message}")]
    Pattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// Parser message.
        message: String,
    },

    /// A directory entry could not be read during the scan.
    #[error("cannot read {}: {source}", .path.display())]
    Glob {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The template or a matched path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

impl From<RotateError> for io::Error {
    fn from(err: RotateError) -> Self {
        match err {
            RotateError::Io(e) => e,
            other => {
                let kind = match &other {
                    RotateError::OpenFailed { source, .. }
                    | RotateError::PartialWrite { source, .. } => source.kind(),
                    RotateError::Closed => io::ErrorKind::BrokenPipe,
                    _ => io::ErrorKind::Other,
                };
                io::Error::new(kind, other)
            }
        }
    }
}

impl From<glob::GlobError> for ResolveError {
    fn from(err: glob::GlobError) -> Self {
        let path = err.path().to_path_buf();
        ResolveError::Glob {
            path,
            source: err.into_error(),
        }
    }
}

//! Error type shared by the walker, the planner and the copy orchestrator.
//!
//! Every variant is fatal to the run: a skipped file would leave a gap in
//! the ordinal sequence.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{op}: \"{}\" is not there", .path.display())]
    NotFound { op: String, path: PathBuf },

    #[error("{op}: access denied to \"{}\"", .path.display())]
    AccessDenied {
        op: String,
        path: PathBuf,
        source: io::Error,
    },

    #[error("{op} failed for \"{}\": {source}", .path.display())]
    Io {
        op: String,
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to write tags to \"{}\": {reason}", .path.display())]
    TagWrite { path: PathBuf, reason: String },

    #[error(
        "\"{}\" and \"{}\" both map to \"{}\"",
        .first.display(),
        .second.display(),
        .destination.display()
    )]
    NameConflict {
        destination: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("destination \"{}\" already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error(
        "destination \"{}\" is inside source \"{}\"",
        .destination.display(),
        .source_root.display()
    )]
    DestinationInsideSource {
        destination: PathBuf,
        source_root: PathBuf,
    },

    #[error(
        "destination \"{}\" contains source \"{}\"",
        .destination.display(),
        .source_root.display()
    )]
    DestinationContainsSource {
        destination: PathBuf,
        source_root: PathBuf,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

impl Error {
    /// Classify an I/O failure of `op` on `path`.
    pub fn io(op: impl Into<String>, path: impl Into<PathBuf>, source: io::Error) -> Self {
        let op = op.into();
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Error::NotFound { op, path },
            io::ErrorKind::PermissionDenied => Error::AccessDenied { op, path, source },
            _ => Error::Io { op, path, source },
        }
    }

    pub fn tag_write(path: &Path, reason: impl fmt::Display) -> Self {
        Error::TagWrite {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Map a directory-walk failure, falling back to `root` when walkdir
    /// cannot tell which entry failed.
    pub fn walk(err: walkdir::Error, root: &Path) -> Self {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        match err.into_io_error() {
            Some(source) => Error::io("read directory", path, source),
            None => Error::Io {
                op: "read directory".to_string(),
                path,
                source: io::Error::other("filesystem loop detected"),
            },
        }
    }
}

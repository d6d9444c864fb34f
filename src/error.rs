use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Everything that stops a report from being produced.
///
/// Short lines are not errors, they are skipped while reading.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{usage}")]
    Usage { usage: String },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: invalid integer value {token:?}", path.display())]
    InvalidValue {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("{}:{line}: size of {key:?} overflows", path.display())]
    Overflow {
        path: PathBuf,
        line: usize,
        key: String,
    },

    #[error("cannot write report: {0}")]
    Write(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Failure inside a single line, before the file and line number are known.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LineError {
    InvalidValue(String),
    Overflow(String),
}

impl LineError {
    pub(crate) fn at(self, path: &Path, line: usize) -> ReportError {
        let path = path.to_path_buf();
        match self {
            LineError::InvalidValue(token) => ReportError::InvalidValue { path, line, token },
            LineError::Overflow(key) => ReportError::Overflow { path, line, key },
        }
    }
}

use std::fmt;
use std::io::Error as IoError;

use derive_setters::Setters;
use polars::error::PolarsError;

use crate::box_model::BoxModel;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(IoError),
    Polars(PolarsError),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
    InvalidTemplate(String),
    UnknownStyle(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "i/o error: {e}"),
            Error::Polars(e) => write!(f, "failed to read table: {e}"),
            Error::LoadingFailed(msg) => write!(f, "loading failed: {msg}"),
            Error::FileNotFound => write!(f, "file not found"),
            Error::PermissionDenied => write!(f, "permission denied"),
            Error::UnknownFileType => write!(f, "unknown file type"),
            Error::InvalidTemplate(line) => {
                write!(f, "template line {line:?} must hold exactly 4 glyphs")
            }
            Error::UnknownStyle(name) => write!(f, "unknown box style {name:?}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Polars(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IoError> for Error {
    fn from(err: IoError) -> Self {
        Error::Io(err)
    }
}

impl From<PolarsError> for Error {
    fn from(err: PolarsError) -> Self {
        Error::Polars(err)
    }
}

/// Layout switches for a single table render.
#[derive(Debug, Clone, Copy, Default, Setters)]
pub struct TableOptions {
    pub box_model: BoxModel,
    /// Style the first row as a header.
    pub has_header: bool,
    /// Draw a separator line between consecutive body rows.
    pub separators: bool,
}

//! Errors raised while loading post content

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for loader operations
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Everything that can stop the post loader.
///
/// Each variant names the file (or directory) at fault so a failed build
/// points straight at the post that needs fixing.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Directory or file could not be read
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file has no metadata block at all
    #[error("{path:?} has no front-matter block")]
    MissingFrontMatter { path: PathBuf },

    /// The metadata block exists but could not be parsed
    #[error("invalid front-matter in {path:?}: {message}")]
    InvalidFrontMatter { path: PathBuf, message: String },

    /// A required field is absent or blank
    #[error("{path:?} is missing required field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },

    /// The `date` field is not a calendar date
    #[error("{path:?} has an invalid date {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { path: PathBuf, value: String },

    /// Two files map to the same post id
    #[error("duplicate post id `{id}`: {first:?} and {second:?}")]
    DuplicateId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// No post with the requested id
    #[error("no post with id `{id}` in {dir:?}")]
    NotFound { id: String, dir: PathBuf },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_front_matter(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::InvalidFrontMatter {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

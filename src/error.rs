//! Defines the `Error` and `Result` types used by this crate.

use crate::parser::{describe_rule, Rule};
use std::fmt::Display;
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error returned by all fallible operations within this crate.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// Represents a HCL syntax error. The message includes the location of the error.
    #[error("syntax error:\n{0}")]
    Syntax(String),

    /// Represents an attribute which is defined more than once within the same body.
    #[error("attribute `{name}` is defined more than once")]
    DuplicateAttribute {
        /// The attribute name.
        name: String,
    },

    /// Represents a block which collides with an attribute or with blocks of a different label
    /// depth at the same path.
    #[error("unable to convert block `{path}` to JSON: conflicting definitions")]
    BlockConflict {
        /// The block identifier followed by its labels, joined by dots.
        path: String,
    },

    /// Represents input that is not valid UTF-8.
    #[error("input is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Error emitted by serde_json.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Represents generic IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Represents an output file which already exists and must not be overwritten.
    #[error("output file `{path}` exists, pass --overwrite to overwrite it")]
    SinkExists {
        /// The path of the output file.
        path: String,
    },

    /// Represents an output path which exists but is not a regular file.
    #[error("output file `{path}` exists but is not a file")]
    SinkNotAFile {
        /// The path of the output file.
        path: String,
    },

    /// Represents an invalid glob pattern.
    #[error("invalid glob pattern `{pattern}`")]
    GlobPattern {
        /// The pattern that caused the error.
        pattern: String,
        /// The underlying error.
        source: glob::PatternError,
    },

    /// Represents an error while walking the paths matched by a glob pattern.
    #[error(transparent)]
    Glob(#[from] glob::GlobError),
}

impl Error {
    pub(crate) fn syntax(err: pest::error::Error<Rule>, filename: &str) -> Self {
        let err = err.renamed_rules(describe_rule);

        let err = if filename.is_empty() {
            err
        } else {
            err.with_path(filename)
        };

        Self::Syntax(err.to_string())
    }

    pub(crate) fn glob_pattern<T>(pattern: T, source: glob::PatternError) -> Self
    where
        T: Display,
    {
        Self::GlobPattern {
            pattern: pattern.to_string(),
            source,
        }
    }
}

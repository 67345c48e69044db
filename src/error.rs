use crate::report::Field;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the trim-reports library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// No report files were given and none were found by the fallback search.
    #[error("No trimming report files were specified or found in '{search_dir}'")]
    NoReports {
        /// Directory that was searched
        search_dir: PathBuf,
    },

    /// A recognised line carried a value of the wrong shape.
    #[error("Malformed value for '{field}' in '{path}': {value:?}")]
    ParseShape {
        /// Report file containing the line
        path: PathBuf,
        /// Field the line maps to
        field: Field,
        /// The offending value text
        value: String,
    },

    /// A percentage was requested before its denominator was seen.
    #[error("Cannot compute '{field}' in '{path}': '{requires}' was not found earlier in the report")]
    MissingDependency {
        /// Report file being parsed
        path: PathBuf,
        /// Derived field that could not be computed
        field: Field,
        /// The denominator field that is absent
        requires: Field,
    },

    /// A percentage denominator was present but zero.
    #[error("Cannot compute '{field}' in '{path}': '{requires}' is zero")]
    ZeroDenominator {
        /// Report file being parsed
        path: PathBuf,
        /// Derived field that could not be computed
        field: Field,
        /// The denominator field that is zero
        requires: Field,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// CSV serialization error.
    #[error("Failed to write table '{path}': {message}")]
    Csv {
        /// Output table path
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Multiple errors occurred during processing.
    #[error("Multiple errors occurred during processing ({count} errors)")]
    Multiple {
        /// Number of errors
        count: usize,
        /// Collection of errors
        errors: Vec<Error>,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a no reports error.
    #[must_use]
    pub fn no_reports(search_dir: impl Into<PathBuf>) -> Self {
        Self::NoReports {
            search_dir: search_dir.into(),
        }
    }

    /// Creates a malformed value error.
    #[must_use]
    pub fn parse_shape(path: impl Into<PathBuf>, field: Field, value: impl Into<String>) -> Self {
        Self::ParseShape {
            path: path.into(),
            field,
            value: value.into(),
        }
    }

    /// Creates a CSV error with path context.
    #[must_use]
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Combines multiple errors into a single error.
    #[must_use]
    pub fn multiple(errors: Vec<Self>) -> Self {
        let count = errors.len();
        Self::Multiple { count, errors }
    }

    /// Returns true if no input files could be resolved.
    #[must_use]
    pub const fn is_no_reports(&self) -> bool {
        matches!(self, Self::NoReports { .. })
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns the report file this error is about, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. }
            | Self::ParseShape { path, .. }
            | Self::MissingDependency { path, .. }
            | Self::ZeroDenominator { path, .. }
            | Self::Csv { path, .. } => Some(path),
            Self::NoReports { .. } | Self::Config { .. } | Self::Multiple { .. } => None,
        }
    }
}

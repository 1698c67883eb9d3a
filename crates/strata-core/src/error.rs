//! Error types for analysis runs and per-file extraction.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::model::ExtractionWarning;

/// Errors that end an analysis run before it starts.
///
/// Nothing raised during extraction of an individual file ends up here;
/// those failures become [`crate::model::ExtractionWarning`]s.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The repository root does not exist.
    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The repository root is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// IO error outside of per-file extraction.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AnalysisError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures confined to a single file.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file exceeds the configured size limit.
    #[error("Skipped {path}: {size} bytes exceeds limit of {limit}")]
    TooLarge { path: String, size: u64, limit: u64 },

    /// A specification document could not be parsed.
    #[error("Malformed API specification {path}: {message}")]
    Specification { path: String, message: String },

    /// A manifest could not be parsed.
    #[error("Malformed manifest {path}: {message}")]
    Manifest { path: String, message: String },
}

impl ExtractError {
    /// Repository-relative path of the file that failed.
    pub fn path(&self) -> &str {
        match self {
            ExtractError::Read { path, .. }
            | ExtractError::TooLarge { path, .. }
            | ExtractError::Specification { path, .. }
            | ExtractError::Manifest { path, .. } => path,
        }
    }

    /// Convert into the warning record kept on the model.
    pub fn into_warning(self) -> ExtractionWarning {
        ExtractionWarning::new(self.path().to_string(), self.to_string())
    }
}

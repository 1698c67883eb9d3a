mod error;
mod file;

pub use error::StorageError;
pub use file::FileStore;

use std::path::PathBuf;

use crate::config::{API_ANALYSIS_FILE, CODE_ANALYSIS_FILE, DATABASE_ANALYSIS_FILE};
use crate::report::{ApiAnalysis, CodeAnalysis, DatabaseAnalysis};

/// Trait for artifact storage backends.
///
/// JSON artifacts are written by one run and may be loaded back by a later
/// one, e.g. when stitching the requirements document.
pub trait ArtifactStore {
    /// Serializes a value under the given artifact name.
    fn save_json<T: serde::Serialize>(&self, name: &str, value: &T) -> Result<PathBuf, StorageError>;

    /// Writes a Markdown document under the given artifact name.
    fn save_markdown(&self, name: &str, markdown: &str) -> Result<PathBuf, StorageError>;

    /// Loads a JSON artifact, `None` when it was never written.
    fn load_json<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StorageError>;

    fn load_code_analysis(&self) -> Result<Option<CodeAnalysis>, StorageError> {
        self.load_json(CODE_ANALYSIS_FILE)
    }

    fn load_database_analysis(&self) -> Result<Option<DatabaseAnalysis>, StorageError> {
        self.load_json(DATABASE_ANALYSIS_FILE)
    }

    fn load_api_analysis(&self) -> Result<Option<ApiAnalysis>, StorageError> {
        self.load_json(API_ANALYSIS_FILE)
    }
}

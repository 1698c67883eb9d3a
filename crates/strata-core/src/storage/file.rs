use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;

use super::error::StorageError;
use super::ArtifactStore;

/// File-based artifact store.
///
/// Every artifact is a flat file in the output directory:
/// ```text
/// srs_analysis/
///   code_analysis.json
///   code_structure_analysis.md
///   database_analysis.json
///   data_dictionary.md
///   erd.md
///   api_analysis.json
///   api_documentation.md
///   requirements.md
/// ```
pub struct FileStore {
    dir: PathBuf,
    pretty_json: bool,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pretty_json: true,
        }
    }

    /// Creates a store from the `[output]` config section.
    pub fn with_config(config: &OutputConfig) -> Self {
        Self {
            dir: config.dir_path(),
            pretty_json: config.pretty_json,
        }
    }

    /// Overrides the output directory, keeping the other settings.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;
        }
        Ok(())
    }

    fn write(&self, name: &str, contents: &str) -> Result<PathBuf, StorageError> {
        self.ensure_dir()?;
        let path = self.dir.join(name);
        fs::write(&path, contents).map_err(|e| StorageError::io(&path, e))?;
        tracing::debug!("Wrote {}", path.display());
        Ok(path)
    }
}

impl ArtifactStore for FileStore {
    fn save_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf, StorageError> {
        let json = if self.pretty_json {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        self.write(name, &json)
    }

    fn save_markdown(&self, name: &str, markdown: &str) -> Result<PathBuf, StorageError> {
        self.write(name, markdown)
    }

    fn load_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StorageError> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
        let value = serde_json::from_str(&json)?;

        Ok(Some(value))
    }
}

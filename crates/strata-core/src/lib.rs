//! Strata core: heuristic structure recovery for unbuilt repositories.
//!
//! The [`Analyzer`] classifies a repository, walks its files, runs the
//! per-language pattern sets over each one and merges the results into a
//! [`RepositoryModel`]. Reports and the technology advisor read that model.

pub mod advisor;
pub mod aggregate;
pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod model;
pub mod patterns;
pub mod report;
pub mod storage;
pub mod walker;

pub use advisor::{recommend, ProjectRequirements, Recommendation};
pub use aggregate::RepositoryModel;
pub use analyzer::Analyzer;
pub use config::Config;
pub use error::{AnalysisError, ExtractError};
pub use model::{ExtractionWarning, Language, RepositoryProfile};
pub use report::{ApiAnalysis, CodeAnalysis, DatabaseAnalysis, RequirementsDoc};
pub use storage::{ArtifactStore, FileStore, StorageError};

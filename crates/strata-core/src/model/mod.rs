//! Structural records produced by extraction.
//!
//! Every record carries the repository-relative path of the file it came
//! from and, where one exists, a 1-based line number.

mod api;
mod code;
mod profile;
mod schema;

pub use api::{ApiEndpoint, EndpointSource, ExternalApi, HttpMethod};
pub use code::{BusinessRuleCandidate, ClassKind, ClassLike, Function, Module, RuleCategory};
pub use profile::{
    ArchitectureStyle, Confidence, Framework, Language, License, LicenseKind, RepositoryProfile,
};
pub use schema::{Column, Relationship, Table, TableSource};

use serde::{Deserialize, Serialize};

/// A recovered per-file failure, kept on the model instead of being raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionWarning {
    pub path: String,
    pub message: String,
}

impl ExtractionWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

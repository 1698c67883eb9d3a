//! Structural extractor: one candidate file in, structural records out.
//!
//! Each file is handled independently. Failures are turned into
//! [`ExtractionWarning`]s on the returned [`FileExtraction`] and never
//! abort the run.

mod code;
mod external;
mod openapi;
mod orm;
mod prisma;
mod routes;
mod rules;
mod sql;
pub mod text;

pub use code::CodeExtractor;
pub use external::{parse_base_url, ExternalExtractor};
pub use openapi::parse_specification;
pub use orm::{pluralize, snake_case, OrmExtractor, OrmModels};
pub use prisma::PrismaExtractor;
pub use routes::{is_plausible_api_path, RouteExtractor};
pub use rules::RuleExtractor;
pub use sql::SqlExtractor;

use sha2::{Digest, Sha256};
use std::panic::{self, AssertUnwindSafe};

use crate::config::Config;
use crate::error::ExtractError;
use crate::model::{
    ApiEndpoint, BusinessRuleCandidate, ExternalApi, ExtractionWarning, Language, Module,
    Relationship, Table,
};
use crate::patterns::PatternFamily;
use crate::walker::{CandidateFile, FileKind};

/// Everything recovered from one file.
#[derive(Debug, Default)]
pub struct FileExtraction {
    /// Present for source files only.
    pub module: Option<Module>,
    pub endpoints: Vec<ApiEndpoint>,
    pub external_apis: Vec<ExternalApi>,
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
    pub rules: Vec<BusinessRuleCandidate>,
    pub warnings: Vec<ExtractionWarning>,
}

impl FileExtraction {
    fn warning(warning: ExtractionWarning) -> Self {
        Self {
            warnings: vec![warning],
            ..Self::default()
        }
    }
}

/// Per-run extractor holding every compiled pattern set.
pub struct Extractor {
    max_file_size: u64,
    code: CodeExtractor,
    routes: RouteExtractor,
    external: ExternalExtractor,
    orm: OrmExtractor,
    rules: Option<RuleExtractor>,
    sql: SqlExtractor,
    prisma: PrismaExtractor,
}

impl Extractor {
    pub fn new(language: Language, config: &Config) -> Self {
        Self {
            max_file_size: config.walk.max_file_size,
            code: CodeExtractor::new(PatternFamily::for_language(language)),
            routes: RouteExtractor::new(language),
            external: ExternalExtractor::new(),
            orm: OrmExtractor::new(language),
            rules: config
                .extract
                .business_rules
                .then(|| RuleExtractor::new(&config.extract)),
            sql: SqlExtractor::new(),
            prisma: PrismaExtractor::new(),
        }
    }

    /// Read and extract one candidate file.
    pub fn extract_file(&self, file: &CandidateFile) -> FileExtraction {
        if let Ok(meta) = std::fs::metadata(&file.path) {
            if meta.len() > self.max_file_size {
                let err = ExtractError::TooLarge {
                    path: file.rel.clone(),
                    size: meta.len(),
                    limit: self.max_file_size,
                };
                tracing::warn!("{}", err);
                return FileExtraction::warning(err.into_warning());
            }
        }

        let bytes = match std::fs::read(&file.path) {
            Ok(bytes) => bytes,
            Err(source) => {
                let err = ExtractError::Read {
                    path: file.rel.clone(),
                    source,
                };
                tracing::warn!("{}", err);
                return FileExtraction::warning(err.into_warning());
            }
        };
        let content = String::from_utf8_lossy(&bytes);

        match panic::catch_unwind(AssertUnwindSafe(|| {
            self.extract_text(&file.rel, file.kind, &content)
        })) {
            Ok(extraction) => extraction,
            Err(_) => {
                tracing::error!("Extraction panicked on {}", file.rel);
                FileExtraction::warning(ExtractionWarning::new(
                    file.rel.clone(),
                    "Extraction aborted on unexpected input",
                ))
            }
        }
    }

    /// Extract from already-decoded content.
    pub fn extract_text(&self, rel: &str, kind: FileKind, content: &str) -> FileExtraction {
        let mut out = FileExtraction::default();

        match kind {
            FileKind::Source => {
                let hash = hex::encode(Sha256::digest(content.as_bytes()));
                out.module = Some(self.code.extract(rel, content, hash));
                out.endpoints = self.routes.extract(rel, content);
                out.external_apis = self.external.extract(rel, content);

                let models = self.orm.extract(rel, content);
                out.tables = models.tables;
                out.relationships = models.relationships;

                if let Some(rules) = &self.rules {
                    out.rules = rules.extract(rel, content);
                }
            }
            FileKind::Sql => {
                out.tables = self.sql.extract(rel, content);
            }
            FileKind::Prisma => {
                let (tables, relationships) = self.prisma.extract(rel, content);
                out.tables = tables;
                out.relationships = relationships;
            }
            FileKind::OpenApi => match parse_specification(rel, content) {
                Ok(endpoints) => out.endpoints = endpoints,
                Err(err) => {
                    tracing::warn!("{}", err);
                    out.warnings.push(err.into_warning());
                }
            },
        }

        tracing::debug!(
            "{}: {} endpoints, {} tables, {} rules",
            rel,
            out.endpoints.len(),
            out.tables.len(),
            out.rules.len()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn extractor(language: Language) -> Extractor {
        Extractor::new(language, &Config::default())
    }

    #[test]
    fn test_source_file_records() {
        let code = r#"const express = require('express');
const router = express.Router();

router.get('/api/users', listUsers);

async function listUsers(req, res) {
  const r = await fetch('https://api.github.com/users');
  if (req.query.limit > 100) { return res.status(400).end(); }
}
"#;
        let out = extractor(Language::JavaScript).extract_text("src/users.js", FileKind::Source, code);
        let module = out.module.unwrap();
        assert_eq!(module.path, "src/users.js");
        assert_eq!(module.hash.len(), 64);
        assert!(module.functions.iter().any(|f| f.name == "listUsers"));
        assert!(out.endpoints.iter().any(|e| e.path == "/api/users"));
        assert_eq!(out.external_apis.len(), 1);
        assert!(!out.rules.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_rules_can_be_disabled() {
        let mut config = Config::default();
        config.extract.business_rules = false;
        let out = Extractor::new(Language::Python, &config).extract_text(
            "calc.py",
            FileKind::Source,
            "total = price * 2\n",
        );
        assert!(out.rules.is_empty());
    }

    #[test]
    fn test_malformed_specification_becomes_warning() {
        let out = extractor(Language::Unknown).extract_text("openapi.json", FileKind::OpenApi, "{");
        assert!(out.endpoints.is_empty());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].path, "openapi.json");
    }

    #[test]
    fn test_oversized_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("big.py");
        fs::write(&path, "x = 1\n".repeat(100)).unwrap();

        let mut config = Config::default();
        config.walk.max_file_size = 10;
        let out = Extractor::new(Language::Python, &config).extract_file(&CandidateFile {
            path,
            rel: "big.py".to_string(),
            kind: FileKind::Source,
        });
        assert!(out.module.is_none());
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].message.contains("exceeds limit"));
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("latin1.py");
        fs::write(&path, b"def caf\xe9():\n    pass\n").unwrap();

        let out = extractor(Language::Python).extract_file(&CandidateFile {
            path,
            rel: "latin1.py".to_string(),
            kind: FileKind::Source,
        });
        assert!(out.module.is_some());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_missing_file_becomes_warning() {
        let temp = TempDir::new().unwrap();
        let out = extractor(Language::Go).extract_file(&CandidateFile {
            path: temp.path().join("gone.go"),
            rel: "gone.go".to_string(),
            kind: FileKind::Source,
        });
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].message.starts_with("Failed to read gone.go"));
    }
}

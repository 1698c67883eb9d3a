//! Aggregator: merges per-file extractions into one repository model.
//!
//! Files are merged in walk order, which is sorted, so every "first seen"
//! rule below is deterministic across runs.

mod dependencies;

pub use dependencies::{import_matches, normalize_import, resolve_dependencies};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::extractor::FileExtraction;
use crate::model::{
    ApiEndpoint, BusinessRuleCandidate, ExternalApi, ExtractionWarning, HttpMethod,
    Module, Relationship, RepositoryProfile, Table,
};

/// Whole-repository structural model. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryModel {
    pub profile: RepositoryProfile,

    /// Modules keyed by repository-relative path.
    pub modules: BTreeMap<String, Module>,

    /// Deduplicated endpoints in first-seen order.
    pub endpoints: Vec<ApiEndpoint>,

    /// One record per remote host, first-seen order.
    pub external_apis: Vec<ExternalApi>,

    /// Tables keyed by name.
    pub tables: BTreeMap<String, Table>,

    pub relationships: Vec<Relationship>,

    pub business_rules: Vec<BusinessRuleCandidate>,

    pub warnings: Vec<ExtractionWarning>,

    /// Set when the analysis deadline stopped extraction early.
    pub truncated: bool,
}

impl RepositoryModel {
    /// Endpoints bucketed by first non-empty path segment.
    pub fn endpoint_groups(&self) -> BTreeMap<String, Vec<&ApiEndpoint>> {
        group_endpoints(&self.endpoints)
    }

    pub fn function_count(&self) -> usize {
        self.modules.values().map(|m| m.functions.len()).sum()
    }

    pub fn class_count(&self) -> usize {
        self.modules.values().map(|m| m.classes.len()).sum()
    }
}

/// Bucket endpoints by first non-empty path segment, keeping their order
/// within each bucket.
pub fn group_endpoints<'a>(
    endpoints: impl IntoIterator<Item = &'a ApiEndpoint>,
) -> BTreeMap<String, Vec<&'a ApiEndpoint>> {
    let mut groups: BTreeMap<String, Vec<&ApiEndpoint>> = BTreeMap::new();
    for endpoint in endpoints {
        groups.entry(endpoint.group()).or_default().push(endpoint);
    }
    groups
}

/// Single-writer merge of per-file results.
pub struct Aggregator {
    profile: RepositoryProfile,
    modules: BTreeMap<String, Module>,
    endpoints: Vec<ApiEndpoint>,
    endpoint_index: HashMap<(HttpMethod, String), usize>,
    external_apis: Vec<ExternalApi>,
    tables: BTreeMap<String, Table>,
    relationships: Vec<Relationship>,
    business_rules: Vec<BusinessRuleCandidate>,
    warnings: Vec<ExtractionWarning>,
    truncated: bool,
}

impl Aggregator {
    pub fn new(profile: RepositoryProfile) -> Self {
        Self {
            profile,
            modules: BTreeMap::new(),
            endpoints: Vec::new(),
            endpoint_index: HashMap::new(),
            external_apis: Vec::new(),
            tables: BTreeMap::new(),
            relationships: Vec::new(),
            business_rules: Vec::new(),
            warnings: Vec::new(),
            truncated: false,
        }
    }

    /// Merge one file's records.
    pub fn add(&mut self, extraction: FileExtraction) {
        if let Some(module) = extraction.module {
            // Re-scanning a path replaces its record.
            self.modules.insert(module.path.clone(), module);
        }

        for endpoint in extraction.endpoints {
            self.add_endpoint(endpoint);
        }

        for api in extraction.external_apis {
            if !self.external_apis.iter().any(|a| a.host == api.host) {
                self.external_apis.push(api);
            }
        }

        for table in extraction.tables {
            self.add_table(table);
        }

        self.relationships.extend(extraction.relationships);
        self.business_rules.extend(extraction.rules);
        self.warnings.extend(extraction.warnings);
    }

    pub fn add_warnings(&mut self, warnings: impl IntoIterator<Item = ExtractionWarning>) {
        self.warnings.extend(warnings);
    }

    pub fn mark_truncated(&mut self) {
        self.truncated = true;
    }

    /// Same method and verbatim path collapse into the first record seen.
    fn add_endpoint(&mut self, endpoint: ApiEndpoint) {
        let key = (endpoint.method, endpoint.path.clone());
        match self.endpoint_index.get(&key) {
            Some(&idx) => self.endpoints[idx].absorb(endpoint),
            None => {
                self.endpoint_index.insert(key, self.endpoints.len());
                self.endpoints.push(endpoint);
            }
        }
    }

    /// A definition of lower rank never replaces a higher one; otherwise
    /// the later definition wins.
    fn add_table(&mut self, table: Table) {
        if let Some(existing) = self.tables.get(&table.name) {
            if existing.source.rank() > table.source.rank() {
                tracing::debug!(
                    "Keeping {} from {} over {}",
                    existing.name,
                    existing.module,
                    table.module
                );
                return;
            }
        }
        self.tables.insert(table.name.clone(), table);
    }

    /// Resolve module dependencies and produce the final model.
    pub fn finish(mut self) -> RepositoryModel {
        resolve_dependencies(&mut self.modules);

        tracing::info!(
            "Aggregated {} modules, {} endpoints, {} tables, {} rule candidates",
            self.modules.len(),
            self.endpoints.len(),
            self.tables.len(),
            self.business_rules.len()
        );

        RepositoryModel {
            profile: self.profile,
            modules: self.modules,
            endpoints: self.endpoints,
            external_apis: self.external_apis,
            tables: self.tables,
            relationships: self.relationships,
            business_rules: self.business_rules,
            warnings: self.warnings,
            truncated: self.truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArchitectureStyle, Language, TableSource};
    use std::collections::BTreeSet;

    fn profile() -> RepositoryProfile {
        RepositoryProfile {
            name: "demo".to_string(),
            language: Language::Python,
            frameworks: BTreeSet::new(),
            architecture: ArchitectureStyle::Unknown,
            license: None,
        }
    }

    fn with_endpoints(endpoints: Vec<ApiEndpoint>) -> FileExtraction {
        FileExtraction {
            endpoints,
            ..FileExtraction::default()
        }
    }

    #[test]
    fn test_endpoints_deduplicate_across_files() {
        let mut aggregator = Aggregator::new(profile());

        let mut express = ApiEndpoint::from_code(HttpMethod::Get, "/users", "a.js", 4);
        express.framework = Some("Express/Koa".to_string());
        aggregator.add(with_endpoints(vec![express]));

        let mut flask = ApiEndpoint::from_code(HttpMethod::Get, "/users", "b.py", 9);
        flask.description = Some("List users".to_string());
        aggregator.add(with_endpoints(vec![
            flask,
            ApiEndpoint::from_code(HttpMethod::Post, "/users", "b.py", 12),
        ]));

        let model = aggregator.finish();
        assert_eq!(model.endpoints.len(), 2);
        let get = &model.endpoints[0];
        assert_eq!(get.module, "a.js");
        assert_eq!(get.framework.as_deref(), Some("Express/Koa"));
        assert_eq!(get.description.as_deref(), Some("List users"));
    }

    #[test]
    fn test_table_rank_rule() {
        let mut aggregator = Aggregator::new(profile());
        let sql = Table::new("users", TableSource::Sql, "schema.sql", 1);
        let orm = Table::new("users", TableSource::Orm("Django".to_string()), "models.py", 3);
        let later_sql = Table::new("users", TableSource::Sql, "migrations/002.sql", 1);

        aggregator.add(FileExtraction {
            tables: vec![sql],
            ..FileExtraction::default()
        });
        aggregator.add(FileExtraction {
            tables: vec![orm],
            ..FileExtraction::default()
        });
        assert_eq!(aggregator.tables["users"].module, "schema.sql");

        aggregator.add(FileExtraction {
            tables: vec![later_sql],
            ..FileExtraction::default()
        });
        assert_eq!(aggregator.tables["users"].module, "migrations/002.sql");
    }

    #[test]
    fn test_external_apis_keep_first_host() {
        let api = |module: &str| ExternalApi {
            host: "api.stripe.com".to_string(),
            base_url: "https://api.stripe.com".to_string(),
            method: None,
            module: module.to_string(),
            line: 1,
        };
        let mut aggregator = Aggregator::new(profile());
        aggregator.add(FileExtraction {
            external_apis: vec![api("a.py")],
            ..FileExtraction::default()
        });
        aggregator.add(FileExtraction {
            external_apis: vec![api("b.py")],
            ..FileExtraction::default()
        });
        let model = aggregator.finish();
        assert_eq!(model.external_apis.len(), 1);
        assert_eq!(model.external_apis[0].module, "a.py");
    }

    #[test]
    fn test_endpoint_groups() {
        let mut aggregator = Aggregator::new(profile());
        aggregator.add(with_endpoints(vec![
            ApiEndpoint::from_code(HttpMethod::Get, "/api/users", "a.js", 1),
            ApiEndpoint::from_code(HttpMethod::Get, "/health", "a.js", 2),
            ApiEndpoint::from_code(HttpMethod::Post, "/api/orders", "a.js", 3),
        ]));
        let model = aggregator.finish();
        let groups = model.endpoint_groups();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["/api", "/health"]);
        assert_eq!(groups["/api"].len(), 2);
    }
}

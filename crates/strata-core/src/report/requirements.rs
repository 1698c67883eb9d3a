use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::code::license_line;
use super::{cell, not_detected, ApiAnalysis, CodeAnalysis, DatabaseAnalysis};
use crate::model::{BusinessRuleCandidate, RuleCategory};

/// Candidates quoted per rule category.
const RULES_PER_CATEGORY: usize = 5;

/// Requirements document stitched from previously written analyses.
///
/// Any of the three inputs may be missing; the matching sections then say
/// that nothing was detected.
pub struct RequirementsDoc {
    pub code: Option<CodeAnalysis>,
    pub database: Option<DatabaseAnalysis>,
    pub api: Option<ApiAnalysis>,
    pub generated_at: DateTime<Utc>,
}

impl RequirementsDoc {
    pub fn new(
        code: Option<CodeAnalysis>,
        database: Option<DatabaseAnalysis>,
        api: Option<ApiAnalysis>,
    ) -> Self {
        Self {
            code,
            database,
            api,
            generated_at: Utc::now(),
        }
    }

    /// Whether any input analysis was available.
    pub fn has_inputs(&self) -> bool {
        self.code.is_some() || self.database.is_some() || self.api.is_some()
    }

    fn project_name(&self) -> &str {
        self.code
            .as_ref()
            .map(|c| c.profile.name.as_str())
            .unwrap_or("Project")
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# {} - Software Requirements Specification\n\n", self.project_name()));
        md.push_str(&format!(
            "_Generated {} from static analysis. Recovered facts are heuristic and advisory._\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));

        self.overview(&mut md);
        self.functional(&mut md);
        self.interfaces(&mut md);
        self.data(&mut md);
        self.rules(&mut md);

        md
    }

    fn overview(&self, md: &mut String) {
        md.push_str("## 1. System Overview\n\n");
        let Some(code) = &self.code else {
            md.push_str(&not_detected("code analysis"));
            return;
        };

        md.push_str(&format!("- **Language**: {}\n", code.profile.language));
        if !code.profile.frameworks.is_empty() {
            let names: Vec<&str> = code.profile.frameworks.iter().map(|f| f.name()).collect();
            md.push_str(&format!("- **Frameworks**: {}\n", names.join(", ")));
        }
        md.push_str(&format!("- **Architecture**: {}\n", code.profile.architecture.label()));
        md.push_str(&format!("- **License**: {}\n", license_line(code.profile.license.as_ref())));
        md.push_str(&format!(
            "- **Size**: {} modules, {} functions, {} classes\n",
            code.summary.modules, code.summary.functions, code.summary.classes
        ));
        md.push_str(&format!(
            "- **Components**: {} request handlers, {} services, {} data models\n\n",
            code.summary.handlers, code.summary.services, code.summary.models
        ));
    }

    fn functional(&self, md: &mut String) {
        md.push_str("## 2. Functional Requirements\n\n");
        let groups = self.api.as_ref().map(|a| a.groups()).unwrap_or_default();
        if groups.is_empty() {
            md.push_str(&not_detected("API-backed functions"));
            return;
        }

        for (i, (group, endpoints)) in groups.iter().enumerate() {
            md.push_str(&format!("### 2.{} `{}` module\n\n", i + 1, group));
            for (j, endpoint) in endpoints.iter().enumerate() {
                let what = endpoint
                    .description
                    .as_deref()
                    .or(endpoint.operation_id.as_deref())
                    .unwrap_or("Handle the request");
                md.push_str(&format!(
                    "- **FR-{}.{}** `{} {}`: {}\n",
                    i + 1,
                    j + 1,
                    endpoint.method,
                    endpoint.path,
                    what
                ));
            }
            md.push('\n');
        }
    }

    fn interfaces(&self, md: &mut String) {
        md.push_str("## 3. Interface Requirements\n\n");
        md.push_str("### 3.1 REST API\n\n");
        match &self.api {
            Some(api) if !api.endpoints.is_empty() => {
                md.push_str(&format!(
                    "{} endpoints across {} groups. See `api_documentation.md` for the full list.\n\n",
                    api.endpoints.len(),
                    api.groups().len()
                ));
            }
            _ => md.push_str(&not_detected("API endpoints")),
        }

        md.push_str("### 3.2 External Integrations\n\n");
        match &self.api {
            Some(api) if !api.external_apis.is_empty() => {
                for external in &api.external_apis {
                    md.push_str(&format!("- `{}` (first called from `{}`)\n", external.base_url, external.module));
                }
                md.push('\n');
            }
            _ => md.push_str(&not_detected("external APIs")),
        }
    }

    fn data(&self, md: &mut String) {
        md.push_str("## 4. Data Requirements\n\n");
        let Some(db) = self.database.as_ref().filter(|d| !d.tables.is_empty()) else {
            md.push_str(&not_detected("tables"));
            return;
        };

        md.push_str("| Entity | Columns | Primary Key | References |\n");
        md.push_str("|--------|---------|-------------|------------|\n");
        for table in db.tables.values() {
            let references: Vec<&str> = table.foreign_keys.values().map(String::as_str).collect();
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                table.name,
                table.columns.len(),
                table.primary_keys.join(", "),
                references.join(", ")
            ));
        }
        md.push('\n');

        if !db.relationships.is_empty() {
            md.push_str(&format!(
                "{} model relationships recorded. See `data_dictionary.md`.\n\n",
                db.relationships.len()
            ));
        }
    }

    fn rules(&self, md: &mut String) {
        md.push_str("## 5. Business Rules\n\n");
        let rules: &[BusinessRuleCandidate] = self
            .code
            .as_ref()
            .map(|c| c.business_rules.as_slice())
            .unwrap_or(&[]);
        if rules.is_empty() {
            md.push_str(&not_detected("business rule candidates"));
            return;
        }

        let mut by_category: BTreeMap<RuleCategory, Vec<&BusinessRuleCandidate>> = BTreeMap::new();
        for rule in rules {
            by_category.entry(rule.category).or_default().push(rule);
        }
        for (category, candidates) in by_category {
            md.push_str(&format!("### {} ({} candidates)\n\n", category.title(), candidates.len()));
            for rule in candidates.iter().take(RULES_PER_CATEGORY) {
                md.push_str(&format!("- `{}`: {}\n", rule.location(), cell(&rule.snippet)));
            }
            md.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApiEndpoint, HttpMethod};

    #[test]
    fn test_missing_inputs_render_not_detected() {
        let doc = RequirementsDoc::new(None, None, None);
        assert!(!doc.has_inputs());
        let md = doc.to_markdown();
        assert!(md.starts_with("# Project - Software Requirements Specification"));
        assert!(md.contains("_No code analysis detected._"));
        assert!(md.contains("_No API-backed functions detected._"));
        assert!(md.contains("_No tables detected._"));
        assert!(md.contains("_No business rule candidates detected._"));
    }

    #[test]
    fn test_functional_requirements_follow_groups() {
        let api = ApiAnalysis {
            endpoints: vec![
                ApiEndpoint::from_code(HttpMethod::Get, "/users", "a.js", 1),
                ApiEndpoint::from_code(HttpMethod::Get, "/orders/:id", "b.js", 2),
                ApiEndpoint::from_code(HttpMethod::Post, "/users", "a.js", 3),
            ],
            external_apis: Vec::new(),
        };
        let md = RequirementsDoc::new(None, None, Some(api)).to_markdown();
        assert!(md.contains("### 2.1 `/orders` module"));
        assert!(md.contains("### 2.2 `/users` module"));
        assert!(md.contains("- **FR-2.2** `POST /users`: Handle the request"));
        assert!(md.contains("3 endpoints across 2 groups."));
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{cell, not_detected};
use crate::aggregate::{group_endpoints, RepositoryModel};
use crate::model::{ApiEndpoint, EndpointSource, ExternalApi};

/// Contents of `api_analysis.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiAnalysis {
    pub endpoints: Vec<ApiEndpoint>,
    pub external_apis: Vec<ExternalApi>,
}

impl ApiAnalysis {
    pub fn from_model(model: &RepositoryModel) -> Self {
        Self {
            endpoints: model.endpoints.clone(),
            external_apis: model.external_apis.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty() && self.external_apis.is_empty()
    }

    /// Endpoints bucketed by first path segment, in first-seen order within a group.
    pub fn groups(&self) -> BTreeMap<String, Vec<&ApiEndpoint>> {
        group_endpoints(&self.endpoints)
    }

    /// Markdown API documentation.
    pub fn to_markdown(&self) -> String {
        let mut md = String::from("# API Documentation\n\n");

        if self.endpoints.is_empty() {
            md.push_str(&not_detected("API endpoints"));
        } else {
            let from_spec = self
                .endpoints
                .iter()
                .filter(|e| e.source == EndpointSource::Specification)
                .count();
            md.push_str(&format!(
                "{} endpoints ({} from code, {} from API specifications).\n\n",
                self.endpoints.len(),
                self.endpoints.len() - from_spec,
                from_spec
            ));

            for (group, endpoints) in self.groups() {
                md.push_str(&format!("## {}\n\n", group));
                md.push_str("| Method | Path | Description | Source |\n");
                md.push_str("|--------|------|-------------|--------|\n");
                for endpoint in endpoints {
                    let description = endpoint
                        .description
                        .as_deref()
                        .or(endpoint.operation_id.as_deref())
                        .or(endpoint.handler.as_deref())
                        .unwrap_or("");
                    let location = match endpoint.line {
                        Some(line) => format!("{}:{}", endpoint.module, line),
                        None => endpoint.module.clone(),
                    };
                    md.push_str(&format!(
                        "| {} | `{}` | {} | `{}` |\n",
                        endpoint.method,
                        endpoint.path,
                        cell(description),
                        location
                    ));
                }
                md.push('\n');
            }
        }

        md.push_str("## External API Dependencies\n\n");
        if self.external_apis.is_empty() {
            md.push_str(&not_detected("external APIs"));
        } else {
            md.push_str("| Host | Base URL | Method | Source |\n");
            md.push_str("|------|----------|--------|--------|\n");
            for api in &self.external_apis {
                md.push_str(&format!(
                    "| {} | `{}` | {} | `{}:{}` |\n",
                    api.host,
                    api.base_url,
                    api.method.map(|m| m.as_str()).unwrap_or("-"),
                    api.module,
                    api.line
                ));
            }
            md.push('\n');
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HttpMethod;

    #[test]
    fn test_grouped_documentation() {
        let mut spec = ApiEndpoint::from_code(HttpMethod::Get, "/pets/{id}", "openapi.yaml", 1);
        spec.line = None;
        spec.source = EndpointSource::Specification;
        spec.description = Some("Show a pet".to_string());

        let analysis = ApiAnalysis {
            endpoints: vec![
                ApiEndpoint::from_code(HttpMethod::Post, "/users", "src/users.js", 7),
                spec,
            ],
            external_apis: Vec::new(),
        };
        let md = analysis.to_markdown();
        assert!(md.contains("2 endpoints (1 from code, 1 from API specifications)."));
        assert!(md.contains("## /pets\n"));
        assert!(md.contains("| GET | `/pets/{id}` | Show a pet | `openapi.yaml` |"));
        assert!(md.contains("| POST | `/users` |  | `src/users.js:7` |"));
        assert!(md.contains("_No external APIs detected._"));
    }

    #[test]
    fn test_empty_documentation() {
        let md = ApiAnalysis::default().to_markdown();
        assert!(md.contains("_No API endpoints detected._"));
    }
}

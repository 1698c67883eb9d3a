//! API records: endpoints and external services.
//!
//! Endpoints come from two sources that are never mixed: text patterns over
//! code, and machine-readable OpenAPI/Swagger documents.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// HTTP METHOD
// =============================================================================

/// HTTP method of an endpoint. `Any` covers routes that accept every method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Any,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Any => "ANY",
        }
    }

    /// Parse a method token in any case. `all`/`any` map to [`HttpMethod::Any`].
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            "ALL" | "ANY" => Some(Self::Any),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ENDPOINT
// =============================================================================

/// Where an endpoint record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointSource {
    /// Matched by a text pattern in source code.
    Code,
    /// Read from an OpenAPI/Swagger document.
    Specification,
}

/// An HTTP endpoint.
///
/// `parameters`, `request_body` and `responses` are only populated for
/// specification-derived endpoints. `None` means unknown, not empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub method: HttpMethod,

    /// Path template exactly as written, placeholders included.
    pub path: String,

    /// Path of the declaring module or specification file.
    pub module: String,

    /// 1-based line for code-derived endpoints.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line: Option<usize>,

    pub source: EndpointSource,

    /// Framework whose pattern produced the match.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub framework: Option<String>,

    /// Handler expression following the path, when the pattern captures one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub handler: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parameters: Option<Vec<serde_json::Value>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request_body: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub responses: Option<serde_json::Value>,
}

impl ApiEndpoint {
    /// A code-derived endpoint with no specification metadata.
    pub fn from_code(
        method: HttpMethod,
        path: impl Into<String>,
        module: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            module: module.into(),
            line: Some(line),
            source: EndpointSource::Code,
            framework: None,
            handler: None,
            operation_id: None,
            description: None,
            parameters: None,
            request_body: None,
            responses: None,
        }
    }

    /// First non-empty path segment, or `/` for the root.
    pub fn group(&self) -> String {
        self.path
            .split('/')
            .find(|segment| !segment.is_empty())
            .map(|segment| format!("/{}", segment))
            .unwrap_or_else(|| "/".to_string())
    }

    /// Fill fields this record lacks from a duplicate seen later.
    pub fn absorb(&mut self, later: ApiEndpoint) {
        if self.line.is_none() {
            self.line = later.line;
        }
        if self.framework.is_none() {
            self.framework = later.framework;
        }
        if self.handler.is_none() {
            self.handler = later.handler;
        }
        if self.operation_id.is_none() {
            self.operation_id = later.operation_id;
        }
        if self.description.is_none() {
            self.description = later.description;
        }
        if self.parameters.is_none() {
            self.parameters = later.parameters;
        }
        if self.request_body.is_none() {
            self.request_body = later.request_body;
        }
        if self.responses.is_none() {
            self.responses = later.responses;
        }
    }
}

// =============================================================================
// EXTERNAL API
// =============================================================================

/// A remote host called from application code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalApi {
    /// Host name, the dedup key.
    pub host: String,

    /// `scheme://host[:port]` of the first observed call.
    pub base_url: String,

    /// HTTP method of the first observed call, when the call site names one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub method: Option<HttpMethod>,

    /// Module the first call was observed in.
    pub module: String,

    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("Delete"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::parse("all"), Some(HttpMethod::Any));
        assert_eq!(HttpMethod::parse("use"), None);
    }

    #[test]
    fn test_group_uses_first_segment() {
        let ep = ApiEndpoint::from_code(HttpMethod::Get, "/api/users/:id", "a.js", 1);
        assert_eq!(ep.group(), "/api");
        let ep = ApiEndpoint::from_code(HttpMethod::Get, "users/<int:pk>/", "urls.py", 1);
        assert_eq!(ep.group(), "/users");
        let ep = ApiEndpoint::from_code(HttpMethod::Get, "/", "a.js", 1);
        assert_eq!(ep.group(), "/");
    }

    #[test]
    fn test_absorb_keeps_first_seen_values() {
        let mut first = ApiEndpoint::from_code(HttpMethod::Get, "/users", "a.js", 3);
        first.description = Some("first".to_string());

        let mut later = ApiEndpoint::from_code(HttpMethod::Get, "/users", "b.py", 9);
        later.description = Some("later".to_string());
        later.operation_id = Some("listUsers".to_string());

        first.absorb(later);
        assert_eq!(first.description.as_deref(), Some("first"));
        assert_eq!(first.operation_id.as_deref(), Some("listUsers"));
        assert_eq!(first.module, "a.js");
        assert_eq!(first.line, Some(3));
    }
}

//! Endpoints from OpenAPI / Swagger documents.
//!
//! Paths come from the structured document and are never run through the
//! route patterns used for source code.

use serde_json::{Map, Value};

use crate::error::ExtractError;
use crate::model::{ApiEndpoint, EndpointSource, HttpMethod};

const OPERATION_METHODS: &[(&str, HttpMethod)] = &[
    ("get", HttpMethod::Get),
    ("post", HttpMethod::Post),
    ("put", HttpMethod::Put),
    ("delete", HttpMethod::Delete),
    ("patch", HttpMethod::Patch),
    ("head", HttpMethod::Head),
    ("options", HttpMethod::Options),
];

/// Parse a specification document into endpoints.
///
/// JSON is tried for `.json` files and documents starting with `{`, YAML
/// otherwise. A document without a `paths` object yields no endpoints.
pub fn parse_specification(rel: &str, content: &str) -> Result<Vec<ApiEndpoint>, ExtractError> {
    let doc = parse_document(rel, content).map_err(|message| ExtractError::Specification {
        path: rel.to_string(),
        message,
    })?;

    let Some(paths) = doc.get("paths").and_then(Value::as_object) else {
        tracing::debug!("{}: no paths object, not an API specification", rel);
        return Ok(Vec::new());
    };

    // Swagger 2 keeps a common prefix outside the paths.
    let base_path = doc
        .get("basePath")
        .and_then(Value::as_str)
        .map(|b| b.trim_end_matches('/'))
        .unwrap_or("");

    let mut endpoints = Vec::new();
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        let shared = parameter_list(item);

        for (key, method) in OPERATION_METHODS {
            let Some(operation) = item.get(*key).and_then(Value::as_object) else {
                continue;
            };
            endpoints.push(endpoint(rel, base_path, path, *method, operation, &shared));
        }
    }

    tracing::debug!("{}: {} specification endpoints", rel, endpoints.len());
    Ok(endpoints)
}

fn endpoint(
    rel: &str,
    base_path: &str,
    path: &str,
    method: HttpMethod,
    operation: &Map<String, Value>,
    shared: &[Value],
) -> ApiEndpoint {
    let text = |key: &str| {
        operation
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let parameters = merge_parameters(shared, &parameter_list(operation));

    // Swagger 2 sends the body as an `in: body` parameter.
    let request_body = operation.get("requestBody").cloned().or_else(|| {
        parameters
            .iter()
            .find(|p| p.get("in").and_then(Value::as_str) == Some("body"))
            .and_then(|p| p.get("schema").cloned())
    });

    ApiEndpoint {
        method,
        path: format!("{}{}", base_path, path),
        module: rel.to_string(),
        line: None,
        source: EndpointSource::Specification,
        framework: None,
        handler: None,
        operation_id: text("operationId"),
        description: text("summary").or_else(|| text("description")),
        parameters: Some(parameters),
        request_body,
        responses: operation.get("responses").cloned(),
    }
}

fn parameter_list(object: &Map<String, Value>) -> Vec<Value> {
    object
        .get("parameters")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Path-level parameters not overridden by the operation, then the
/// operation's own. Parameters are identified by `name` and `in`.
fn merge_parameters(shared: &[Value], own: &[Value]) -> Vec<Value> {
    let identity = |p: &Value| {
        (
            p.get("name").and_then(Value::as_str).map(str::to_string),
            p.get("in").and_then(Value::as_str).map(str::to_string),
        )
    };

    let mut merged: Vec<Value> = shared
        .iter()
        .filter(|p| !own.iter().any(|o| identity(o) == identity(p)))
        .cloned()
        .collect();
    merged.extend(own.iter().cloned());
    merged
}

fn parse_document(rel: &str, content: &str) -> Result<Value, String> {
    let looks_like_json = rel.to_lowercase().ends_with(".json") || content.trim_start().starts_with('{');
    if looks_like_json {
        return serde_json::from_str(content).map_err(|e| e.to_string());
    }

    let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    Ok(yaml_to_json(yaml))
}

/// Convert YAML to JSON, stringifying non-string keys such as `200:`.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
                .collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => {
            let tagged = *tagged;
            yaml_to_json(tagged.value)
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPENAPI_YAML: &str = r#"openapi: 3.0.0
info:
  title: Pets
  version: "1.0"
paths:
  /pets/{petId}:
    parameters:
      - name: petId
        in: path
        required: true
    get:
      operationId: showPetById
      summary: Info for a specific pet
      responses:
        200:
          description: Expected response
    delete:
      description: Remove a pet
      parameters:
        - name: petId
          in: path
          description: overridden
  /pets:
    post:
      requestBody:
        content:
          application/json: {}
      responses:
        "201":
          description: Created
"#;

    #[test]
    fn test_openapi_yaml() {
        let endpoints = parse_specification("docs/openapi.yaml", OPENAPI_YAML).unwrap();
        assert_eq!(endpoints.len(), 3);

        let get = endpoints
            .iter()
            .find(|e| e.method == HttpMethod::Get)
            .unwrap();
        assert_eq!(get.path, "/pets/{petId}");
        assert_eq!(get.source, EndpointSource::Specification);
        assert_eq!(get.operation_id.as_deref(), Some("showPetById"));
        assert_eq!(get.description.as_deref(), Some("Info for a specific pet"));
        assert_eq!(get.parameters.as_ref().map(Vec::len), Some(1));
        assert!(get.responses.as_ref().unwrap().get("200").is_some());
        assert!(get.line.is_none());

        let delete = endpoints
            .iter()
            .find(|e| e.method == HttpMethod::Delete)
            .unwrap();
        assert_eq!(delete.description.as_deref(), Some("Remove a pet"));
        let params = delete.parameters.as_ref().unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0]["description"], "overridden");

        let post = endpoints
            .iter()
            .find(|e| e.method == HttpMethod::Post)
            .unwrap();
        assert!(post.request_body.is_some());
        assert_eq!(post.parameters.as_deref(), Some(&[][..]));
    }

    #[test]
    fn test_swagger_json_base_path_and_body() {
        let doc = r#"{
  "swagger": "2.0",
  "basePath": "/api/v1/",
  "paths": {
    "/users": {
      "post": {
        "parameters": [{"name": "user", "in": "body", "schema": {"type": "object"}}],
        "responses": {"200": {"description": "ok"}}
      }
    }
  }
}"#;
        let endpoints = parse_specification("swagger.json", doc).unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "/api/v1/users");
        assert_eq!(
            endpoints[0].request_body.as_ref().and_then(|b| b.get("type")),
            Some(&Value::from("object"))
        );
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let err = parse_specification("openapi.json", "{ \"paths\": ").unwrap_err();
        assert!(matches!(err, ExtractError::Specification { .. }));
        assert_eq!(err.path(), "openapi.json");

        let err = parse_specification("openapi.yaml", "paths: [unclosed").unwrap_err();
        assert!(matches!(err, ExtractError::Specification { .. }));
    }

    #[test]
    fn test_document_without_paths() {
        let endpoints = parse_specification("api.json", r#"{"name": "not a spec"}"#).unwrap();
        assert!(endpoints.is_empty());
    }
}

//! HTTP routes from source text.
//!
//! A file's content is first scanned for framework signatures. Recognised
//! frameworks contribute their own patterns; when nothing is recognised the
//! union of the language's patterns runs and every hit must pass
//! [`is_plausible_api_path`].

use regex::Regex;

use super::text::{compile, count_lines_before};
use crate::model::{ApiEndpoint, HttpMethod, Language};
use crate::patterns::routes::{
    API_PATH_PREFIXES, CLASS_DECLARATION, PREFIX_PATTERNS, QUOTED_METHOD, REST_NOUN_SEGMENTS,
};
use crate::patterns::{RouteFramework, ROUTE_PATTERNS};

struct CompiledFramework {
    framework: RouteFramework,
    routes: Vec<(Regex, HttpMethod)>,
    prefixes: Vec<Regex>,
}

/// Route extractor for one language, compiled once.
pub struct RouteExtractor {
    frameworks: Vec<CompiledFramework>,
    class_declaration: Option<Regex>,
    quoted_method: Option<Regex>,
}

impl RouteExtractor {
    pub fn new(language: Language) -> Self {
        let frameworks = RouteFramework::for_language(language)
            .iter()
            .map(|&framework| CompiledFramework {
                framework,
                routes: ROUTE_PATTERNS
                    .iter()
                    .filter(|p| p.framework == framework)
                    .filter_map(|p| Some((compile(p.regex)?, p.default_method)))
                    .collect(),
                prefixes: PREFIX_PATTERNS
                    .iter()
                    .filter(|p| p.framework == framework)
                    .filter_map(|p| compile(p.regex))
                    .collect(),
            })
            .collect();

        Self {
            frameworks,
            class_declaration: compile(CLASS_DECLARATION),
            quoted_method: compile(QUOTED_METHOD),
        }
    }

    /// Frameworks whose signatures appear in `content`.
    pub fn recognized(&self, content: &str) -> Vec<RouteFramework> {
        self.frameworks
            .iter()
            .filter(|f| f.framework.signatures().iter().any(|s| content.contains(s)))
            .map(|f| f.framework)
            .collect()
    }

    /// Code-derived endpoints of one file, in source order.
    pub fn extract(&self, rel: &str, content: &str) -> Vec<ApiEndpoint> {
        let recognized = self.recognized(content);
        let fallback = recognized.is_empty();

        let class_start = self
            .class_declaration
            .as_ref()
            .and_then(|re| re.find(content))
            .map(|m| m.start())
            .unwrap_or(content.len());

        let mut found: Vec<(usize, ApiEndpoint)> = Vec::new();

        for compiled in &self.frameworks {
            if !fallback && !recognized.contains(&compiled.framework) {
                continue;
            }

            let prefix = compiled
                .prefixes
                .iter()
                .filter_map(|re| re.captures(content))
                .find(|cap| cap.get(0).map(|m| m.start() < class_start).unwrap_or(false));
            let prefix_start = prefix.as_ref().and_then(|cap| cap.get(0)).map(|m| m.start());
            let prefix_path = prefix
                .as_ref()
                .and_then(|cap| cap.name("path"))
                .map(|m| m.as_str())
                .unwrap_or("");

            for (re, default_method) in &compiled.routes {
                for cap in re.captures_iter(content) {
                    let Some(whole) = cap.get(0) else {
                        continue;
                    };
                    if Some(whole.start()) == prefix_start {
                        continue;
                    }

                    let raw_path = cap.name("path").map(|m| m.as_str()).unwrap_or("");
                    let path = join_route(prefix_path, raw_path);
                    if fallback && !is_plausible_api_path(&path) {
                        continue;
                    }

                    let line = count_lines_before(content, whole.start());
                    let handler = cap
                        .name("handler")
                        .map(|m| m.as_str().trim().to_string())
                        .filter(|h| !h.is_empty());

                    for method in self.methods(&cap, *default_method) {
                        let mut endpoint = ApiEndpoint::from_code(method, path.clone(), rel, line);
                        endpoint.framework = Some(compiled.framework.name().to_string());
                        endpoint.handler = handler.clone();
                        found.push((whole.start(), endpoint));
                    }
                }
            }
        }

        found.sort_by_key(|(offset, _)| *offset);
        found.into_iter().map(|(_, endpoint)| endpoint).collect()
    }

    fn methods(&self, cap: &regex::Captures, default: HttpMethod) -> Vec<HttpMethod> {
        if let (Some(list), Some(quoted)) = (cap.name("methods"), &self.quoted_method) {
            let methods: Vec<HttpMethod> = quoted
                .captures_iter(list.as_str())
                .filter_map(|m| m.name("method"))
                .filter_map(|m| HttpMethod::parse(m.as_str()))
                .collect();
            if !methods.is_empty() {
                return methods;
            }
        }

        let method = cap
            .name("method")
            .and_then(|m| HttpMethod::parse(m.as_str()))
            .unwrap_or(default);
        vec![method]
    }
}

/// Apply a class-level prefix. Without one the path is kept verbatim.
fn join_route(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        return if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        };
    }

    let path = path.trim_start_matches('/');
    if path.is_empty() {
        format!("/{}", prefix)
    } else {
        format!("/{}/{}", prefix, path)
    }
}

/// Whether a route looks like an API path: a known API prefix, or a
/// common REST-noun segment anywhere in it.
pub fn is_plausible_api_path(path: &str) -> bool {
    let normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    API_PATH_PREFIXES
        .iter()
        .any(|p| normalized.starts_with(p) || normalized == p.trim_end_matches('/'))
        || REST_NOUN_SEGMENTS.iter().any(|s| normalized.contains(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(endpoints: &[ApiEndpoint]) -> Vec<(HttpMethod, &str)> {
        endpoints.iter().map(|e| (e.method, e.path.as_str())).collect()
    }

    #[test]
    fn test_express_routes() {
        let code = r#"const express = require('express');
const router = express.Router();

router.get('/health', health);
router.post('/items/:id', auth, controller.update);
app.all('/anything', handler);
"#;
        let extractor = RouteExtractor::new(Language::JavaScript);
        let endpoints = extractor.extract("routes.js", code);

        assert_eq!(
            paths(&endpoints),
            vec![
                (HttpMethod::Get, "/health"),
                (HttpMethod::Post, "/items/:id"),
                (HttpMethod::Any, "/anything"),
            ]
        );
        assert_eq!(endpoints[0].line, Some(4));
        assert_eq!(endpoints[0].handler.as_deref(), Some("health"));
        assert_eq!(endpoints[0].framework.as_deref(), Some("Express/Koa"));
    }

    #[test]
    fn test_nest_prefix() {
        let code = r#"import { Controller, Get, Post } from '@nestjs/common';

@Controller('users')
export class UsersController {
  @Get()
  findAll() {}

  @Get(':id')
  findOne() {}

  @Post()
  create() {}
}
"#;
        let extractor = RouteExtractor::new(Language::TypeScript);
        let endpoints = extractor.extract("users.controller.ts", code);
        assert_eq!(
            paths(&endpoints),
            vec![
                (HttpMethod::Get, "/users"),
                (HttpMethod::Get, "/users/:id"),
                (HttpMethod::Post, "/users"),
            ]
        );
    }

    #[test]
    fn test_spring_class_prefix_is_not_an_endpoint() {
        let code = r#"import org.springframework.web.bind.annotation.*;

@RestController
@RequestMapping("/api/orders")
public class OrderController {
    @GetMapping("/{id}")
    public Order get(@PathVariable Long id) { return null; }

    @PostMapping
    public Order create() { return null; }

    @RequestMapping(value = "/search", method = RequestMethod.PUT)
    public List<Order> search() { return null; }
}
"#;
        let extractor = RouteExtractor::new(Language::Java);
        let endpoints = extractor.extract("OrderController.java", code);
        assert_eq!(
            paths(&endpoints),
            vec![
                (HttpMethod::Get, "/api/orders/{id}"),
                (HttpMethod::Post, "/api/orders"),
                (HttpMethod::Put, "/api/orders/search"),
            ]
        );
    }

    #[test]
    fn test_flask_methods_list_and_django() {
        let code = r#"from flask import Flask
app = Flask(__name__)

@app.route('/login', methods=['GET', 'POST'])
def login():
    pass

@app.route('/about')
def about():
    pass
"#;
        let extractor = RouteExtractor::new(Language::Python);
        let endpoints = extractor.extract("app.py", code);
        assert_eq!(
            paths(&endpoints),
            vec![
                (HttpMethod::Get, "/login"),
                (HttpMethod::Post, "/login"),
                (HttpMethod::Get, "/about"),
            ]
        );

        let urls = r#"from django.urls import path
urlpatterns = [
    path('users/<int:pk>/', views.UserDetail.as_view()),
]
"#;
        let endpoints = extractor.extract("urls.py", urls);
        assert_eq!(paths(&endpoints), vec![(HttpMethod::Any, "users/<int:pk>/")]);
    }

    #[test]
    fn test_go_frameworks() {
        let code = r#"package main

import "github.com/gin-gonic/gin"

func main() {
	r := gin.Default()
	r.GET("/ping", ping)
	r.POST("/users", createUser)
}
"#;
        let extractor = RouteExtractor::new(Language::Go);
        let endpoints = extractor.extract("main.go", code);
        assert_eq!(
            paths(&endpoints),
            vec![(HttpMethod::Get, "/ping"), (HttpMethod::Post, "/users")]
        );
    }

    #[test]
    fn test_unknown_framework_applies_plausibility() {
        let code = r#"
app.get('/api/v1/items', list);
app.get('/static/logo', serve);
router.post('/orders', create);
"#;
        let extractor = RouteExtractor::new(Language::JavaScript);
        assert!(extractor.recognized(code).is_empty());
        let endpoints = extractor.extract("server.js", code);
        let found = paths(&endpoints);
        assert!(found.contains(&(HttpMethod::Get, "/api/v1/items")));
        assert!(found.contains(&(HttpMethod::Post, "/orders")));
        assert!(!found.iter().any(|(_, p)| *p == "/static/logo"));
    }

    #[test]
    fn test_plausibility_predicate() {
        assert!(is_plausible_api_path("/api/users"));
        assert!(is_plausible_api_path("api/things"));
        assert!(is_plausible_api_path("/graphql"));
        assert!(is_plausible_api_path("/admin/users/1"));
        assert!(!is_plausible_api_path("/about"));
        assert!(!is_plausible_api_path("/"));
    }

    #[test]
    fn test_truncated_route_never_panics() {
        let extractor = RouteExtractor::new(Language::Unknown);
        let endpoints = extractor.extract("bad.js", "app.get('/api/x");
        assert!(endpoints.is_empty());
    }
}

//! Route declaration patterns, grouped by web framework.
//!
//! Named groups: `method` (optional), `methods` (Flask list), `path`,
//! `handler` (optional).

use crate::model::{HttpMethod, Language};

/// Web framework family a route pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RouteFramework {
    Express,
    Fastify,
    NestJS,
    Flask,
    FastAPI,
    Django,
    Spring,
    Gin,
    Chi,
    NetHttp,
    AspNet,
    Laravel,
    Rails,
}

impl RouteFramework {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Express => "Express/Koa",
            Self::Fastify => "Fastify",
            Self::NestJS => "NestJS",
            Self::Flask => "Flask",
            Self::FastAPI => "FastAPI",
            Self::Django => "Django",
            Self::Spring => "Spring",
            Self::Gin => "Gin/Echo",
            Self::Chi => "Chi/Fiber",
            Self::NetHttp => "net/http",
            Self::AspNet => "ASP.NET",
            Self::Laravel => "Laravel",
            Self::Rails => "Rails",
        }
    }

    /// Substrings whose presence in a file selects this framework's patterns.
    pub fn signatures(&self) -> &'static [&'static str] {
        match self {
            Self::Express => &[
                "require('express')",
                "require(\"express\")",
                "from 'express'",
                "from \"express\"",
                "express.Router",
                "koa-router",
                "@koa/router",
            ],
            Self::Fastify => &["fastify"],
            Self::NestJS => &["@nestjs/"],
            Self::Flask => &["from flask", "import flask", "Flask(__name__)", "Blueprint("],
            Self::FastAPI => &["from fastapi", "import fastapi", "FastAPI(", "APIRouter("],
            Self::Django => &["from django", "urlpatterns"],
            Self::Spring => &[
                "org.springframework",
                "@RestController",
                "@Controller",
                "@RequestMapping",
            ],
            Self::Gin => &["gin-gonic/gin", "labstack/echo"],
            Self::Chi => &["go-chi/chi", "gofiber/fiber"],
            Self::NetHttp => &["net/http", "gorilla/mux"],
            Self::AspNet => &["Microsoft.AspNetCore", "[ApiController]", ": ControllerBase"],
            Self::Laravel => &["Illuminate\\", "Route::"],
            Self::Rails => &["Rails.application.routes", "ActionController"],
        }
    }

    /// Frameworks whose patterns apply to a language family.
    pub fn for_language(language: Language) -> &'static [RouteFramework] {
        match language {
            Language::JavaScript | Language::TypeScript => {
                &[Self::Express, Self::Fastify, Self::NestJS]
            }
            Language::Python => &[Self::Flask, Self::FastAPI, Self::Django],
            Language::Java => &[Self::Spring],
            Language::Go => &[Self::Gin, Self::Chi, Self::NetHttp],
            Language::CSharp | Language::Php | Language::Ruby | Language::Unknown => &[
                Self::AspNet,
                Self::Laravel,
                Self::Rails,
                Self::Express,
                Self::Fastify,
                Self::NestJS,
                Self::Flask,
                Self::FastAPI,
                Self::Django,
                Self::Spring,
                Self::Gin,
                Self::Chi,
                Self::NetHttp,
            ],
        }
    }
}

/// A route declaration pattern.
#[derive(Debug, Clone, Copy)]
pub struct RoutePattern {
    pub framework: RouteFramework,
    pub regex: &'static str,
    /// Method used when the pattern has no `method`/`methods` capture.
    pub default_method: HttpMethod,
}

/// A class-level prefix declaration (`@Controller('users')`).
///
/// Applies to every route in the file when it appears before the first class.
#[derive(Debug, Clone, Copy)]
pub struct PrefixPattern {
    pub framework: RouteFramework,
    pub regex: &'static str,
}

// =============================================================================
// ROUTES
// =============================================================================

pub const ROUTE_PATTERNS: &[RoutePattern] = &[
    // Express / Koa
    RoutePattern {
        framework: RouteFramework::Express,
        regex: r#"\b(?:app|router|server|api|routes?|routers?)\.(?P<method>get|post|put|delete|patch|head|options|all)\s*\(\s*['"`](?P<path>[^'"`]*)['"`]\s*(?:,\s*(?P<handler>[\w.$]+))?"#,
        default_method: HttpMethod::Get,
    },
    // Fastify
    RoutePattern {
        framework: RouteFramework::Fastify,
        regex: r#"\b(?:fastify|app|server|instance)\.(?P<method>get|post|put|delete|patch|head|options|all)\s*\(\s*['"`](?P<path>[^'"`]*)['"`]\s*(?:,\s*(?P<handler>[\w.$]+))?"#,
        default_method: HttpMethod::Get,
    },
    RoutePattern {
        framework: RouteFramework::Fastify,
        regex: r#"\.route\s*\(\s*\{[^}]*?\bmethod\s*:\s*['"](?P<method>\w+)['"][^}]*?\burl\s*:\s*['"](?P<path>[^'"]+)['"]"#,
        default_method: HttpMethod::Get,
    },
    // NestJS
    RoutePattern {
        framework: RouteFramework::NestJS,
        regex: r#"@(?P<method>Get|Post|Put|Delete|Patch|Head|Options|All)\s*\(\s*(?:['"`](?P<path>[^'"`]*)['"`])?\s*\)"#,
        default_method: HttpMethod::Get,
    },
    // Flask
    RoutePattern {
        framework: RouteFramework::Flask,
        regex: r#"@\w+\.route\s*\(\s*['"](?P<path>[^'"]+)['"](?:[^)]*?methods\s*=\s*[\[(](?P<methods>[^\])]*)[\])])?"#,
        default_method: HttpMethod::Get,
    },
    // FastAPI (also Flask 2 shorthand)
    RoutePattern {
        framework: RouteFramework::FastAPI,
        regex: r#"@\w+\.(?P<method>get|post|put|delete|patch|head|options)\s*\(\s*['"](?P<path>[^'"]+)['"]"#,
        default_method: HttpMethod::Get,
    },
    // Django
    RoutePattern {
        framework: RouteFramework::Django,
        regex: r#"\b(?:re_path|path|url)\s*\(\s*r?['"](?P<path>[^'"]*)['"]\s*,\s*(?P<handler>[\w.]+(?:\.as_view\(\))?)"#,
        default_method: HttpMethod::Any,
    },
    // Spring
    RoutePattern {
        framework: RouteFramework::Spring,
        regex: r#"@(?P<method>Get|Post|Put|Delete|Patch)Mapping\b(?:\s*\(\s*(?:(?:value|path)\s*=\s*)?\{?\s*"(?P<path>[^"]*)")?"#,
        default_method: HttpMethod::Get,
    },
    RoutePattern {
        framework: RouteFramework::Spring,
        regex: r#"@RequestMapping\s*\(\s*(?:(?:value|path)\s*=\s*)?\{?\s*"(?P<path>[^"]*)"(?:[^)]*?method\s*=\s*\{?\s*RequestMethod\.(?P<method>\w+))?"#,
        default_method: HttpMethod::Get,
    },
    // Gin / Echo
    RoutePattern {
        framework: RouteFramework::Gin,
        regex: r#"\.(?P<method>GET|POST|PUT|DELETE|PATCH|HEAD|OPTIONS|Any)\s*\(\s*"(?P<path>[^"]*)"\s*,\s*(?P<handler>[\w.]+)?"#,
        default_method: HttpMethod::Get,
    },
    RoutePattern {
        framework: RouteFramework::Gin,
        regex: r#"\.Handle\s*\(\s*"(?P<method>[A-Z]+)"\s*,\s*"(?P<path>[^"]+)""#,
        default_method: HttpMethod::Any,
    },
    // Chi / Fiber
    RoutePattern {
        framework: RouteFramework::Chi,
        regex: r#"\b\w+\.(?P<method>Get|Post|Put|Delete|Patch|Head|Options|All)\s*\(\s*"(?P<path>[^"]*)"\s*,\s*(?P<handler>[\w.]+)?"#,
        default_method: HttpMethod::Get,
    },
    // net/http, gorilla/mux
    RoutePattern {
        framework: RouteFramework::NetHttp,
        regex: r#"\.HandleFunc\s*\(\s*"(?P<path>[^"]+)"\s*,\s*(?P<handler>[\w.]+)?(?:[^\n]*?\.Methods\s*\(\s*"(?P<method>[A-Z]+)")?"#,
        default_method: HttpMethod::Any,
    },
    // ASP.NET
    RoutePattern {
        framework: RouteFramework::AspNet,
        regex: r#"\[\s*Http(?P<method>Get|Post|Put|Delete|Patch|Head|Options)\s*(?:\(\s*"(?P<path>[^"]*)"\s*\))?\s*\]"#,
        default_method: HttpMethod::Get,
    },
    // Laravel
    RoutePattern {
        framework: RouteFramework::Laravel,
        regex: r#"Route::(?P<method>get|post|put|delete|patch|options|any)\s*\(\s*['"](?P<path>[^'"]+)['"]"#,
        default_method: HttpMethod::Get,
    },
    // Rails
    RoutePattern {
        framework: RouteFramework::Rails,
        regex: r#"(?m)^[ \t]*(?P<method>get|post|put|patch|delete)\s+['"](?P<path>[^'"]+)['"](?:\s*,\s*to:\s*['"](?P<handler>[^'"]+)['"])?"#,
        default_method: HttpMethod::Get,
    },
];

pub const PREFIX_PATTERNS: &[PrefixPattern] = &[
    PrefixPattern {
        framework: RouteFramework::NestJS,
        regex: r#"@Controller\s*\(\s*['"`](?P<path>[^'"`]*)['"`]"#,
    },
    PrefixPattern {
        framework: RouteFramework::Spring,
        regex: r#"@RequestMapping\s*\(\s*(?:(?:value|path)\s*=\s*)?\{?\s*"(?P<path>[^"]*)""#,
    },
    PrefixPattern {
        framework: RouteFramework::AspNet,
        regex: r#"\[\s*Route\s*\(\s*"(?P<path>[^"]*)"\s*\)\s*\]"#,
    },
];

/// Locates the first class declaration, bounding where prefixes may appear.
pub const CLASS_DECLARATION: &str = r#"\bclass\s+\w+"#;

/// A single quoted method inside a Flask `methods=[...]` list.
pub const QUOTED_METHOD: &str = r#"['"](?P<method>\w+)['"]"#;

// =============================================================================
// PLAUSIBILITY
// =============================================================================

/// Path prefixes that mark a route as API-like.
pub const API_PATH_PREFIXES: &[&str] = &[
    "/api/",
    "/v1/",
    "/v2/",
    "/v3/",
    "/rest/",
    "/graphql",
    "/ws/",
    "/socket.io/",
];

/// REST-noun segments that mark a route as API-like.
pub const REST_NOUN_SEGMENTS: &[&str] = &[
    "/login",
    "/logout",
    "/register",
    "/auth",
    "/users",
    "/posts",
    "/comments",
    "/products",
    "/orders",
];

//! Business-rule and outbound HTTP call patterns.

use crate::model::RuleCategory;

/// A business-rule pattern. Matches are kept line-bounded where possible.
#[derive(Debug, Clone, Copy)]
pub struct RulePattern {
    pub category: RuleCategory,
    pub regex: &'static str,
}

pub const RULE_PATTERNS: &[RulePattern] = &[
    RulePattern {
        category: RuleCategory::Validation,
        regex: r#"\bif\b[^\n]*?\b(?:length|len|size|min|max|required|null|None|nil|empty|isEmpty|is_empty|email|password|valid|isValid)\b"#,
    },
    RulePattern {
        category: RuleCategory::Validation,
        regex: r#"\b(?:validate|validator|assert|raise\s+ValidationError|throw\s+new\s+\w*(?:Validation|Argument)\w*)\b[^\n]*"#,
    },
    RulePattern {
        category: RuleCategory::Calculation,
        regex: r#"\b(?:total|sum|subtotal|calculate|compute|discount|tax|price|amount|balance|fee)\w*\s*(?:[-+*/]?=[^=]|\()[^\n]*"#,
    },
    RulePattern {
        category: RuleCategory::Authorization,
        regex: r#"(?i)(?:\bif\b|@|\brequire|\bcheck|\bhas|\bcan|\bauthorize)[^\n]*?\b(?:roles?|permissions?|authori[sz]ed?|is_?admin|admin|access|scope)\b[^\n]*"#,
    },
    RulePattern {
        category: RuleCategory::Conditional,
        regex: r#"\bif\b[^\n{;]*\{[^{}]*\breturn\b[^{}]*\}"#,
    },
    RulePattern {
        category: RuleCategory::Conditional,
        regex: r#"(?m)^[ \t]*if\b[^\n]*:[ \t]*\n[ \t]+return\b[^\n]*"#,
    },
];

/// An outbound HTTP call pattern. Named groups: `url`, optional `method`.
pub const EXTERNAL_CALL_PATTERNS: &[&str] = &[
    // fetch / axios
    r#"\bfetch\s*\(\s*['"`](?P<url>https?://[^'"`\s]+)"#,
    r#"\baxios\.(?P<method>get|post|put|delete|patch|head|options)\s*\(\s*['"`](?P<url>https?://[^'"`\s]+)"#,
    r#"\baxios\s*\(\s*\{[^}]*?\burl\s*:\s*['"`](?P<url>https?://[^'"`\s]+)"#,
    // requests / httpx
    r#"\b(?:requests|httpx|session|client)\.(?P<method>get|post|put|delete|patch|head|options)\s*\(\s*f?['"](?P<url>https?://[^'"\s]+)"#,
    // Go net/http
    r#"\bhttp\.(?P<method>Get|Post|Head)\s*\(\s*"(?P<url>https?://[^"\s]+)""#,
    r#"\bhttp\.NewRequest(?:WithContext)?\s*\([^)]*?"(?P<url>https?://[^"\s]+)""#,
    // HttpClient / RestTemplate / WebClient
    r#"\b(?:HttpClient|httpClient|RestTemplate|restTemplate|WebClient|webClient|client)\.(?P<method>get|post|put|delete|patch|getForObject|getForEntity|postForObject|postForEntity|exchange|GetAsync|PostAsync|PutAsync|DeleteAsync|GetStringAsync)\s*\(\s*(?:new\s+Uri\s*\(\s*)?@?['"](?P<url>https?://[^'"\s]+)"#,
    r#"\bURI\.create\s*\(\s*"(?P<url>https?://[^"\s]+)""#,
    r#"\bnew\s+URL\s*\(\s*"(?P<url>https?://[^"\s]+)""#,
    // PHP / Ruby
    r#"\bcurl_init\s*\(\s*['"](?P<url>https?://[^'"\s]+)"#,
    r#"\b(?:Net::HTTP|HTTParty|Faraday)\.(?P<method>get|post|put|delete|patch)\s*\(\s*(?:URI\s*\(\s*)?['"](?P<url>https?://[^'"\s]+)"#,
];

/// Absolute URL whose port is a template placeholder such as `${PORT}` or `{port}`.
pub const TEMPLATED_PORT: &str = r#"(?s)^(?P<head>[A-Za-z][A-Za-z0-9+.-]*://[^/?#]*?):[^/?#@\d][^/?#@]*(?P<tail>[/?#].*)?$"#;

/// Hosts never reported as external services.
pub const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0", "::1"];

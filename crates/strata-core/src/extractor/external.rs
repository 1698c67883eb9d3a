//! Outbound HTTP calls to remote hosts.

use regex::Regex;
use url::Url;

use super::text::{compile, compile_all, count_lines_before};
use crate::model::{ExternalApi, HttpMethod};
use crate::patterns::rules::{LOCAL_HOSTS, TEMPLATED_PORT};
use crate::patterns::EXTERNAL_CALL_PATTERNS;

pub struct ExternalExtractor {
    patterns: Vec<Regex>,
}

impl Default for ExternalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalExtractor {
    pub fn new() -> Self {
        Self {
            patterns: compile_all(EXTERNAL_CALL_PATTERNS.iter().copied()),
        }
    }

    /// Distinct hosts called from one file, first call first.
    pub fn extract(&self, rel: &str, content: &str) -> Vec<ExternalApi> {
        let mut calls: Vec<(usize, ExternalApi)> = Vec::new();

        for re in &self.patterns {
            for cap in re.captures_iter(content) {
                let (Some(whole), Some(url)) = (cap.get(0), cap.name("url")) else {
                    continue;
                };
                let Some((host, base_url)) = parse_base_url(url.as_str()) else {
                    continue;
                };
                calls.push((
                    whole.start(),
                    ExternalApi {
                        host,
                        base_url,
                        method: cap.name("method").and_then(|m| method_from_call(m.as_str())),
                        module: rel.to_string(),
                        line: count_lines_before(content, whole.start()),
                    },
                ));
            }
        }

        calls.sort_by_key(|(offset, _)| *offset);

        let mut found: Vec<ExternalApi> = Vec::new();
        for (_, api) in calls {
            if !found.iter().any(|f| f.host == api.host) {
                found.push(api);
            }
        }
        found
    }
}

/// HTTP method named by a client call: `get`, `GetAsync`, `postForObject`.
fn method_from_call(call: &str) -> Option<HttpMethod> {
    let call = call.to_ascii_lowercase();
    ["get", "post", "put", "delete", "patch", "head", "options"]
        .into_iter()
        .find(|m| call.starts_with(*m))
        .and_then(HttpMethod::parse)
}

/// Host and `scheme://host[:port]` of an absolute URL.
///
/// Userinfo is dropped and a default port omitted. A templated port is
/// dropped so the host still counts. Local hosts and templated hosts are
/// rejected.
pub fn parse_base_url(raw: &str) -> Option<(String, String)> {
    let parsed = match Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(url::ParseError::InvalidPort) => Url::parse(&without_port(raw)?).ok()?,
        Err(_) => return None,
    };

    let host_str = parsed.host_str()?;
    let host = host_str
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_lowercase();

    if host.is_empty()
        || host.contains(['$', '{', '}', '%'])
        || LOCAL_HOSTS.contains(&host.as_str())
    {
        return None;
    }

    let base_url = match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host_str, port),
        None => format!("{}://{}", parsed.scheme(), host_str),
    };
    Some((host, base_url))
}

fn without_port(raw: &str) -> Option<String> {
    let re = compile(TEMPLATED_PORT)?;
    if !re.is_match(raw) {
        return None;
    }
    Some(re.replace(raw, "${head}${tail}").into_owned())
}

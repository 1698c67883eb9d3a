//! Modules, classes and functions from source text.

use regex::{Captures, Regex};
use std::collections::HashSet;

use super::text::{
    comment_above, compile, count_lines_before, docstring_after, find_block_end, indent_of,
    line_starts, split_top_level, squash_whitespace, strip_generics,
};
use crate::model::{ClassKind, ClassLike, Function, Module};
use crate::patterns::{
    PatternFamily, VisibilityRule, HANDLER_MARKERS, MODEL_MARKERS, NON_FUNCTION_KEYWORDS,
    SERVICE_MARKERS,
};

struct CompiledImport {
    re: Regex,
    nested: Option<Regex>,
}

struct CompiledClass {
    re: Regex,
    kind: ClassKind,
    fields_in_body: bool,
}

struct CompiledAttribute {
    re: Regex,
    body_level_only: bool,
}

/// A class together with the 0-based line span of its block.
struct ClassSpan {
    class: ClassLike,
    start: usize,
    end: usize,
}

/// Code-structure extractor for one pattern family, compiled once.
pub struct CodeExtractor {
    family: PatternFamily,
    imports: Vec<CompiledImport>,
    classes: Vec<CompiledClass>,
    functions: Vec<Regex>,
    attributes: Vec<CompiledAttribute>,
    visibility: VisibilityRule,
    indentation_blocks: bool,
}

impl CodeExtractor {
    pub fn new(family: PatternFamily) -> Self {
        let table = family.code();

        let imports = table
            .imports
            .iter()
            .filter_map(|p| {
                let re = compile(p.regex)?;
                let nested = match p.nested {
                    Some(nested) => Some(compile(nested)?),
                    None => None,
                };
                Some(CompiledImport { re, nested })
            })
            .collect();

        let classes = table
            .classes
            .iter()
            .filter_map(|p| {
                Some(CompiledClass {
                    re: compile(p.regex)?,
                    kind: p.kind,
                    fields_in_body: p.fields_in_body,
                })
            })
            .collect();

        let attributes = table
            .attributes
            .iter()
            .filter_map(|p| {
                Some(CompiledAttribute {
                    re: compile(p.regex)?,
                    body_level_only: p.body_level_only,
                })
            })
            .collect();

        Self {
            family,
            imports,
            classes,
            functions: table.functions.iter().filter_map(|p| compile(p)).collect(),
            attributes,
            visibility: table.visibility,
            indentation_blocks: table.indentation_blocks,
        }
    }

    /// Build the module record for one file.
    pub fn extract(&self, rel: &str, content: &str, hash: impl Into<String>) -> Module {
        let lines: Vec<&str> = content.lines().collect();
        let starts = line_starts(content);

        let mut module = Module::new(rel, hash);
        module.imports = self.extract_imports(content);

        let spans = self.extract_classes(rel, content, &lines, &starts);
        module.functions = self.extract_functions(rel, content, &lines, &spans);
        module.classes = spans.into_iter().map(|span| span.class).collect();

        module
    }

    fn extract_imports(&self, content: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = Vec::new();

        for import in &self.imports {
            for cap in import.re.captures_iter(content) {
                match (&import.nested, cap.name("block")) {
                    (Some(nested), Some(block)) => {
                        for inner in nested.captures_iter(block.as_str()) {
                            if let Some(target) = inner.name("target") {
                                found.push((block.start() + target.start(), target.as_str().to_string()));
                            }
                        }
                    }
                    _ => {
                        if let Some(target) = cap.name("target") {
                            found.push((target.start(), target.as_str().to_string()));
                        }
                    }
                }
            }
        }

        found.sort_by_key(|(offset, _)| *offset);

        let mut seen = HashSet::new();
        found
            .into_iter()
            .map(|(_, target)| target.trim().to_string())
            .filter(|target| !target.trim_matches('.').is_empty())
            .filter(|target| seen.insert(target.clone()))
            .collect()
    }

    fn extract_classes(
        &self,
        rel: &str,
        content: &str,
        lines: &[&str],
        starts: &[usize],
    ) -> Vec<ClassSpan> {
        let mut spans: Vec<ClassSpan> = Vec::new();

        for pattern in &self.classes {
            for cap in pattern.re.captures_iter(content) {
                let (Some(whole), Some(name_match)) = (cap.get(0), cap.name("name")) else {
                    continue;
                };
                let name = name_match.as_str().to_string();
                let line = count_lines_before(content, name_match.start());
                if spans.iter().any(|s| s.class.name == name && s.class.line == line) {
                    continue;
                }

                let kind = match cap.name("kind").map(|k| k.as_str()) {
                    Some("interface") => ClassKind::Interface,
                    Some("struct") => ClassKind::Struct,
                    Some(_) => ClassKind::Class,
                    None => pattern.kind,
                };

                let mut parents = Vec::new();
                for group in ["parents", "ifaces"] {
                    if let Some(raw) = cap.name(group) {
                        parents.extend(parse_parents(raw.as_str()));
                    }
                }

                let start = line - 1;
                let end = find_block_end(lines, start, self.indentation_blocks)
                    .max(count_lines_before(content, whole.end()) - 1);

                let mut attributes = Vec::new();
                if pattern.fields_in_body {
                    if let Some(body) = cap.name("body") {
                        let (fields, embedded) = struct_fields(body.as_str());
                        attributes = fields;
                        parents.extend(embedded);
                    }
                } else {
                    let body_end = starts.get(end + 1).copied().unwrap_or(content.len());
                    let body_start = whole.end().min(body_end);
                    attributes = self.extract_attributes(&content[body_start..body_end], lines, start, end);
                }

                let class = ClassLike {
                    is_handler: has_marker(&name, &parents, HANDLER_MARKERS),
                    is_service: has_marker(&name, &parents, SERVICE_MARKERS),
                    is_model: has_marker(&name, &parents, MODEL_MARKERS),
                    name,
                    kind,
                    module: rel.to_string(),
                    line,
                    parents,
                    attributes,
                };
                spans.push(ClassSpan { class, start, end });
            }
        }

        spans.sort_by_key(|s| s.start);
        spans
    }

    fn extract_attributes(&self, body: &str, lines: &[&str], start: usize, end: usize) -> Vec<String> {
        let body_indent = lines
            .iter()
            .take(end + 1)
            .skip(start + 1)
            .find(|l| !l.trim().is_empty())
            .map(|l| indent_of(l));

        let mut seen = HashSet::new();
        let mut found: Vec<(usize, String)> = Vec::new();

        for pattern in &self.attributes {
            for cap in pattern.re.captures_iter(body) {
                let (Some(whole), Some(name)) = (cap.get(0), cap.name("name")) else {
                    continue;
                };
                if pattern.body_level_only && Some(indent_of(whole.as_str())) != body_indent {
                    continue;
                }
                let name = name.as_str();
                if NON_FUNCTION_KEYWORDS.contains(&name) {
                    continue;
                }
                if seen.insert(name.to_string()) {
                    found.push((name_offset(&cap), name.to_string()));
                }
            }
        }

        found.sort_by_key(|(offset, _)| *offset);
        found.into_iter().map(|(_, name)| name).collect()
    }

    fn extract_functions(
        &self,
        rel: &str,
        content: &str,
        lines: &[&str],
        spans: &[ClassSpan],
    ) -> Vec<Function> {
        let mut functions: Vec<Function> = Vec::new();

        for re in &self.functions {
            for cap in re.captures_iter(content) {
                let Some(name) = cap.name("name") else {
                    continue;
                };
                let name = name.as_str();
                if NON_FUNCTION_KEYWORDS.contains(&name) {
                    continue;
                }

                let line = count_lines_before(content, name_offset(&cap));
                if functions.iter().any(|f| f.name == name && f.line == line) {
                    continue;
                }
                let idx = line - 1;

                let receiver = cap.name("recv").map(|r| r.as_str().to_string());
                let enclosing = spans
                    .iter()
                    .filter(|s| s.start < idx && idx <= s.end)
                    .max_by_key(|s| s.start)
                    .map(|s| s.class.name.clone());

                // Indented declarations outside a class are locals or
                // object-literal members.
                let indented = lines.get(idx).map(|l| indent_of(l) > 0).unwrap_or(false);
                if !self.indentation_blocks && indented && receiver.is_none() && enclosing.is_none() {
                    continue;
                }

                let parameters = cap
                    .name("params")
                    .or_else(|| cap.name("single"))
                    .map(|p| parse_parameters(p.as_str(), self.family))
                    .unwrap_or_default();

                let vis = cap.name("vis").map(|v| v.as_str()).unwrap_or("");

                let description = comment_above(lines, idx).or_else(|| {
                    if self.indentation_blocks {
                        docstring_after(lines, idx)
                    } else {
                        None
                    }
                });

                functions.push(Function {
                    name: name.to_string(),
                    module: rel.to_string(),
                    line,
                    parameters,
                    is_public: self.is_public(name, vis),
                    parent: receiver.or(enclosing),
                    description,
                });
            }
        }

        functions.sort_by_key(|f| f.line);
        functions
    }

    fn is_public(&self, name: &str, vis: &str) -> bool {
        match self.visibility {
            VisibilityRule::Underscore => !name.starts_with('_'),
            VisibilityRule::Capitalized => name.chars().next().map(char::is_uppercase).unwrap_or(false),
            VisibilityRule::Keyword => vis.contains("public"),
            VisibilityRule::KeywordOrUnderscore => {
                !(vis.contains("private")
                    || vis.contains("protected")
                    || name.starts_with('_')
                    || name.starts_with('#'))
            }
        }
    }
}

/// Offset of the `name` group, falling back to the match start.
fn name_offset(cap: &Captures) -> usize {
    cap.name("name")
        .or_else(|| cap.get(0))
        .map(|m| m.start())
        .unwrap_or(0)
}

fn has_marker(name: &str, parents: &[String], markers: &[&str]) -> bool {
    std::iter::once(name)
        .chain(parents.iter().map(String::as_str))
        .any(|candidate| markers.iter().any(|m| candidate.contains(m)))
}

/// Parent / interface names from a raw list, generics and keyword arguments dropped.
fn parse_parents(raw: &str) -> Vec<String> {
    split_top_level(raw, ',')
        .into_iter()
        .filter(|p| !p.contains('='))
        .map(|p| strip_generics(&p))
        .map(|p| p.trim_start_matches('*').trim().to_string())
        .filter(|p| !p.is_empty() && p != "object")
        .collect()
}

/// Field names and embedded types of a Go struct body.
fn struct_fields(body: &str) -> (Vec<String>, Vec<String>) {
    let mut fields = Vec::new();
    let mut embedded = Vec::new();

    for line in body.lines() {
        let line = line.split("//").next().unwrap_or("").trim();
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => {}
            [single] => embedded.push(single.trim_start_matches('*').to_string()),
            [first, second, ..] if second.starts_with('`') => {
                embedded.push(first.trim_start_matches('*').to_string())
            }
            _ => {
                for token in &tokens {
                    let name = token.trim_end_matches(',');
                    if !name.is_empty() {
                        fields.push(name.to_string());
                    }
                    if !token.ends_with(',') {
                        break;
                    }
                }
            }
        }
    }

    (fields, embedded)
}

/// Best-effort parameter names from a raw parameter list.
fn parse_parameters(raw: &str, family: PatternFamily) -> Vec<String> {
    split_top_level(raw, ',')
        .into_iter()
        .filter_map(|param| parameter_name(&param, family))
        .collect()
}

fn parameter_name(raw: &str, family: PatternFamily) -> Option<String> {
    let raw = raw.trim();
    if raw.starts_with('{') || raw.starts_with('[') {
        return Some(squash_whitespace(raw));
    }

    let name = match family {
        PatternFamily::JavaScript | PatternFamily::Python => {
            let head = raw.split([':', '=']).next().unwrap_or(raw);
            head.split_whitespace().last().unwrap_or(head).trim_end_matches('?')
        }
        PatternFamily::Go => raw.split_whitespace().next().unwrap_or(raw),
        PatternFamily::Java | PatternFamily::Generic => {
            let head = raw.split('=').next().unwrap_or(raw).trim();
            head.split_whitespace().last().unwrap_or(head).trim_end_matches(':')
        }
    };

    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

//! Framework detection from dependency manifests.
//!
//! Each ecosystem is gated on its manifest: a missing manifest silently
//! contributes nothing, a malformed one contributes nothing plus a warning.

use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::ExtractError;
use crate::model::{ExtractionWarning, Framework};

/// Frameworks found across every manifest, plus recovered failures.
#[derive(Debug, Default)]
pub struct FrameworkScan {
    pub frameworks: BTreeSet<Framework>,
    pub warnings: Vec<ExtractionWarning>,
}

impl FrameworkScan {
    fn warn(&mut self, err: ExtractError) {
        tracing::warn!("{}", err);
        self.warnings.push(err.into_warning());
    }
}

/// Scan the manifests directly under `root`.
pub fn detect_frameworks(root: &Path) -> FrameworkScan {
    let mut scan = FrameworkScan::default();

    if let Some(content) = read_manifest(root, "package.json", &mut scan) {
        match node_frameworks(&content) {
            Ok(found) => scan.frameworks.extend(found),
            Err(message) => scan.warn(manifest_error("package.json", message)),
        }
    }

    if let Some(content) = read_manifest(root, "requirements.txt", &mut scan) {
        scan.frameworks
            .extend(python_frameworks(requirement_names(&content)));
    }

    if let Some(content) = read_manifest(root, "pyproject.toml", &mut scan) {
        match pyproject_names(&content) {
            Ok(names) => scan.frameworks.extend(python_frameworks(names)),
            Err(message) => scan.warn(manifest_error("pyproject.toml", message)),
        }
    }

    if let Some(content) = read_manifest(root, "pom.xml", &mut scan) {
        scan.frameworks.insert(Framework::Maven);
        scan.frameworks.extend(jvm_frameworks(&content));
    }

    for gradle in ["build.gradle", "build.gradle.kts"] {
        if let Some(content) = read_manifest(root, gradle, &mut scan) {
            scan.frameworks.insert(Framework::Gradle);
            scan.frameworks.extend(jvm_frameworks(&content));
        }
    }

    if let Some(content) = read_manifest(root, "go.mod", &mut scan) {
        scan.frameworks.extend(go_frameworks(&content));
    }

    if let Some(content) = read_manifest(root, "Gemfile", &mut scan) {
        scan.frameworks.extend(ruby_frameworks(&content));
    }

    if let Some(content) = read_manifest(root, "composer.json", &mut scan) {
        match php_frameworks(&content) {
            Ok(found) => scan.frameworks.extend(found),
            Err(message) => scan.warn(manifest_error("composer.json", message)),
        }
    }

    if root.join("schema.prisma").is_file() || root.join("prisma/schema.prisma").is_file() {
        scan.frameworks.insert(Framework::Prisma);
    }

    scan
}

fn read_manifest(root: &Path, name: &str, scan: &mut FrameworkScan) -> Option<String> {
    let path = root.join(name);
    if !path.is_file() {
        return None;
    }
    match std::fs::read(&path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(source) => {
            scan.warn(ExtractError::Read {
                path: name.to_string(),
                source,
            });
            None
        }
    }
}

fn manifest_error(path: &str, message: String) -> ExtractError {
    ExtractError::Manifest {
        path: path.to_string(),
        message,
    }
}

// =============================================================================
// NODE
// =============================================================================

fn node_frameworks(content: &str) -> Result<BTreeSet<Framework>, String> {
    let manifest: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

    let mut names = BTreeSet::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(deps) = manifest.get(section).and_then(|v| v.as_object()) {
            names.extend(deps.keys().cloned());
        }
    }

    let mut found = BTreeSet::new();
    for name in &names {
        let framework = match name.as_str() {
            "express" => Framework::Express,
            "fastify" => Framework::Fastify,
            "koa" => Framework::Koa,
            "@nestjs/core" | "@nestjs/common" => Framework::NestJS,
            "next" => Framework::NextJs,
            "react" => Framework::React,
            "vue" => Framework::Vue,
            "@angular/core" => Framework::Angular,
            "sequelize" => Framework::Sequelize,
            "mongoose" => Framework::Mongoose,
            "typeorm" => Framework::TypeORM,
            "prisma" | "@prisma/client" => Framework::Prisma,
            "@grpc/grpc-js" | "grpc" => Framework::Grpc,
            _ => continue,
        };
        found.insert(framework);
    }
    Ok(found)
}

// =============================================================================
// PYTHON
// =============================================================================

/// Distribution name of a PEP 508 requirement line, lower-cased.
fn requirement_name(line: &str) -> Option<String> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() || line.starts_with('-') {
        return None;
    }
    let end = line
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '.'))
        .unwrap_or(line.len());
    let name = &line[..end];
    if name.is_empty() {
        None
    } else {
        Some(name.to_lowercase())
    }
}

fn requirement_names(content: &str) -> Vec<String> {
    content.lines().filter_map(requirement_name).collect()
}

fn pyproject_names(content: &str) -> Result<Vec<String>, String> {
    let doc: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
    let mut names = Vec::new();

    if let Some(deps) = doc
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
    {
        names.extend(deps.iter().filter_map(|d| d.as_str()).filter_map(requirement_name));
    }

    if let Some(deps) = doc
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_table())
    {
        names.extend(deps.keys().map(|k| k.to_lowercase()));
    }

    Ok(names)
}

fn python_frameworks(names: Vec<String>) -> BTreeSet<Framework> {
    let mut found = BTreeSet::new();
    for name in names {
        if name.starts_with("django") {
            found.insert(Framework::Django);
        }
        if name.starts_with("flask") {
            found.insert(Framework::Flask);
        }
        if name == "fastapi" {
            found.insert(Framework::FastAPI);
        }
        if name.contains("sqlalchemy") {
            found.insert(Framework::SQLAlchemy);
        }
        if name.starts_with("grpcio") {
            found.insert(Framework::Grpc);
        }
    }
    found
}

// =============================================================================
// JVM / GO / RUBY / PHP
// =============================================================================

fn jvm_frameworks(content: &str) -> BTreeSet<Framework> {
    let mut found = BTreeSet::new();
    if content.contains("spring-boot") {
        found.insert(Framework::SpringBoot);
    }
    if content.contains("hibernate")
        || content.contains("persistence-api")
        || content.contains("spring-boot-starter-data-jpa")
    {
        found.insert(Framework::Jpa);
    }
    if content.contains("grpc") {
        found.insert(Framework::Grpc);
    }
    found
}

fn go_frameworks(content: &str) -> BTreeSet<Framework> {
    const MODULES: &[(&str, Framework)] = &[
        ("github.com/gin-gonic/gin", Framework::Gin),
        ("github.com/labstack/echo", Framework::Echo),
        ("github.com/go-chi/chi", Framework::Chi),
        ("github.com/gofiber/fiber", Framework::Fiber),
        ("gorm.io/gorm", Framework::Gorm),
        ("github.com/jinzhu/gorm", Framework::Gorm),
        ("google.golang.org/grpc", Framework::Grpc),
    ];

    MODULES
        .iter()
        .filter(|(module, _)| content.contains(module))
        .map(|(_, framework)| *framework)
        .collect()
}

fn ruby_frameworks(content: &str) -> BTreeSet<Framework> {
    let mut found = BTreeSet::new();
    let re = match Regex::new(r#"(?m)^\s*gem\s+['"](?P<name>[\w-]+)['"]"#) {
        Ok(re) => re,
        Err(_) => return found,
    };
    for cap in re.captures_iter(content) {
        match cap.name("name").map(|m| m.as_str()) {
            Some("rails") => {
                found.insert(Framework::Rails);
            }
            Some("sinatra") => {
                found.insert(Framework::Sinatra);
            }
            _ => {}
        }
    }
    found
}

fn php_frameworks(content: &str) -> Result<BTreeSet<Framework>, String> {
    let manifest: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let mut found = BTreeSet::new();
    for section in ["require", "require-dev"] {
        if let Some(deps) = manifest.get(section).and_then(|v| v.as_object()) {
            for name in deps.keys() {
                if name == "laravel/framework" {
                    found.insert(Framework::Laravel);
                }
                if name.starts_with("symfony/") {
                    found.insert(Framework::Symfony);
                }
            }
        }
    }
    Ok(found)
}

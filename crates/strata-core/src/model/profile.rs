//! Repository-level classification: language, frameworks, architecture, license.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// LANGUAGE
// =============================================================================

/// Dominant programming language of a repository.
///
/// Declaration order is the tie-break priority used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    Go,
    CSharp,
    Php,
    Ruby,
    Unknown,
}

impl Language {
    /// Languages in tie-break priority order (earlier wins).
    pub const PRIORITY: [Language; 8] = [
        Language::JavaScript,
        Language::TypeScript,
        Language::Python,
        Language::Java,
        Language::Go,
        Language::CSharp,
        Language::Php,
        Language::Ruby,
    ];

    /// Extensions that count towards this language during detection.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Self::TypeScript => &["ts", "tsx"],
            Self::Python => &["py"],
            Self::Java => &["java"],
            Self::Go => &["go"],
            Self::CSharp => &["cs"],
            Self::Php => &["php"],
            Self::Ruby => &["rb"],
            Self::Unknown => &[],
        }
    }

    /// Extensions scanned once this language is dominant.
    ///
    /// JavaScript and TypeScript projects routinely mix both families.
    pub fn scan_extensions(&self) -> Vec<&'static str> {
        match self {
            Self::JavaScript | Self::TypeScript => {
                let mut exts = Self::JavaScript.extensions().to_vec();
                exts.extend_from_slice(Self::TypeScript.extensions());
                exts
            }
            other => other.extensions().to_vec(),
        }
    }

    /// Detect a language from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        Self::PRIORITY
            .iter()
            .copied()
            .find(|lang| lang.extensions().contains(&ext.as_str()))
    }

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Go => "go",
            Self::CSharp => "csharp",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// FRAMEWORK
// =============================================================================

/// A framework, ORM, RPC system or build tool detected from a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Framework {
    // Node
    #[serde(rename = "Express.js")]
    Express,
    Fastify,
    Koa,
    NestJS,
    #[serde(rename = "Next.js")]
    NextJs,
    React,
    #[serde(rename = "Vue.js")]
    Vue,
    Angular,
    Sequelize,
    Mongoose,
    TypeORM,
    Prisma,
    // Python
    Django,
    Flask,
    FastAPI,
    SQLAlchemy,
    // JVM
    Maven,
    Gradle,
    #[serde(rename = "Spring Boot")]
    SpringBoot,
    #[serde(rename = "Hibernate/JPA")]
    Jpa,
    // Go
    Gin,
    Echo,
    Chi,
    Fiber,
    #[serde(rename = "GORM")]
    Gorm,
    // Ruby / PHP
    Rails,
    Sinatra,
    Laravel,
    Symfony,
    // RPC
    #[serde(rename = "gRPC")]
    Grpc,
}

impl Framework {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Express => "Express.js",
            Self::Fastify => "Fastify",
            Self::Koa => "Koa",
            Self::NestJS => "NestJS",
            Self::NextJs => "Next.js",
            Self::React => "React",
            Self::Vue => "Vue.js",
            Self::Angular => "Angular",
            Self::Sequelize => "Sequelize",
            Self::Mongoose => "Mongoose",
            Self::TypeORM => "TypeORM",
            Self::Prisma => "Prisma",
            Self::Django => "Django",
            Self::Flask => "Flask",
            Self::FastAPI => "FastAPI",
            Self::SQLAlchemy => "SQLAlchemy",
            Self::Maven => "Maven",
            Self::Gradle => "Gradle",
            Self::SpringBoot => "Spring Boot",
            Self::Jpa => "Hibernate/JPA",
            Self::Gin => "Gin",
            Self::Echo => "Echo",
            Self::Chi => "Chi",
            Self::Fiber => "Fiber",
            Self::Gorm => "GORM",
            Self::Rails => "Rails",
            Self::Sinatra => "Sinatra",
            Self::Laravel => "Laravel",
            Self::Symfony => "Symfony",
            Self::Grpc => "gRPC",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ARCHITECTURE
// =============================================================================

/// Architecture style inferred from top-level directory names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchitectureStyle {
    #[serde(rename = "MVC/MVVM with Repository Pattern")]
    LayeredWithRepository,
    #[serde(rename = "MVC/MVVM")]
    Mvc,
    #[serde(rename = "Controller-based")]
    ControllerBased,
    #[serde(rename = "Service-oriented")]
    ServiceOriented,
    #[serde(rename = "Component-based (likely frontend)")]
    ComponentBased,
    #[serde(rename = "Standard src layout")]
    StandardSrcLayout,
    #[serde(rename = "Unknown/Custom")]
    Unknown,
}

impl ArchitectureStyle {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LayeredWithRepository => "MVC/MVVM with Repository Pattern",
            Self::Mvc => "MVC/MVVM",
            Self::ControllerBased => "Controller-based",
            Self::ServiceOriented => "Service-oriented",
            Self::ComponentBased => "Component-based (likely frontend)",
            Self::StandardSrcLayout => "Standard src layout",
            Self::Unknown => "Unknown/Custom",
        }
    }
}

// =============================================================================
// LICENSE
// =============================================================================

/// License family recognised from a license file or README.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseKind {
    #[serde(rename = "MIT")]
    Mit,
    #[serde(rename = "Apache-2.0")]
    Apache2,
    #[serde(rename = "GPL-3.0")]
    Gpl3,
    #[serde(rename = "GPL-2.0")]
    Gpl2,
    #[serde(rename = "BSD-3-Clause")]
    Bsd3Clause,
    #[serde(rename = "ISC")]
    Isc,
    Proprietary,
    Unknown,
}

impl LicenseKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mit => "MIT",
            Self::Apache2 => "Apache-2.0",
            Self::Gpl3 => "GPL-3.0",
            Self::Gpl2 => "GPL-2.0",
            Self::Bsd3Clause => "BSD-3-Clause",
            Self::Isc => "ISC",
            Self::Proprietary => "Proprietary",
            Self::Unknown => "Unknown",
        }
    }

    /// One-line usage terms.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Mit => "Commercial use, modification and distribution allowed; keep the copyright notice.",
            Self::Apache2 => "Commercial use, modification and distribution allowed with an explicit patent grant; keep the notice and license text.",
            Self::Gpl3 | Self::Gpl2 => "Commercial use and modification allowed; derived work must be released under the same license.",
            Self::Bsd3Clause => "Commercial use, modification and distribution allowed; the authors' names may not endorse derived products.",
            Self::Isc => "Permissive like MIT; keep the copyright notice.",
            Self::Proprietary => "Proprietary terms may restrict use, modification or distribution; review them.",
            Self::Unknown => "License terms not recognised; review them manually.",
        }
    }
}

impl fmt::Display for LicenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How strongly the evidence supports the detected license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// License evidence found at the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub kind: LicenseKind,
    pub confidence: Confidence,

    /// License file the kind was read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// README text naming the license when no license file exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_mention: Option<String>,
}

// =============================================================================
// PROFILE
// =============================================================================

/// Result of the classifier phase. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryProfile {
    /// Repository directory name.
    pub name: String,

    /// Dominant language, or `unknown` when no source files matched.
    pub language: Language,

    /// Frameworks found in dependency manifests.
    pub frameworks: BTreeSet<Framework>,

    /// Architecture style from directory layout.
    pub architecture: ArchitectureStyle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("TSX"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("cjs"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("xyz"), None);
    }

    #[test]
    fn test_js_family_scans_both_extension_sets() {
        let exts = Language::TypeScript.scan_extensions();
        assert!(exts.contains(&"js"));
        assert!(exts.contains(&"ts"));
        assert_eq!(Language::Go.scan_extensions(), vec!["go"]);
        assert!(Language::Unknown.scan_extensions().is_empty());
    }

    #[test]
    fn test_framework_serializes_display_name() {
        let json = serde_json::to_string(&Framework::SpringBoot).unwrap();
        assert_eq!(json, "\"Spring Boot\"");
        assert_eq!(Framework::Express.to_string(), "Express.js");
    }
}

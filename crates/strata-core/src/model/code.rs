//! Code structure records: modules, functions, classes, rule candidates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// MODULE
// =============================================================================

/// A source file. Identified by its repository-relative path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Repository-relative path using `/` separators (unique key).
    pub path: String,

    /// SHA256 of the decoded file content.
    pub hash: String,

    /// Functions and methods in declaration order.
    pub functions: Vec<Function>,

    /// Classes, structs and interfaces in declaration order.
    pub classes: Vec<ClassLike>,

    /// Raw import targets, unresolved.
    pub imports: Vec<String>,

    /// Paths of other modules this one depends on, filled by the aggregator.
    pub dependencies: BTreeSet<String>,
}

impl Module {
    pub fn new(path: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hash: hash.into(),
            functions: Vec::new(),
            classes: Vec::new(),
            imports: Vec::new(),
            dependencies: BTreeSet::new(),
        }
    }
}

// =============================================================================
// FUNCTION
// =============================================================================

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,

    /// Path of the declaring module.
    pub module: String,

    /// 1-based line of the declaration.
    pub line: usize,

    /// Parameter text as written; may be empty or imprecise for complex signatures.
    pub parameters: Vec<String>,

    pub is_public: bool,

    /// Enclosing class or receiver type, when one could be determined.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<String>,

    /// Comment or docstring attached to the declaration.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

// =============================================================================
// CLASS
// =============================================================================

/// Kind of class-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Class,
    Struct,
    Interface,
}

/// A class, struct, interface or model declaration.
///
/// The three role flags are independent. A class may be a handler, a service
/// and a model at once; no precedence is applied here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLike {
    pub name: String,

    pub kind: ClassKind,

    /// Path of the declaring module.
    pub module: String,

    /// 1-based line of the declaration.
    pub line: usize,

    /// Parent classes and implemented interfaces, unresolved.
    pub parents: Vec<String>,

    /// Attribute / field names.
    pub attributes: Vec<String>,

    pub is_handler: bool,
    pub is_service: bool,
    pub is_model: bool,
}

// =============================================================================
// BUSINESS RULE CANDIDATE
// =============================================================================

/// Category of a business-rule candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Validation,
    Calculation,
    Authorization,
    Conditional,
}

impl RuleCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Calculation => "calculation",
            Self::Authorization => "authorization",
            Self::Conditional => "conditional",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Validation => "Validation",
            Self::Calculation => "Calculation",
            Self::Authorization => "Authorization",
            Self::Conditional => "Conditional",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A snippet that matched a rule pattern. Carries no claim of correctness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRuleCandidate {
    pub category: RuleCategory,

    /// Path of the module the snippet came from.
    pub module: String,

    /// 1-based line of the match start.
    pub line: usize,

    /// Context window around the match.
    pub snippet: String,
}

impl BusinessRuleCandidate {
    /// `path:line` location string.
    pub fn location(&self) -> String {
        format!("{}:{}", self.module, self.line)
    }
}

//! Code structure patterns per language family.
//!
//! Patterns use named groups so one construction rule serves every language:
//! `target` (import), `name`, `parents`, `ifaces`, `kind`, `body`,
//! `params`, `single`, `recv`, `vis`.

use crate::model::ClassKind;

/// How a declaration's visibility is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityRule {
    /// A leading underscore means private.
    Underscore,
    /// A capitalised first letter means public.
    Capitalized,
    /// An explicit `public` modifier means public.
    Keyword,
    /// `export`/`public` means public, `private`/`#`/`_` means private, default public.
    KeywordOrUnderscore,
}

/// An import pattern. When `nested` is set it is applied inside the `block` group.
#[derive(Debug, Clone, Copy)]
pub struct ImportPattern {
    pub regex: &'static str,
    pub nested: Option<&'static str>,
}

/// A class-like declaration pattern.
#[derive(Debug, Clone, Copy)]
pub struct ClassPattern {
    pub regex: &'static str,
    /// Kind used when the pattern has no `kind` group.
    pub kind: ClassKind,
    /// The `body` group holds Go-style `name Type` field lines.
    pub fields_in_body: bool,
}

/// An attribute pattern applied inside a class block.
#[derive(Debug, Clone, Copy)]
pub struct AttributePattern {
    pub regex: &'static str,
    /// Only accept matches indented exactly at the class body level.
    pub body_level_only: bool,
}

/// Immutable code-structure pattern table for one language family.
#[derive(Debug, Clone, Copy)]
pub struct CodePatterns {
    pub imports: &'static [ImportPattern],
    pub classes: &'static [ClassPattern],
    pub functions: &'static [&'static str],
    pub attributes: &'static [AttributePattern],
    pub visibility: VisibilityRule,
    /// Python-style blocks end by indentation rather than braces.
    pub indentation_blocks: bool,
}

// =============================================================================
// JAVASCRIPT / TYPESCRIPT
// =============================================================================

pub const JS_CODE: CodePatterns = CodePatterns {
    imports: &[
        ImportPattern {
            regex: r#"(?m)^\s*import\s+(?:type\s+)?[\w*{}\s,$]+?\s+from\s+['"](?P<target>[^'"]+)['"]"#,
            nested: None,
        },
        ImportPattern {
            regex: r#"(?m)^\s*import\s+['"](?P<target>[^'"]+)['"]"#,
            nested: None,
        },
        ImportPattern {
            regex: r#"\brequire\s*\(\s*['"](?P<target>[^'"]+)['"]\s*\)"#,
            nested: None,
        },
        ImportPattern {
            regex: r#"\bimport\s*\(\s*['"](?P<target>[^'"]+)['"]\s*\)"#,
            nested: None,
        },
    ],
    classes: &[
        ClassPattern {
            regex: r#"(?m)^[ \t]*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+(?P<name>[A-Za-z_$][\w$]*)(?:\s*<[^>{]*>)?(?:\s+extends\s+(?P<parents>[\w$.]+)(?:\s*<[^>{]*>)?)?(?:\s+implements\s+(?P<ifaces>[\w$.,\s<>]+?))?\s*\{"#,
            kind: ClassKind::Class,
            fields_in_body: false,
        },
        ClassPattern {
            regex: r#"(?m)^[ \t]*(?:export\s+)?interface\s+(?P<name>[A-Za-z_$][\w$]*)(?:\s*<[^>{]*>)?(?:\s+extends\s+(?P<parents>[\w$.,\s<>]+?))?\s*\{"#,
            kind: ClassKind::Interface,
            fields_in_body: false,
        },
    ],
    functions: &[
        r#"(?m)^[ \t]*(?P<vis>export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)\s*(?:<[^>(]*>)?\s*\((?P<params>(?:[^()]|\([^()]*\))*)\)"#,
        r#"(?m)^[ \t]*(?P<vis>export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?::[^=\n]+)?=\s*(?:async\s+)?(?:\((?P<params>[^)]*)\)|(?P<single>[A-Za-z_$][\w$]*))\s*(?::[^=\n]+)?=>"#,
        r#"(?m)^[ \t]+(?P<vis>(?:(?:public|private|protected|static|async|override|readonly)\s+)*)(?P<name>#?[A-Za-z_$][\w$]*)\s*\((?P<params>(?:[^()]|\([^()]*\))*)\)\s*(?::\s*[^{;\n]+)?\{"#,
    ],
    attributes: &[
        AttributePattern {
            regex: r#"(?m)^[ \t]+(?:(?:public|private|protected|readonly|static|declare)\s+)*(?P<name>#?[A-Za-z_$][\w$]*)[?!]?\s*(?::\s*[^;=(\n]+)?(?:=[^;\n]*)?;"#,
            body_level_only: true,
        },
        AttributePattern {
            regex: r#"\bthis\.(?P<name>[A-Za-z_$][\w$]*)\s*=[^=]"#,
            body_level_only: false,
        },
    ],
    visibility: VisibilityRule::KeywordOrUnderscore,
    indentation_blocks: false,
};

// =============================================================================
// PYTHON
// =============================================================================

pub const PYTHON_CODE: CodePatterns = CodePatterns {
    imports: &[
        ImportPattern {
            regex: r#"(?m)^[ \t]*import\s+(?P<target>[\w.]+)"#,
            nested: None,
        },
        ImportPattern {
            regex: r#"(?m)^[ \t]*from\s+(?P<target>\.*[\w.]*)\s+import\b"#,
            nested: None,
        },
    ],
    classes: &[ClassPattern {
        regex: r#"(?m)^[ \t]*class\s+(?P<name>\w+)\s*(?:\((?P<parents>[^)]*)\))?\s*:"#,
        kind: ClassKind::Class,
        fields_in_body: false,
    }],
    functions: &[r#"(?m)^[ \t]*(?:async\s+)?def\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)"#],
    attributes: &[
        AttributePattern {
            regex: r#"\bself\.(?P<name>\w+)\s*(?::[^=\n]+)?=[^=]"#,
            body_level_only: false,
        },
        AttributePattern {
            regex: r#"(?m)^[ \t]+(?P<name>[A-Za-z_]\w*)\s*(?::\s*[^=\n]+)?=[^=\n]"#,
            body_level_only: true,
        },
        AttributePattern {
            regex: r#"(?m)^[ \t]+(?P<name>[A-Za-z_]\w*)\s*:\s*[\w\[\]., |]+\s*$"#,
            body_level_only: true,
        },
    ],
    visibility: VisibilityRule::Underscore,
    indentation_blocks: true,
};

// =============================================================================
// JAVA
// =============================================================================

pub const JAVA_CODE: CodePatterns = CodePatterns {
    imports: &[ImportPattern {
        regex: r#"(?m)^\s*import\s+(?:static\s+)?(?P<target>[\w.]+(?:\.\*)?)\s*;"#,
        nested: None,
    }],
    classes: &[ClassPattern {
        regex: r#"(?m)^[ \t]*(?:(?:public|protected|private|abstract|final|static|sealed|non-sealed)\s+)*(?P<kind>class|interface|record|enum)\s+(?P<name>\w+)(?:\s*<[^>{]*>)?(?:\s*\([^)]*\))?(?:\s+extends\s+(?P<parents>[\w.<>,\s]+?))?(?:\s+implements\s+(?P<ifaces>[\w.<>,\s]+?))?\s*\{"#,
        kind: ClassKind::Class,
        fields_in_body: false,
    }],
    functions: &[
        r#"(?m)^[ \t]*(?P<vis>(?:(?:public|private|protected|static|final|abstract|synchronized|native|default)\s+)*)(?:<[^>]+>\s+)?(?:[\w.<>\[\],?]+\s+)?(?P<name>\w+)\s*\((?P<params>(?:[^()]|\([^()]*\))*)\)\s*(?:throws\s+[\w.,\s]+)?\{"#,
    ],
    attributes: &[AttributePattern {
        regex: r#"(?m)^[ \t]+(?:(?:private|protected|public|static|final|transient|volatile)\s+)+[\w.<>\[\],?\s]+?\s+(?P<name>\w+)\s*(?:=[^;]*)?;"#,
        body_level_only: false,
    }],
    visibility: VisibilityRule::Keyword,
    indentation_blocks: false,
};

// =============================================================================
// GO
// =============================================================================

pub const GO_CODE: CodePatterns = CodePatterns {
    imports: &[
        ImportPattern {
            regex: r#"(?s)\bimport\s*\((?P<block>.*?)\)"#,
            nested: Some(r#""(?P<target>[^"]+)""#),
        },
        ImportPattern {
            regex: r#"(?m)^\s*import\s+(?:[\w.]+\s+)?"(?P<target>[^"]+)""#,
            nested: None,
        },
    ],
    classes: &[
        ClassPattern {
            regex: r#"(?m)^[ \t]*type\s+(?P<name>\w+)(?:\[[^\]]*\])?\s+struct\s*\{(?P<body>[^}]*)\}"#,
            kind: ClassKind::Struct,
            fields_in_body: true,
        },
        ClassPattern {
            regex: r#"(?m)^[ \t]*type\s+(?P<name>\w+)(?:\[[^\]]*\])?\s+interface\s*\{"#,
            kind: ClassKind::Interface,
            fields_in_body: false,
        },
    ],
    functions: &[
        r#"(?m)^func\s*(?:\(\s*(?:\w+\s+)?\*?\s*(?P<recv>\w+)(?:\[[^\]]*\])?\s*\)\s*)?(?P<name>\w+)\s*(?:\[[^\]]*\])?\s*\((?P<params>[^)]*)\)"#,
    ],
    attributes: &[],
    visibility: VisibilityRule::Capitalized,
    indentation_blocks: false,
};

// =============================================================================
// GENERIC (C#, PHP, Ruby, unknown)
// =============================================================================

pub const GENERIC_CODE: CodePatterns = CodePatterns {
    imports: &[
        ImportPattern {
            regex: r#"(?m)^\s*using\s+(?:static\s+)?(?P<target>[\w.]+)\s*;"#,
            nested: None,
        },
        ImportPattern {
            regex: r#"(?m)^\s*use\s+(?P<target>[\w\\]+)"#,
            nested: None,
        },
        ImportPattern {
            regex: r#"(?m)^\s*(?:require|require_relative|include|require_once|include_once)\s*\(?\s*['"](?P<target>[^'"]+)['"]"#,
            nested: None,
        },
        ImportPattern {
            regex: r#"(?m)^\s*import\s+(?P<target>[\w.]+)"#,
            nested: None,
        },
    ],
    classes: &[ClassPattern {
        regex: r#"(?m)^[ \t]*(?:(?:public|private|protected|internal|abstract|sealed|static|partial|final|readonly)\s+)*(?P<kind>class|struct|interface|record)\s+(?P<name>\w+)(?:\s*<[^>{:\n]*>)?(?:\s*(?:<|:|extends)\s*(?P<parents>[\w.:\\, ]+?))?(?:\s+implements\s+(?P<ifaces>[\w\\, ]+?))?\s*(?:\{|$)"#,
        kind: ClassKind::Class,
        fields_in_body: false,
    }],
    functions: &[
        r#"(?m)^[ \t]*(?P<vis>(?:(?:public|private|protected|internal|static|async|virtual|override|abstract)\s+)*)(?:def|function|func|fn)\s+(?:self\.)?(?P<name>[A-Za-z_]\w*[?!]?)\s*(?:\((?P<params>[^)]*)\))?"#,
        r#"(?m)^[ \t]*(?P<vis>(?:(?:public|private|protected|internal|static|async|virtual|override|abstract)\s+)+)[\w<>\[\],.?]+\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*\{?\s*$"#,
    ],
    attributes: &[],
    visibility: VisibilityRule::KeywordOrUnderscore,
    indentation_blocks: false,
};

// =============================================================================
// SHARED
// =============================================================================

/// Identifiers that look like declarations but are control flow or operators.
pub const NON_FUNCTION_KEYWORDS: &[&str] = &[
    "if", "for", "foreach", "while", "switch", "match", "catch", "return", "new", "else",
    "elif", "try", "do", "with", "synchronized", "function", "constructor", "super", "this",
    "typeof", "await", "yield", "throw", "using", "lock", "fixed", "when",
];

/// Name substrings that flag a class as a request handler.
pub const HANDLER_MARKERS: &[&str] = &["Controller", "Handler", "View", "Resource"];

/// Name substrings that flag a class as a service / business-logic unit.
pub const SERVICE_MARKERS: &[&str] = &["Service", "Manager"];

/// Name substrings that flag a class as a data model.
pub const MODEL_MARKERS: &[&str] = &["Model", "Entity"];

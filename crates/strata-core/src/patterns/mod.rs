//! Pattern library: immutable per-language and per-framework text patterns.
//!
//! Pure data. Compilation and record construction live in [`crate::extractor`].

pub mod code;
pub mod license;
pub mod routes;
pub mod rules;
pub mod schema;

pub use code::{
    AttributePattern, ClassPattern, CodePatterns, ImportPattern, VisibilityRule, HANDLER_MARKERS,
    MODEL_MARKERS, NON_FUNCTION_KEYWORDS, SERVICE_MARKERS,
};
pub use routes::{PrefixPattern, RouteFramework, RoutePattern, ROUTE_PATTERNS};
pub use rules::{RulePattern, EXTERNAL_CALL_PATTERNS, RULE_PATTERNS};
pub use schema::OrmFramework;

use crate::model::Language;

/// Pattern family selected for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFamily {
    JavaScript,
    Python,
    Java,
    Go,
    /// Cross-language fallback for csharp, php, ruby and unknown repositories.
    Generic,
}

impl PatternFamily {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::JavaScript | Language::TypeScript => Self::JavaScript,
            Language::Python => Self::Python,
            Language::Java => Self::Java,
            Language::Go => Self::Go,
            Language::CSharp | Language::Php | Language::Ruby | Language::Unknown => Self::Generic,
        }
    }

    /// Code-structure table for this family.
    pub fn code(&self) -> &'static CodePatterns {
        match self {
            Self::JavaScript => &code::JS_CODE,
            Self::Python => &code::PYTHON_CODE,
            Self::Java => &code::JAVA_CODE,
            Self::Go => &code::GO_CODE,
            Self::Generic => &code::GENERIC_CODE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn compiles(pattern: &str) {
        assert!(Regex::new(pattern).is_ok(), "pattern failed to compile: {}", pattern);
    }

    #[test]
    fn test_every_code_pattern_compiles() {
        for family in [
            PatternFamily::JavaScript,
            PatternFamily::Python,
            PatternFamily::Java,
            PatternFamily::Go,
            PatternFamily::Generic,
        ] {
            let table = family.code();
            for import in table.imports {
                compiles(import.regex);
                if let Some(nested) = import.nested {
                    compiles(nested);
                }
            }
            for class in table.classes {
                compiles(class.regex);
            }
            for function in table.functions {
                compiles(function);
            }
            for attribute in table.attributes {
                compiles(attribute.regex);
            }
        }
    }

    #[test]
    fn test_every_route_and_rule_pattern_compiles() {
        for route in ROUTE_PATTERNS {
            compiles(route.regex);
        }
        for prefix in routes::PREFIX_PATTERNS {
            compiles(prefix.regex);
        }
        for rule in RULE_PATTERNS {
            compiles(rule.regex);
        }
        for call in EXTERNAL_CALL_PATTERNS {
            compiles(call);
        }
        compiles(routes::CLASS_DECLARATION);
        compiles(routes::QUOTED_METHOD);
        compiles(rules::TEMPLATED_PORT);
    }

    #[test]
    fn test_every_license_pattern_compiles() {
        for pattern in license::LICENSE_TEXT_PATTERNS.iter().chain(license::LICENSE_NAME_PATTERNS) {
            compiles(pattern.regex);
        }
        compiles(license::PROPRIETARY_MARKERS);
        compiles(license::README_LICENSE_MENTION);
    }

    #[test]
    fn test_every_schema_pattern_compiles() {
        for pattern in [
            schema::SQL_CREATE_TABLE,
            schema::SQL_COLUMN,
            schema::SQL_PRIMARY_KEY,
            schema::SQL_FOREIGN_KEY,
            schema::SQL_INLINE_REFERENCES,
            schema::SQL_DEFAULT,
            schema::SQL_NOT_NULL,
            schema::SQL_INLINE_PRIMARY,
            schema::SQL_ALTER_FOREIGN_KEY,
            schema::SQL_CONSTRAINT_ITEM,
            schema::SQL_NAMED_INDEX,
            schema::PRISMA_MODEL,
            schema::PRISMA_FIELD,
            schema::PRISMA_DEFAULT,
            schema::PRISMA_DB_LENGTH,
            schema::PRISMA_RELATION,
            schema::PRISMA_RELATION_FIELDS,
            schema::PRISMA_RELATION_REFERENCES,
            schema::PRISMA_COMPOSITE_ID,
            schema::PRISMA_MAP,
            schema::DJANGO_MODEL,
            schema::DJANGO_FIELD,
            schema::DJANGO_DB_TABLE,
            schema::SQLALCHEMY_MODEL,
            schema::SQLALCHEMY_TABLENAME,
            schema::SQLALCHEMY_COLUMN,
            schema::SQLALCHEMY_RELATIONSHIP,
            schema::SQLALCHEMY_FOREIGN_KEY,
            schema::SEQUELIZE_DEFINE,
            schema::SEQUELIZE_INIT,
            schema::SEQUELIZE_TABLE_NAME,
            schema::SEQUELIZE_FIELD,
            schema::SEQUELIZE_ASSOCIATION,
            schema::MONGOOSE_SCHEMA,
            schema::MONGOOSE_MODEL,
            schema::MONGOOSE_FIELD,
            schema::MONGOOSE_REF,
            schema::TYPEORM_ENTITY,
            schema::TYPEORM_COLUMN,
            schema::TYPEORM_RELATION,
            schema::JPA_ENTITY,
            schema::JPA_TABLE_NAME,
            schema::JPA_FIELD,
            schema::JPA_RELATION,
            schema::GORM_MODEL,
            schema::GORM_TABLE_NAME,
        ] {
            compiles(pattern);
        }
    }

    #[test]
    fn test_unknown_language_uses_generic_family() {
        assert_eq!(PatternFamily::for_language(Language::Unknown), PatternFamily::Generic);
        assert_eq!(PatternFamily::for_language(Language::TypeScript), PatternFamily::JavaScript);
        assert!(!RouteFramework::for_language(Language::Unknown).is_empty());
    }
}

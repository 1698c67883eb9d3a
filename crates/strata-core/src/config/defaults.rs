//! Default values for Strata configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Walk Defaults
// ============================================================================

/// Maximum size of a single file to extract from (1 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Directories excluded from every walk, matched by name at any depth.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Dependencies
    "node_modules",
    "bower_components",
    "vendor",
    "venv",
    ".venv",
    "env",
    "site-packages",
    "__pycache__",
    ".pytest_cache",
    ".tox",
    ".gradle",
    ".m2",
    // Build outputs
    "target",
    "build",
    "dist",
    "out",
    "bin",
    "obj",
    ".next",
    ".nuxt",
    // IDE/Editor
    ".idea",
    ".vscode",
    ".vs",
    // Other common excludes
    "coverage",
    ".cache",
];

/// File names recognised as machine-readable API specifications.
pub const DEFAULT_SPEC_FILE_NAMES: &[&str] = &[
    "openapi.yaml",
    "openapi.yml",
    "openapi.json",
    "swagger.yaml",
    "swagger.yml",
    "swagger.json",
    "api.json",
];

// ============================================================================
// Extraction Defaults
// ============================================================================

/// Characters of context kept on each side of a business-rule match.
pub const DEFAULT_CONTEXT_WINDOW: usize = 50;

/// Upper bound on business-rule candidates recorded per file.
pub const DEFAULT_MAX_RULES_PER_FILE: usize = 50;

// ============================================================================
// Output Defaults
// ============================================================================

/// Default output directory for generated artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "./srs_analysis";

/// Code structure JSON dump.
pub const CODE_ANALYSIS_FILE: &str = "code_analysis.json";

/// Database JSON dump.
pub const DATABASE_ANALYSIS_FILE: &str = "database_analysis.json";

/// API discovery JSON dump.
pub const API_ANALYSIS_FILE: &str = "api_analysis.json";

/// Markdown structure report.
pub const STRUCTURE_REPORT_FILE: &str = "code_structure_analysis.md";

/// Markdown data dictionary.
pub const DATA_DICTIONARY_FILE: &str = "data_dictionary.md";

/// Mermaid entity-relationship diagram.
pub const ERD_FILE: &str = "erd.md";

/// Markdown API documentation.
pub const API_DOC_FILE: &str = "api_documentation.md";

/// Stitched requirements document.
pub const REQUIREMENTS_FILE: &str = "requirements.md";

// ============================================================================
// Config Locations
// ============================================================================

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "strata.toml";

/// Directory under the user config dir.
pub const USER_CONFIG_DIR: &str = "strata";

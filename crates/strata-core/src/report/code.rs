use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{cell, not_detected};
use crate::aggregate::RepositoryModel;
use crate::model::{
    BusinessRuleCandidate, ClassLike, ExtractionWarning, License, Module, RepositoryProfile, RuleCategory,
};

/// Entries listed per component or rule heading before truncating.
const LIST_LIMIT: usize = 10;

/// Counts shown in the report overview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSummary {
    pub modules: usize,
    pub functions: usize,
    pub classes: usize,
    pub handlers: usize,
    pub services: usize,
    pub models: usize,
    pub business_rules: usize,
}

/// Contents of `code_analysis.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeAnalysis {
    pub profile: RepositoryProfile,
    pub summary: CodeSummary,
    pub modules: Vec<Module>,
    pub business_rules: Vec<BusinessRuleCandidate>,
    pub warnings: Vec<ExtractionWarning>,
    #[serde(default)]
    pub truncated: bool,
}

impl CodeAnalysis {
    pub fn from_model(model: &RepositoryModel) -> Self {
        let classes = || model.modules.values().flat_map(|m| m.classes.iter());
        let summary = CodeSummary {
            modules: model.modules.len(),
            functions: model.function_count(),
            classes: model.class_count(),
            handlers: classes().filter(|c| c.is_handler).count(),
            services: classes().filter(|c| c.is_service).count(),
            models: classes().filter(|c| c.is_model).count(),
            business_rules: model.business_rules.len(),
        };

        Self {
            profile: model.profile.clone(),
            summary,
            modules: model.modules.values().cloned().collect(),
            business_rules: model.business_rules.clone(),
            warnings: model.warnings.clone(),
            truncated: model.truncated,
        }
    }

    fn classes(&self) -> impl Iterator<Item = &ClassLike> {
        self.modules.iter().flat_map(|m| m.classes.iter())
    }

    /// Markdown structure report.
    ///
    /// A class carrying several role flags is listed under each of them.
    pub fn to_markdown(&self) -> String {
        let mut md = String::from("# Code Structure Analysis\n\n");

        md.push_str("## Project Overview\n\n");
        md.push_str(&format!("- **Project**: {}\n", self.profile.name));
        md.push_str(&format!("- **Language**: {}\n", self.profile.language));
        let frameworks: Vec<&str> = self.profile.frameworks.iter().map(|f| f.name()).collect();
        md.push_str(&format!(
            "- **Frameworks**: {}\n",
            if frameworks.is_empty() {
                "none detected".to_string()
            } else {
                frameworks.join(", ")
            }
        ));
        md.push_str(&format!("- **Architecture**: {}\n", self.profile.architecture.label()));
        md.push_str(&format!("- **License**: {}\n", license_line(self.profile.license.as_ref())));
        md.push_str(&format!("- **Modules**: {}\n", self.summary.modules));
        md.push_str(&format!("- **Functions**: {}\n", self.summary.functions));
        md.push_str(&format!("- **Classes**: {}\n", self.summary.classes));
        if self.truncated {
            md.push_str("- **Note**: analysis stopped at the deadline, results are partial\n");
        }
        md.push('\n');

        md.push_str("## Architecture Components\n\n");
        let sections: [(&str, fn(&ClassLike) -> bool); 3] = [
            ("Request Handlers", |c: &ClassLike| c.is_handler),
            ("Services", |c: &ClassLike| c.is_service),
            ("Data Models", |c: &ClassLike| c.is_model),
        ];
        let mut any_component = false;
        for (title, flag) in sections {
            let matching: Vec<&ClassLike> = self.classes().filter(|c| flag(*c)).collect();
            if matching.is_empty() {
                continue;
            }
            any_component = true;
            md.push_str(&format!("### {} ({})\n\n", title, matching.len()));
            for class in matching.iter().take(LIST_LIMIT) {
                md.push_str(&format!("- `{}` ({}:{})\n", class.name, class.module, class.line));
            }
            if matching.len() > LIST_LIMIT {
                md.push_str(&format!("- ... and {} more\n", matching.len() - LIST_LIMIT));
            }
            md.push('\n');
        }
        if !any_component {
            md.push_str(&not_detected("handlers, services or models"));
        }

        md.push_str("## Modules\n\n");
        if self.modules.is_empty() {
            md.push_str(&not_detected("source modules"));
        } else {
            md.push_str("| Module | Functions | Classes | Dependencies |\n");
            md.push_str("|--------|-----------|---------|--------------|\n");
            for module in &self.modules {
                md.push_str(&format!(
                    "| `{}` | {} | {} | {} |\n",
                    module.path,
                    module.functions.len(),
                    module.classes.len(),
                    module.dependencies.len()
                ));
            }
            md.push('\n');
        }

        md.push_str("## Business Rule Candidates\n\n");
        if self.business_rules.is_empty() {
            md.push_str(&not_detected("business rule candidates"));
        } else {
            let mut by_category: BTreeMap<RuleCategory, Vec<&BusinessRuleCandidate>> = BTreeMap::new();
            for rule in &self.business_rules {
                by_category.entry(rule.category).or_default().push(rule);
            }
            for (category, rules) in by_category {
                md.push_str(&format!("### {} ({})\n\n", category.title(), rules.len()));
                for rule in rules.iter().take(LIST_LIMIT) {
                    md.push_str(&format!("- `{}`: {}\n", rule.location(), cell(&rule.snippet)));
                }
                md.push('\n');
            }
        }

        if !self.warnings.is_empty() {
            md.push_str("## Warnings\n\n");
            for warning in &self.warnings {
                md.push_str(&format!("- `{}`: {}\n", warning.path, warning.message));
            }
            md.push('\n');
        }

        md
    }
}

/// `MIT (LICENSE)`, `GPL-3.0 (README mention, low confidence)` or `none detected`.
pub(crate) fn license_line(license: Option<&License>) -> String {
    match license {
        Some(license) => {
            let source = match &license.file {
                Some(file) => format!("`{}`", file),
                None => "README mention, low confidence".to_string(),
            };
            format!("{} ({}). {}", license.kind, source, license.kind.summary())
        }
        None => "none detected".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArchitectureStyle, ClassKind, Confidence, Language, LicenseKind};
    use std::collections::BTreeSet;

    fn analysis(modules: Vec<Module>) -> CodeAnalysis {
        CodeAnalysis {
            profile: RepositoryProfile {
                name: "shop".to_string(),
                language: Language::Java,
                frameworks: BTreeSet::new(),
                architecture: ArchitectureStyle::ControllerBased,
                license: None,
            },
            summary: CodeSummary {
                modules: modules.len(),
                ..CodeSummary::default()
            },
            modules,
            business_rules: Vec::new(),
            warnings: Vec::new(),
            truncated: false,
        }
    }

    #[test]
    fn test_empty_sections_say_not_detected() {
        let md = analysis(Vec::new()).to_markdown();
        assert!(md.contains("- **Frameworks**: none detected"));
        assert!(md.contains("- **License**: none detected"));
        assert!(md.contains("_No handlers, services or models detected._"));
        assert!(md.contains("_No source modules detected._"));
        assert!(md.contains("_No business rule candidates detected._"));
    }

    #[test]
    fn test_license_line() {
        let mut code = analysis(Vec::new());
        code.profile.license = Some(License {
            kind: LicenseKind::Apache2,
            confidence: Confidence::High,
            file: Some("LICENSE".to_string()),
            readme_mention: None,
        });
        assert!(code.to_markdown().contains("- **License**: Apache-2.0 (`LICENSE`). "));

        code.profile.license = Some(License {
            kind: LicenseKind::Unknown,
            confidence: Confidence::Low,
            file: None,
            readme_mention: Some("see COPYING".to_string()),
        });
        assert!(code
            .to_markdown()
            .contains("- **License**: Unknown (README mention, low confidence). "));
    }

    #[test]
    fn test_multi_flag_class_listed_under_each_role() {
        let mut module = Module::new("src/UserService.java", "h");
        module.classes.push(ClassLike {
            name: "UserService".to_string(),
            kind: ClassKind::Class,
            module: module.path.clone(),
            line: 3,
            parents: vec!["BaseModel".to_string()],
            attributes: Vec::new(),
            is_handler: false,
            is_service: true,
            is_model: true,
        });
        let md = analysis(vec![module]).to_markdown();
        assert!(md.contains("### Services (1)"));
        assert!(md.contains("### Data Models (1)"));
        assert!(!md.contains("### Request Handlers"));
        assert_eq!(md.matches("`UserService` (src/UserService.java:3)").count(), 2);
    }
}

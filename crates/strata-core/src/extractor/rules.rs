//! Business-rule candidate snippets.

use regex::Regex;
use std::collections::BTreeSet;

use super::text::{compile, context_window, count_lines_before, squash_whitespace};
use crate::config::ExtractConfig;
use crate::model::{BusinessRuleCandidate, RuleCategory};
use crate::patterns::RULE_PATTERNS;

pub struct RuleExtractor {
    patterns: Vec<(RuleCategory, Regex)>,
    context_window: usize,
    max_per_file: usize,
}

impl RuleExtractor {
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            patterns: RULE_PATTERNS
                .iter()
                .filter_map(|p| compile(p.regex).map(|re| (p.category, re)))
                .collect(),
            context_window: config.context_window,
            max_per_file: config.max_rules_per_file,
        }
    }

    /// Candidates in file order, at most one per line and category.
    pub fn extract(&self, rel: &str, content: &str) -> Vec<BusinessRuleCandidate> {
        let mut matches: Vec<(usize, usize, RuleCategory)> = Vec::new();
        for (category, re) in &self.patterns {
            for m in re.find_iter(content) {
                matches.push((m.start(), m.end(), *category));
            }
        }
        matches.sort_by_key(|(start, _, category)| (*start, *category));

        let mut seen = BTreeSet::new();
        let mut rules = Vec::new();
        for (start, end, category) in matches {
            if rules.len() >= self.max_per_file {
                tracing::debug!("{}: business rule cap of {} reached", rel, self.max_per_file);
                break;
            }
            let line = count_lines_before(content, start);
            if !seen.insert((line, category)) {
                continue;
            }
            rules.push(BusinessRuleCandidate {
                category,
                module: rel.to_string(),
                line,
                snippet: squash_whitespace(context_window(content, start, end, self.context_window)),
            });
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(max: usize) -> RuleExtractor {
        RuleExtractor::new(&ExtractConfig {
            context_window: 10,
            max_rules_per_file: max,
            business_rules: true,
        })
    }

    #[test]
    fn test_categories_and_lines() {
        let code = "function checkout(cart) {\n  if (cart.items.length == 0) {\n    return null;\n  }\n  total = cart.sum();\n}\n";
        let rules = extractor(50).extract("cart.js", code);

        let validation = rules
            .iter()
            .find(|r| r.category == RuleCategory::Validation)
            .unwrap();
        assert_eq!(validation.line, 2);
        assert!(validation.snippet.contains("length"));

        let calculation = rules
            .iter()
            .find(|r| r.category == RuleCategory::Calculation)
            .unwrap();
        assert_eq!(calculation.line, 5);
        assert_eq!(calculation.location(), "cart.js:5");

        assert!(rules.iter().any(|r| r.category == RuleCategory::Conditional));
        assert!(rules.windows(2).all(|w| w[0].line <= w[1].line));
    }

    #[test]
    fn test_one_candidate_per_line_and_category() {
        let code = "if (password.length < 8 && email == null) { throw new ValidationError('x'); }";
        let rules = extractor(50).extract("a.ts", code);
        let validations = rules
            .iter()
            .filter(|r| r.category == RuleCategory::Validation)
            .count();
        assert_eq!(validations, 1);
    }

    #[test]
    fn test_cap_per_file() {
        let code = "total = 1\n".repeat(20);
        let rules = extractor(3).extract("calc.py", &code);
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[2].line, 3);
    }

    #[test]
    fn test_snippet_whitespace_is_squashed() {
        let code = "x\n\n   if   user.is_admin:\n        return";
        let rules = extractor(50).extract("perm.py", code);
        let auth = rules
            .iter()
            .find(|r| r.category == RuleCategory::Authorization)
            .unwrap();
        assert!(!auth.snippet.contains("  "));
        assert!(!auth.snippet.contains('\n'));
    }
}

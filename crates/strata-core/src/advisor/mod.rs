//! Technology and architecture advisor.
//!
//! Scores each candidate stack on five axes from static tables, takes the
//! unweighted mean as the composite score and ranks stacks by it. Ties keep
//! table order.

mod architecture;
pub mod tables;

pub use architecture::{recommend_architecture, ArchitecturePattern};
pub use tables::{TechStack, TECH_STACKS};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aggregate::RepositoryModel;
use crate::model::Language;
use tables::ScoreRow;

// =============================================================================
// REQUIREMENTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    #[default]
    WebApplication,
    Microservices,
    BigData,
    MobileApplication,
    EnterpriseApplication,
    AiMlSystem,
}

impl ProjectType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::WebApplication => "web_application",
            Self::Microservices => "microservices",
            Self::BigData => "big_data",
            Self::MobileApplication => "mobile_application",
            Self::EnterpriseApplication => "enterprise_application",
            Self::AiMlSystem => "ai_ml_system",
        }
    }
}

/// Expected user scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleLevel {
    /// Under 1,000 users.
    Small,
    /// 1,000 to 10,000 users.
    #[default]
    Medium,
    /// 10,000 to 100,000 users.
    Large,
    /// Over 100,000 users.
    VeryLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeline {
    Fast,
    #[default]
    Medium,
    Slow,
}

/// Declared project dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRequirements {
    pub project_type: ProjectType,
    pub scale_level: ScaleLevel,
    /// Tags such as `high`, `medium`, `real_time`.
    pub performance_requirements: Vec<String>,
    /// Tags such as `high`, `medium`.
    pub security_requirements: Vec<String>,
    /// Skill tags: `java`, `python`, `javascript`, `csharp`, `go`, `beginner`.
    pub team_skills: Vec<String>,
    pub timeline: Timeline,
    pub team_size: String,
    pub complexity: String,
    pub budget_constraints: String,
    pub domain_knowledge: String,
}

impl Default for ProjectRequirements {
    fn default() -> Self {
        Self {
            project_type: ProjectType::default(),
            scale_level: ScaleLevel::default(),
            performance_requirements: Vec::new(),
            security_requirements: Vec::new(),
            team_skills: Vec::new(),
            timeline: Timeline::default(),
            team_size: "small".to_string(),
            complexity: "medium".to_string(),
            budget_constraints: "medium".to_string(),
            domain_knowledge: "general".to_string(),
        }
    }
}

impl ProjectRequirements {
    /// Requirements derived from an analyzed repository: team skill from the
    /// dominant language, scale from the module count.
    pub fn infer(model: &RepositoryModel) -> Self {
        let skill = match model.profile.language {
            Language::JavaScript | Language::TypeScript => Some("javascript"),
            Language::Python => Some("python"),
            Language::Java => Some("java"),
            Language::Go => Some("go"),
            Language::CSharp => Some("csharp"),
            Language::Php | Language::Ruby | Language::Unknown => None,
        };

        let scale_level = match model.modules.len() {
            0..=49 => ScaleLevel::Small,
            50..=199 => ScaleLevel::Medium,
            200..=999 => ScaleLevel::Large,
            _ => ScaleLevel::VeryLarge,
        };

        Self {
            scale_level,
            team_skills: skill.map(|s| vec![s.to_string()]).unwrap_or_default(),
            ..Self::default()
        }
    }

    fn has_tag(tags: &[String], tag: &str) -> bool {
        tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

// =============================================================================
// SCORING
// =============================================================================

/// The five axis scores of one stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisScores {
    pub performance: u8,
    pub scalability: u8,
    pub development_speed: u8,
    pub team_fit: u8,
    pub security: u8,
}

impl AxisScores {
    /// Unweighted arithmetic mean of the five axes.
    pub fn overall(&self) -> f64 {
        let sum = u32::from(self.performance)
            + u32::from(self.scalability)
            + u32::from(self.development_speed)
            + u32::from(self.team_fit)
            + u32::from(self.security);
        f64::from(sum) / 5.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    StronglyRecommended,
    Recommended,
    Consider,
    NotRecommended,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            Self::StronglyRecommended
        } else if score >= 6.0 {
            Self::Recommended
        } else if score >= 4.0 {
            Self::Consider
        } else {
            Self::NotRecommended
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StronglyRecommended => "Strongly recommended",
            Self::Recommended => "Recommended",
            Self::Consider => "Worth considering",
            Self::NotRecommended => "Not recommended",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scored stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnologyScore {
    pub technology: &'static str,
    pub name: &'static str,
    pub scores: AxisScores,
    pub overall: f64,
    pub verdict: Verdict,
}

/// Ranked stacks plus the suggested architecture pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub ranked: Vec<TechnologyScore>,
    pub architecture: ArchitecturePattern,
}

impl Recommendation {
    pub fn top(&self) -> Option<&TechnologyScore> {
        self.ranked.first()
    }

    /// Markdown summary of the top stack and the ranking table.
    pub fn to_markdown(&self) -> String {
        let mut md = String::from("# Technology Recommendation\n\n");

        match self.top().and_then(|t| tables::stack(t.technology).map(|s| (t, s))) {
            Some((top, stack)) => {
                md.push_str(&format!(
                    "Recommended stack: **{}** (composite score {:.1}/10, {}).\n\n",
                    stack.name, top.overall, top.verdict
                ));
                md.push_str("Strengths:\n");
                for pro in stack.pros.iter().take(3) {
                    md.push_str(&format!("- {}\n", pro));
                }
                md.push_str("\nTrade-offs:\n");
                for con in stack.cons.iter().take(3) {
                    md.push_str(&format!("- {}\n", con));
                }
                md.push('\n');
            }
            None => md.push_str("_No candidate stacks._\n\n"),
        }

        md.push_str("| Stack | Perf | Scale | Speed | Team | Security | Overall | Verdict |\n");
        md.push_str("|-------|------|-------|-------|------|----------|---------|---------|\n");
        for t in &self.ranked {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {:.1} | {} |\n",
                t.name,
                t.scores.performance,
                t.scores.scalability,
                t.scores.development_speed,
                t.scores.team_fit,
                t.scores.security,
                t.overall,
                t.verdict
            ));
        }

        md.push_str(&format!(
            "\n## Architecture\n\n**{}**: {}\n",
            self.architecture.title(),
            self.architecture.description()
        ));
        md.push_str(&format!("\nAdvantages: {}\n", self.architecture.advantages().join(", ")));
        md.push_str(&format!("\nDisadvantages: {}\n", self.architecture.disadvantages().join(", ")));
        md
    }
}

/// Axis scores of one stack against the requirements.
pub fn score_stack(stack: &TechStack, req: &ProjectRequirements) -> AxisScores {
    let key = stack.key;

    let performance = tier(
        &req.performance_requirements,
        tables::PERFORMANCE_HIGH,
        tables::PERFORMANCE_MEDIUM,
        tables::PERFORMANCE_LOW,
    );
    let scalability = match req.scale_level {
        ScaleLevel::VeryLarge => tables::SCALABILITY_VERY_LARGE,
        ScaleLevel::Large => tables::SCALABILITY_LARGE,
        ScaleLevel::Medium => tables::SCALABILITY_MEDIUM,
        ScaleLevel::Small => tables::SCALABILITY_SMALL,
    };
    let speed = match req.timeline {
        Timeline::Fast => tables::SPEED_FAST,
        Timeline::Medium => tables::SPEED_MEDIUM,
        Timeline::Slow => tables::SPEED_SLOW,
    };
    let security = tier(
        &req.security_requirements,
        tables::SECURITY_HIGH,
        tables::SECURITY_MEDIUM,
        tables::SECURITY_LOW,
    );

    // One strong matching skill is enough.
    let team_fit = req
        .team_skills
        .iter()
        .filter_map(|skill| tables::skill_row(skill))
        .map(|row| tables::cell(row, key))
        .max()
        .unwrap_or(tables::NO_SKILL_MATCH);

    AxisScores {
        performance: tables::cell(performance, key),
        scalability: tables::cell(scalability, key),
        development_speed: tables::cell(speed, key),
        team_fit,
        security: tables::cell(security, key),
    }
}

/// `high` wins over `medium`; anything else is the low tier.
fn tier(tags: &[String], high: ScoreRow, medium: ScoreRow, low: ScoreRow) -> ScoreRow {
    if ProjectRequirements::has_tag(tags, "high") {
        high
    } else if ProjectRequirements::has_tag(tags, "medium") {
        medium
    } else {
        low
    }
}

/// Score every stack and rank descending by composite score.
pub fn recommend(req: &ProjectRequirements) -> Recommendation {
    let mut ranked: Vec<TechnologyScore> = TECH_STACKS
        .iter()
        .map(|stack| {
            let scores = score_stack(stack, req);
            let overall = scores.overall();
            TechnologyScore {
                technology: stack.key,
                name: stack.name,
                scores,
                overall,
                verdict: Verdict::from_score(overall),
            }
        })
        .collect();

    // Stable sort: equal scores keep table order.
    ranked.sort_by(|a, b| b.overall.total_cmp(&a.overall));

    Recommendation {
        ranked,
        architecture: recommend_architecture(req),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArchitectureStyle, Module, RepositoryProfile};
    use std::collections::{BTreeMap, BTreeSet};

    fn keys(rec: &Recommendation) -> Vec<&str> {
        rec.ranked.iter().map(|t| t.technology).collect()
    }

    #[test]
    fn test_overall_is_arithmetic_mean() {
        let scores = AxisScores {
            performance: 9,
            scalability: 8,
            development_speed: 7,
            team_fit: 6,
            security: 9,
        };
        assert!((scores.overall() - 7.8).abs() < 1e-9);
    }

    #[test]
    fn test_ranking_descends() {
        let req = ProjectRequirements {
            scale_level: ScaleLevel::Large,
            performance_requirements: vec!["high".to_string()],
            security_requirements: vec!["high".to_string()],
            team_skills: vec!["java".to_string(), "go".to_string()],
            ..ProjectRequirements::default()
        };
        let rec = recommend(&req);

        assert_eq!(
            keys(&rec),
            vec!["go_gin", "java_spring", "net_core", "nodejs_express", "python_django"]
        );
        assert!(rec.ranked.windows(2).all(|w| w[0].overall > w[1].overall));

        let go = &rec.ranked[0];
        assert_eq!(go.scores.team_fit, 9);
        assert!((go.overall - 8.8).abs() < 1e-9);
        assert_eq!(go.verdict, Verdict::StronglyRecommended);
        assert!((rec.ranked[2].overall - 7.8).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_table_order() {
        let rec = recommend(&ProjectRequirements::default());
        // django and gin tie at 6.6, spring and .NET at 6.0.
        assert_eq!(
            keys(&rec),
            vec!["python_django", "go_gin", "nodejs_express", "java_spring", "net_core"]
        );
        assert!(rec.ranked.iter().all(|t| t.scores.team_fit == 3));
    }

    #[test]
    fn test_verdict_bands() {
        assert_eq!(Verdict::from_score(8.0), Verdict::StronglyRecommended);
        assert_eq!(Verdict::from_score(7.99), Verdict::Recommended);
        assert_eq!(Verdict::from_score(4.0), Verdict::Consider);
        assert_eq!(Verdict::from_score(3.9), Verdict::NotRecommended);
    }

    #[test]
    fn test_requirements_json_defaults() {
        let req: ProjectRequirements =
            serde_json::from_str(r#"{"scale_level": "very_large", "timeline": "fast"}"#).unwrap();
        assert_eq!(req.scale_level, ScaleLevel::VeryLarge);
        assert_eq!(req.timeline, Timeline::Fast);
        assert_eq!(req.project_type, ProjectType::WebApplication);
        assert!(req.team_skills.is_empty());
    }

    #[test]
    fn test_infer_from_model() {
        let mut modules = BTreeMap::new();
        for i in 0..60 {
            let path = format!("src/m{}.go", i);
            modules.insert(path.clone(), Module::new(path, "h"));
        }
        let model = RepositoryModel {
            profile: RepositoryProfile {
                name: "svc".to_string(),
                language: Language::Go,
                frameworks: BTreeSet::new(),
                architecture: ArchitectureStyle::Unknown,
                license: None,
            },
            modules,
            endpoints: Vec::new(),
            external_apis: Vec::new(),
            tables: BTreeMap::new(),
            relationships: Vec::new(),
            business_rules: Vec::new(),
            warnings: Vec::new(),
            truncated: false,
        };

        let req = ProjectRequirements::infer(&model);
        assert_eq!(req.team_skills, vec!["go"]);
        assert_eq!(req.scale_level, ScaleLevel::Medium);
    }

    #[test]
    fn test_markdown_names_top_stack() {
        let md = recommend(&ProjectRequirements::default()).to_markdown();
        assert!(md.contains("Recommended stack: **Python + Django**"));
        assert!(md.contains("| Go + Gin |"));
        assert!(md.contains("## Architecture"));
        assert!(md.contains("\nAdvantages: "));
        assert!(md.contains("\nDisadvantages: "));
    }
}

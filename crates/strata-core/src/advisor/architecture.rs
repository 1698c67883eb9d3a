//! Rule-based architecture pattern recommendation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ProjectRequirements, ProjectType, ScaleLevel, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchitecturePattern {
    Monolithic,
    Microservices,
    Layered,
    EventDriven,
    CleanArchitecture,
}

impl ArchitecturePattern {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Monolithic => "Monolithic",
            Self::Microservices => "Microservices",
            Self::Layered => "Layered",
            Self::EventDriven => "Event-driven",
            Self::CleanArchitecture => "Clean Architecture",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Monolithic => "All functionality deployed as a single application.",
            Self::Microservices => "The system is split into independently deployed services.",
            Self::Layered => "Code is organised into layers by responsibility.",
            Self::EventDriven => "Components communicate through events.",
            Self::CleanArchitecture => {
                "Dependencies point inwards and business logic is independent of frameworks."
            }
        }
    }

    pub fn advantages(&self) -> &'static [&'static str] {
        match self {
            Self::Monolithic => &["Simple deployment", "Fast development", "Easy debugging"],
            Self::Microservices => &[
                "Independent deployment",
                "Flexible technology choice",
                "Fault isolation",
                "Independent teams",
            ],
            Self::Layered => &["Clear structure", "Well-defined responsibilities", "Maintainable", "Testable"],
            Self::EventDriven => &["Loose coupling", "Scalable", "Asynchronous processing", "Real-time response"],
            Self::CleanArchitecture => &["Test friendly", "Flexible technology choice", "Independent business logic"],
        }
    }

    pub fn disadvantages(&self) -> &'static [&'static str] {
        match self {
            Self::Monolithic => &["Poor scalability", "Single technology stack", "Wide failure impact"],
            Self::Microservices => &[
                "Operational complexity",
                "Distributed transactions",
                "Network latency",
                "Higher development complexity",
            ],
            Self::Layered => &["Possible performance cost", "Expensive changes", "Coupling between layers"],
            Self::EventDriven => &["Hard to debug", "Complex transactions", "Event ordering"],
            Self::CleanArchitecture => &["High complexity", "Steep learning curve", "Risk of over-engineering"],
        }
    }
}

impl fmt::Display for ArchitecturePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// First matching rule wins.
pub fn recommend_architecture(req: &ProjectRequirements) -> ArchitecturePattern {
    let is = |value: &str, expected: &str| value.trim().eq_ignore_ascii_case(expected);

    if req.project_type == ProjectType::Microservices
        || matches!(req.scale_level, ScaleLevel::Large | ScaleLevel::VeryLarge)
    {
        ArchitecturePattern::Microservices
    } else if req.project_type == ProjectType::BigData
        || ProjectRequirements::has_tag(&req.performance_requirements, "real_time")
    {
        ArchitecturePattern::EventDriven
    } else if is(&req.complexity, "high") || req.project_type == ProjectType::EnterpriseApplication {
        ArchitecturePattern::CleanArchitecture
    } else if is(&req.team_size, "small") && req.timeline == Timeline::Fast {
        ArchitecturePattern::Monolithic
    } else {
        ArchitecturePattern::Layered
    }
}

//! Static scoring tables. Pure data.

/// A candidate technology stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TechStack {
    pub key: &'static str,
    pub name: &'static str,
    pub language: &'static str,
    pub framework: &'static str,
    pub database: &'static str,
    pub deployment: &'static str,
    pub pros: &'static [&'static str],
    pub cons: &'static [&'static str],
}

/// Candidate stacks. Declaration order is the ranking tie-break order.
pub const TECH_STACKS: &[TechStack] = &[
    TechStack {
        key: "java_spring",
        name: "Java + Spring Boot",
        language: "Java",
        framework: "Spring Boot",
        database: "PostgreSQL/MySQL",
        deployment: "Docker/Kubernetes",
        pros: &["Mature and stable", "Enterprise support", "Rich ecosystem", "Type safety"],
        cons: &["Steep learning curve", "High memory footprint", "Slow startup"],
    },
    TechStack {
        key: "python_django",
        name: "Python + Django",
        language: "Python",
        framework: "Django",
        database: "PostgreSQL/MySQL",
        deployment: "Docker/Heroku",
        pros: &["High development velocity", "Concise syntax", "Extensive libraries", "Fast prototyping"],
        cons: &["Lower raw performance", "GIL limits", "Weak type safety"],
    },
    TechStack {
        key: "nodejs_express",
        name: "Node.js + Express",
        language: "JavaScript/TypeScript",
        framework: "Express",
        database: "MongoDB/PostgreSQL",
        deployment: "Docker/AWS",
        pros: &["One language front to back", "Active ecosystem", "High concurrency", "Fast development"],
        cons: &["Single-threaded", "Callback complexity", "Memory management"],
    },
    TechStack {
        key: "go_gin",
        name: "Go + Gin",
        language: "Go",
        framework: "Gin",
        database: "PostgreSQL/MongoDB",
        deployment: "Docker/Kubernetes",
        pros: &["Excellent performance", "Strong concurrency", "Compiled", "Simple deployment"],
        cons: &["Smaller ecosystem", "Fewer libraries", "Basic error handling"],
    },
    TechStack {
        key: "net_core",
        name: ".NET Core",
        language: "C#",
        framework: "ASP.NET Core",
        database: "SQL Server/PostgreSQL",
        deployment: "Docker/Azure",
        pros: &["Enterprise support", "Excellent performance", "Type safety", "Microsoft ecosystem"],
        cons: &["Platform ties", "Steep learning curve", "Smaller open-source ecosystem"],
    },
];

/// One row of an axis table: stack key to score.
pub type ScoreRow = &'static [(&'static str, u8)];

// =============================================================================
// AXES
// =============================================================================

pub const PERFORMANCE_HIGH: ScoreRow = &[
    ("java_spring", 9),
    ("go_gin", 10),
    ("net_core", 9),
    ("nodejs_express", 8),
    ("python_django", 6),
];
pub const PERFORMANCE_MEDIUM: ScoreRow = &[
    ("java_spring", 8),
    ("go_gin", 9),
    ("net_core", 8),
    ("nodejs_express", 7),
    ("python_django", 7),
];
pub const PERFORMANCE_LOW: ScoreRow = &[
    ("java_spring", 7),
    ("go_gin", 8),
    ("net_core", 7),
    ("nodejs_express", 7),
    ("python_django", 8),
];

pub const SCALABILITY_VERY_LARGE: ScoreRow = &[
    ("java_spring", 9),
    ("go_gin", 9),
    ("net_core", 9),
    ("nodejs_express", 7),
    ("python_django", 5),
];
pub const SCALABILITY_LARGE: ScoreRow = &[
    ("java_spring", 8),
    ("go_gin", 9),
    ("net_core", 8),
    ("nodejs_express", 8),
    ("python_django", 6),
];
pub const SCALABILITY_MEDIUM: ScoreRow = &[
    ("java_spring", 7),
    ("go_gin", 8),
    ("net_core", 7),
    ("nodejs_express", 7),
    ("python_django", 8),
];
pub const SCALABILITY_SMALL: ScoreRow = &[
    ("java_spring", 6),
    ("go_gin", 7),
    ("net_core", 6),
    ("nodejs_express", 8),
    ("python_django", 9),
];

pub const SPEED_FAST: ScoreRow = &[
    ("python_django", 9),
    ("nodejs_express", 9),
    ("go_gin", 7),
    ("java_spring", 5),
    ("net_core", 5),
];
pub const SPEED_MEDIUM: ScoreRow = &[
    ("python_django", 8),
    ("nodejs_express", 8),
    ("go_gin", 8),
    ("java_spring", 6),
    ("net_core", 6),
];
pub const SPEED_SLOW: ScoreRow = &[
    ("python_django", 7),
    ("nodejs_express", 7),
    ("go_gin", 7),
    ("java_spring", 7),
    ("net_core", 7),
];

/// Team skill tag to its score row.
pub const TEAM_SKILLS: &[(&str, ScoreRow)] = &[
    (
        "java",
        &[
            ("java_spring", 9),
            ("net_core", 7),
            ("go_gin", 6),
            ("nodejs_express", 5),
            ("python_django", 4),
        ],
    ),
    (
        "python",
        &[
            ("python_django", 9),
            ("nodejs_express", 8),
            ("go_gin", 5),
            ("java_spring", 4),
            ("net_core", 3),
        ],
    ),
    (
        "javascript",
        &[
            ("nodejs_express", 9),
            ("python_django", 7),
            ("go_gin", 5),
            ("java_spring", 3),
            ("net_core", 3),
        ],
    ),
    (
        "csharp",
        &[
            ("net_core", 9),
            ("java_spring", 7),
            ("go_gin", 4),
            ("nodejs_express", 3),
            ("python_django", 2),
        ],
    ),
    (
        "go",
        &[
            ("go_gin", 9),
            ("java_spring", 6),
            ("net_core", 4),
            ("nodejs_express", 4),
            ("python_django", 3),
        ],
    ),
    (
        "beginner",
        &[
            ("python_django", 9),
            ("nodejs_express", 8),
            ("go_gin", 6),
            ("java_spring", 4),
            ("net_core", 3),
        ],
    ),
];

pub const SECURITY_HIGH: ScoreRow = &[
    ("java_spring", 9),
    ("net_core", 9),
    ("go_gin", 8),
    ("python_django", 7),
    ("nodejs_express", 7),
];
pub const SECURITY_MEDIUM: ScoreRow = &[
    ("java_spring", 8),
    ("net_core", 8),
    ("go_gin", 7),
    ("python_django", 8),
    ("nodejs_express", 7),
];
pub const SECURITY_LOW: ScoreRow = &[
    ("java_spring", 7),
    ("net_core", 7),
    ("go_gin", 6),
    ("python_django", 6),
    ("nodejs_express", 6),
];

/// Score used when a row has no cell for a stack.
pub const MISSING_CELL: u8 = 5;

/// Team-fit score when no declared skill has a row.
pub const NO_SKILL_MATCH: u8 = 3;

/// Look up a stack's cell in a row.
pub fn cell(row: ScoreRow, key: &str) -> u8 {
    row.iter()
        .find(|(k, _)| *k == key)
        .map(|(_, score)| *score)
        .unwrap_or(MISSING_CELL)
}

pub fn skill_row(skill: &str) -> Option<ScoreRow> {
    TEAM_SKILLS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(skill.trim()))
        .map(|(_, row)| *row)
}

pub fn stack(key: &str) -> Option<&'static TechStack> {
    TECH_STACKS.iter().find(|s| s.key == key)
}

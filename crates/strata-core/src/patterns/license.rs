//! License recognition patterns.

use crate::model::LicenseKind;

/// Root-level file names checked for license text, in lookup order.
pub const LICENSE_FILE_NAMES: &[&str] = &[
    "LICENSE", "LICENSE.md", "LICENSE.txt", "COPYING", "COPYRIGHT", "license", "license.md",
    "license.txt",
];

/// README names searched for a license mention when no license file exists.
pub const README_FILE_NAMES: &[&str] = &["README.md", "README.txt", "README"];

/// A body-text pattern identifying one license family.
pub struct LicensePattern {
    pub kind: LicenseKind,
    pub regex: &'static str,
}

/// Full-text patterns. The first match wins, so GPL-3.0 is tried before GPL-2.0.
pub const LICENSE_TEXT_PATTERNS: &[LicensePattern] = &[
    LicensePattern { kind: LicenseKind::Mit, regex: r"(?i)MIT\s+License" },
    LicensePattern { kind: LicenseKind::Mit, regex: r"(?is)Permission\s+is\s+hereby\s+granted.*free\s+of\s+charge" },
    LicensePattern { kind: LicenseKind::Apache2, regex: r"(?is)Apache\s+License.*Version\s+2\.0" },
    LicensePattern { kind: LicenseKind::Apache2, regex: r"(?i)Licensed\s+under\s+the\s+Apache\s+License" },
    LicensePattern { kind: LicenseKind::Apache2, regex: r"(?i)www\.apache\.org/licenses/LICENSE-2\.0" },
    LicensePattern { kind: LicenseKind::Gpl3, regex: r"(?is)GNU\s+GENERAL\s+PUBLIC\s+LICENSE.*Version\s+3" },
    LicensePattern { kind: LicenseKind::Gpl3, regex: r"(?i)www\.gnu\.org/licenses/gpl-3\.0" },
    LicensePattern { kind: LicenseKind::Gpl2, regex: r"(?is)GNU\s+GENERAL\s+PUBLIC\s+LICENSE.*Version\s+2" },
    LicensePattern { kind: LicenseKind::Bsd3Clause, regex: r"(?i)BSD\s+3-Clause\s+License" },
    LicensePattern { kind: LicenseKind::Bsd3Clause, regex: r"(?i)Redistribution\s+and\s+use\s+in\s+source\s+and\s+binary\s+forms" },
    LicensePattern { kind: LicenseKind::Isc, regex: r"(?i)ISC\s+License" },
    LicensePattern { kind: LicenseKind::Isc, regex: r"(?is)Permission\s+to\s+use.*copy.*modify.*distribute" },
];

/// Markers of a proprietary or custom license.
pub const PROPRIETARY_MARKERS: &str = r"(?i)proprietary|confidential|trade\s+secret|all\s+rights\s+reserved";

/// `License: MIT` or `licensed under the Apache License` in a README.
pub const README_LICENSE_MENTION: &str = r"(?i)(?:license|licensed?\s+under)[:\s]+(?P<mention>[^.\n]+)";

/// Short license names looked for in a README mention.
pub const LICENSE_NAME_PATTERNS: &[LicensePattern] = &[
    LicensePattern { kind: LicenseKind::Apache2, regex: r"(?i)\bApache\b" },
    LicensePattern { kind: LicenseKind::Gpl3, regex: r"(?i)\bGPL\s*-?\s*v?3" },
    LicensePattern { kind: LicenseKind::Gpl2, regex: r"(?i)\bGPL\s*-?\s*v?2" },
    LicensePattern { kind: LicenseKind::Bsd3Clause, regex: r"(?i)\bBSD\b" },
    LicensePattern { kind: LicenseKind::Isc, regex: r"(?i)\bISC\b" },
    LicensePattern { kind: LicenseKind::Mit, regex: r"(?i)\bMIT\b" },
];

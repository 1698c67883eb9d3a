//! License detection from root-level license files and READMEs.
//!
//! A license file decides the kind from its text. Without one, a README
//! line naming a license gives a low-confidence answer.

use std::path::Path;

use crate::error::ExtractError;
use crate::extractor::text::compile;
use crate::model::{Confidence, ExtractionWarning, License, LicenseKind};
use crate::patterns::license::{
    LicensePattern, LICENSE_FILE_NAMES, LICENSE_NAME_PATTERNS, LICENSE_TEXT_PATTERNS,
    PROPRIETARY_MARKERS, README_FILE_NAMES, README_LICENSE_MENTION,
};

/// License found at the root, plus recovered read failures.
#[derive(Debug, Default)]
pub struct LicenseScan {
    pub license: Option<License>,
    pub warnings: Vec<ExtractionWarning>,
}

pub fn detect_license(root: &Path) -> LicenseScan {
    let mut scan = LicenseScan::default();

    for name in LICENSE_FILE_NAMES {
        if let Some(content) = read_root_file(root, name, &mut scan) {
            let (kind, confidence) = classify_license_text(&content);
            tracing::debug!("{}: {} license", name, kind);
            scan.license = Some(License {
                kind,
                confidence,
                file: Some(name.to_string()),
                readme_mention: None,
            });
            return scan;
        }
    }

    for name in README_FILE_NAMES {
        let Some(content) = read_root_file(root, name, &mut scan) else {
            continue;
        };
        if let Some(mention) = readme_mention(&content) {
            scan.license = Some(License {
                kind: first_match(LICENSE_NAME_PATTERNS, &mention).unwrap_or(LicenseKind::Unknown),
                confidence: Confidence::Low,
                file: None,
                readme_mention: Some(mention),
            });
            return scan;
        }
    }

    scan
}

/// Kind and confidence for the text of a license file.
pub fn classify_license_text(content: &str) -> (LicenseKind, Confidence) {
    if let Some(kind) = first_match(LICENSE_TEXT_PATTERNS, content) {
        return (kind, Confidence::High);
    }
    let proprietary = compile(PROPRIETARY_MARKERS)
        .map(|re| re.is_match(content))
        .unwrap_or(false);
    if proprietary {
        (LicenseKind::Proprietary, Confidence::Medium)
    } else {
        (LicenseKind::Unknown, Confidence::Low)
    }
}

fn first_match(patterns: &[LicensePattern], text: &str) -> Option<LicenseKind> {
    patterns
        .iter()
        .find(|p| compile(p.regex).is_some_and(|re| re.is_match(text)))
        .map(|p| p.kind)
}

fn readme_mention(content: &str) -> Option<String> {
    let cap = compile(README_LICENSE_MENTION)?.captures(content)?;
    let mention = cap.name("mention")?.as_str().trim();
    (!mention.is_empty()).then(|| mention.to_string())
}

fn read_root_file(root: &Path, name: &str, scan: &mut LicenseScan) -> Option<String> {
    let path = root.join(name);
    if !path.is_file() {
        return None;
    }
    match std::fs::read(&path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(source) => {
            let err = ExtractError::Read {
                path: name.to_string(),
                source,
            };
            tracing::warn!("{}", err);
            scan.warnings.push(err.into_warning());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MIT_TEXT: &str = "MIT License\n\nCopyright (c) 2024 Example\n\nPermission is hereby granted, free of charge, to any person obtaining a copy";

    const GPL3_TEXT: &str = "                    GNU GENERAL PUBLIC LICENSE\n                       Version 3, 29 June 2007\n";

    #[test]
    fn test_license_text_kinds() {
        assert_eq!(classify_license_text(MIT_TEXT), (LicenseKind::Mit, Confidence::High));
        assert_eq!(classify_license_text(GPL3_TEXT), (LicenseKind::Gpl3, Confidence::High));
        assert_eq!(
            classify_license_text("Apache License\n  Version 2.0, January 2004"),
            (LicenseKind::Apache2, Confidence::High)
        );
        assert_eq!(
            classify_license_text("Copyright 2024 Acme Corp. All rights reserved."),
            (LicenseKind::Proprietary, Confidence::Medium)
        );
        assert_eq!(
            classify_license_text("Do what you like."),
            (LicenseKind::Unknown, Confidence::Low)
        );
    }

    #[test]
    fn test_license_file_wins_over_readme() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("LICENSE.md"), MIT_TEXT).unwrap();
        fs::write(temp.path().join("README.md"), "# Demo\n\nLicense: Apache 2.0\n").unwrap();

        let scan = detect_license(temp.path());
        let license = scan.license.unwrap();
        assert_eq!(license.kind, LicenseKind::Mit);
        assert_eq!(license.file.as_deref(), Some("LICENSE.md"));
        assert!(license.readme_mention.is_none());
        assert!(scan.warnings.is_empty());
    }

    #[test]
    fn test_readme_mention_without_license_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("README.md"),
            "# Demo\n\nThis project is licensed under the GPLv3. See below.\n",
        )
        .unwrap();

        let license = detect_license(temp.path()).license.unwrap();
        assert_eq!(license.kind, LicenseKind::Gpl3);
        assert_eq!(license.confidence, Confidence::Low);
        assert_eq!(license.readme_mention.as_deref(), Some("the GPLv3"));
        assert!(license.file.is_none());
    }

    #[test]
    fn test_no_license_evidence() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "# Demo\n\nNothing here.\n").unwrap();
        assert!(detect_license(temp.path()).license.is_none());
    }
}

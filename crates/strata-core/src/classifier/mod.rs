//! Language / framework classifier.
//!
//! Decides the dominant language by counting extensions over the shared
//! walk, frameworks from dependency manifests, the architecture style from
//! directory names and the license from root-level files. Nothing here fails: an empty or unreadable
//! repository classifies as `unknown`.

mod architecture;
mod license;
mod manifests;

pub use architecture::{detect_architecture, infer_architecture};
pub use license::{detect_license, LicenseScan};
pub use manifests::{detect_frameworks, FrameworkScan};

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::WalkConfig;
use crate::model::{ExtractionWarning, Language, RepositoryProfile};
use crate::walker::walk_files;

/// Count files per language across the shared walk.
pub fn count_languages(root: &Path, config: &WalkConfig) -> BTreeMap<Language, usize> {
    let mut counts = BTreeMap::new();

    for entry in walk_files(root, config).flatten() {
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let Some(ext) = entry.path().extension() else {
            continue;
        };
        if let Some(language) = Language::from_extension(&ext.to_string_lossy()) {
            *counts.entry(language).or_insert(0) += 1;
        }
    }

    counts
}

/// Pick the language with the highest count. Ties go to the language that
/// comes first in [`Language::PRIORITY`]; no matches yield `Unknown`.
pub fn dominant_language(counts: &BTreeMap<Language, usize>) -> Language {
    let mut best = Language::Unknown;
    let mut best_count = 0;

    for language in Language::PRIORITY {
        let count = counts.get(&language).copied().unwrap_or(0);
        if count > best_count {
            best = language;
            best_count = count;
        }
    }

    best
}

/// Build the repository profile for `root`.
///
/// Returns the profile together with warnings for unreadable or malformed
/// manifests and unreadable license files.
pub fn classify(root: &Path, config: &WalkConfig) -> (RepositoryProfile, Vec<ExtractionWarning>) {
    let counts = count_languages(root, config);
    let language = dominant_language(&counts);
    let FrameworkScan {
        frameworks,
        mut warnings,
    } = detect_frameworks(root);
    let LicenseScan {
        license,
        warnings: license_warnings,
    } = detect_license(root);
    warnings.extend(license_warnings);
    let architecture = detect_architecture(root);

    let name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| root.to_string_lossy().into_owned());

    tracing::info!(
        "Classified {} as {} ({} frameworks, {})",
        name,
        language,
        frameworks.len(),
        architecture.label()
    );
    tracing::debug!("Language counts: {:?}", counts);

    let profile = RepositoryProfile {
        name,
        language,
        frameworks,
        architecture,
        license,
    };

    (profile, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_tie_breaks_by_priority() {
        let mut counts = BTreeMap::new();
        counts.insert(Language::Go, 2);
        counts.insert(Language::Python, 2);
        assert_eq!(dominant_language(&counts), Language::Python);

        counts.insert(Language::Go, 3);
        assert_eq!(dominant_language(&counts), Language::Go);
    }

    #[test]
    fn test_no_sources_is_unknown() {
        assert_eq!(dominant_language(&BTreeMap::new()), Language::Unknown);
    }

    #[test]
    fn test_excluded_dirs_do_not_count() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.go"), "package main").unwrap();
        fs::create_dir_all(temp.path().join("node_modules/x")).unwrap();
        fs::write(temp.path().join("node_modules/x/a.js"), "").unwrap();
        fs::write(temp.path().join("node_modules/x/b.js"), "").unwrap();

        let (profile, warnings) = classify(temp.path(), &WalkConfig::default());
        assert_eq!(profile.language, Language::Go);
        assert!(profile.license.is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_profile_carries_license() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("app.py"), "print('hi')").unwrap();
        fs::write(temp.path().join("LICENSE"), "ISC License\n\nCopyright (c) 2024").unwrap();

        let (profile, _) = classify(temp.path(), &WalkConfig::default());
        let license = profile.license.unwrap();
        assert_eq!(license.kind, crate::model::LicenseKind::Isc);
        assert_eq!(license.file.as_deref(), Some("LICENSE"));
    }
}

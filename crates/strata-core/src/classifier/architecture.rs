//! Architecture style from directory names.

use std::collections::BTreeSet;
use std::path::Path;

use crate::model::ArchitectureStyle;

/// Lower-cased names of the non-hidden directories directly under `dir`.
///
/// An unreadable directory yields an empty set.
pub fn directory_names(dir: &Path) -> BTreeSet<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!("Cannot list {}: {}", dir.display(), err);
            return BTreeSet::new();
        }
    };

    entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().to_lowercase())
        .filter(|name| !name.starts_with('.'))
        .collect()
}

/// Shallow decision tree over a set of directory names. Never fails.
pub fn infer_architecture(dirs: &BTreeSet<String>) -> ArchitectureStyle {
    let has = |name: &str| dirs.contains(name);

    if has("controllers") || has("handlers") {
        if has("services") {
            if has("repositories") || has("dao") {
                ArchitectureStyle::LayeredWithRepository
            } else {
                ArchitectureStyle::Mvc
            }
        } else {
            ArchitectureStyle::ControllerBased
        }
    } else if has("services") {
        ArchitectureStyle::ServiceOriented
    } else if has("components") && has("pages") {
        ArchitectureStyle::ComponentBased
    } else if has("src") {
        ArchitectureStyle::StandardSrcLayout
    } else {
        ArchitectureStyle::Unknown
    }
}

/// Architecture of the repository at `root`.
///
/// A bare `src` layout is looked into once more, so `src/controllers` and
/// friends still count.
pub fn detect_architecture(root: &Path) -> ArchitectureStyle {
    let top = infer_architecture(&directory_names(root));
    if top != ArchitectureStyle::StandardSrcLayout {
        return top;
    }

    match infer_architecture(&directory_names(&root.join("src"))) {
        ArchitectureStyle::Unknown | ArchitectureStyle::StandardSrcLayout => {
            ArchitectureStyle::StandardSrcLayout
        }
        nested => nested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_decision_tree() {
        assert_eq!(
            infer_architecture(&names(&["controllers", "services", "repositories"])),
            ArchitectureStyle::LayeredWithRepository
        );
        assert_eq!(
            infer_architecture(&names(&["handlers", "services"])),
            ArchitectureStyle::Mvc
        );
        assert_eq!(
            infer_architecture(&names(&["controllers"])),
            ArchitectureStyle::ControllerBased
        );
        assert_eq!(
            infer_architecture(&names(&["services", "lib"])),
            ArchitectureStyle::ServiceOriented
        );
        assert_eq!(
            infer_architecture(&names(&["components", "pages"])),
            ArchitectureStyle::ComponentBased
        );
        assert_eq!(infer_architecture(&names(&["docs"])), ArchitectureStyle::Unknown);
    }

    #[test]
    fn test_src_is_inspected() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("src/controllers")).unwrap();
        std::fs::create_dir_all(temp.path().join("src/services")).unwrap();
        assert_eq!(detect_architecture(temp.path()), ArchitectureStyle::Mvc);

        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("src/util")).unwrap();
        assert_eq!(
            detect_architecture(temp.path()),
            ArchitectureStyle::StandardSrcLayout
        );
    }

    #[test]
    fn test_missing_root_is_unknown() {
        assert_eq!(
            detect_architecture(Path::new("/definitely/not/here")),
            ArchitectureStyle::Unknown
        );
    }
}

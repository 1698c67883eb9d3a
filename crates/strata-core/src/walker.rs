//! File walker with a shared, name-based directory exclusion policy.
//!
//! Every component that enumerates files goes through [`walk_files`], so
//! the exclusion list is applied identically everywhere and at every depth.

use ignore::{Walk, WalkBuilder};
use std::path::{Path, PathBuf};

use crate::config::WalkConfig;
use crate::model::Language;

/// What a candidate file is extracted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileKind {
    /// Source file in the dominant language's extension set.
    Source,
    /// SQL DDL script.
    Sql,
    /// Prisma schema.
    Prisma,
    /// OpenAPI / Swagger document.
    OpenApi,
}

/// A file selected for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Absolute (or root-joined) path used for reading.
    pub path: PathBuf,

    /// Repository-relative path with `/` separators.
    pub rel: String,

    pub kind: FileKind,
}

/// Build the shared walk over `root`.
///
/// Hidden entries are skipped, excluded directory names are pruned at any
/// depth and siblings are visited in file-name order.
pub fn walk_files(root: &Path, config: &WalkConfig) -> Walk {
    let excluded = config.exclude_dirs.clone();

    WalkBuilder::new(root)
        .hidden(true)
        .parents(false)
        .ignore(false)
        .git_global(false)
        .git_exclude(false)
        .git_ignore(config.follow_gitignore)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir || entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !excluded.iter().any(|ex| ex.as_str() == name)
        })
        .build()
}

/// Repository-relative path with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lazily enumerates candidate files for one analysis run.
pub struct FileWalker<'a> {
    root: PathBuf,
    config: &'a WalkConfig,
    extensions: Vec<&'static str>,
}

impl<'a> FileWalker<'a> {
    /// Walker for `language`'s scan extensions. `Unknown` yields only
    /// language-independent artifacts.
    pub fn new(root: impl Into<PathBuf>, language: Language, config: &'a WalkConfig) -> Self {
        Self {
            root: root.into(),
            config,
            extensions: language.scan_extensions(),
        }
    }

    /// Classify a path, or `None` when it is not a candidate.
    pub fn classify(&self, path: &Path) -> Option<FileKind> {
        let file_name = path.file_name()?.to_string_lossy().to_lowercase();

        if self
            .config
            .spec_file_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&file_name))
        {
            return Some(FileKind::OpenApi);
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "sql" => Some(FileKind::Sql),
            "prisma" => Some(FileKind::Prisma),
            other if self.extensions.contains(&other) => Some(FileKind::Source),
            _ => None,
        }
    }

    /// Candidate files in deterministic walk order.
    pub fn candidates(&self) -> impl Iterator<Item = CandidateFile> + '_ {
        walk_files(&self.root, self.config)
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!("Walk error: {}", err);
                    None
                }
            })
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(move |entry| {
                let path = entry.into_path();
                let kind = self.classify(&path)?;
                let rel = relative_path(&self.root, &path);
                Some(CandidateFile { path, rel, kind })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_excluded_dirs_pruned_at_every_depth() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "app.py");
        touch(temp.path(), "node_modules/lib.py");
        touch(temp.path(), "pkg/deep/node_modules/lib.py");
        touch(temp.path(), "pkg/deep/handler.py");

        let config = WalkConfig::default();
        let walker = FileWalker::new(temp.path(), Language::Python, &config);
        let rels: Vec<String> = walker.candidates().map(|c| c.rel).collect();

        assert_eq!(rels, vec!["app.py", "pkg/deep/handler.py"]);
    }

    #[test]
    fn test_artifact_kinds() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "db/schema.sql");
        touch(temp.path(), "prisma/schema.prisma");
        touch(temp.path(), "docs/openapi.yaml");
        touch(temp.path(), "main.go");
        touch(temp.path(), "README.md");

        let config = WalkConfig::default();
        let walker = FileWalker::new(temp.path(), Language::Unknown, &config);
        let found: Vec<(String, FileKind)> =
            walker.candidates().map(|c| (c.rel, c.kind)).collect();

        assert_eq!(
            found,
            vec![
                ("db/schema.sql".to_string(), FileKind::Sql),
                ("docs/openapi.yaml".to_string(), FileKind::OpenApi),
                ("prisma/schema.prisma".to_string(), FileKind::Prisma),
            ]
        );
    }

    #[test]
    fn test_js_repository_scans_typescript_too() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/a.js");
        touch(temp.path(), "src/b.ts");

        let config = WalkConfig::default();
        let walker = FileWalker::new(temp.path(), Language::JavaScript, &config);
        assert_eq!(walker.candidates().count(), 2);
    }
}

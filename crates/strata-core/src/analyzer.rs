//! The analysis pipeline: classify, walk, extract, aggregate.

use std::path::Path;
use std::time::Instant;

use crate::aggregate::{Aggregator, RepositoryModel};
use crate::classifier::classify;
use crate::config::Config;
use crate::error::AnalysisError;
use crate::extractor::Extractor;
use crate::model::ExtractionWarning;
use crate::walker::{CandidateFile, FileWalker};

/// Runs one sequential analysis pass over a repository.
pub struct Analyzer {
    config: Config,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze the repository at `root`.
    pub fn analyze(&self, root: &Path) -> Result<RepositoryModel, AnalysisError> {
        self.analyze_with_progress(root, |_| {})
    }

    /// Analyze, calling `on_file` before each candidate is extracted.
    ///
    /// Only an invalid root fails. Per-file problems end up as warnings on
    /// the returned model.
    pub fn analyze_with_progress(
        &self,
        root: &Path,
        mut on_file: impl FnMut(&CandidateFile),
    ) -> Result<RepositoryModel, AnalysisError> {
        if !root.exists() {
            return Err(AnalysisError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(AnalysisError::NotADirectory(root.to_path_buf()));
        }

        let started = Instant::now();
        let deadline = self.config.analysis.deadline();

        let (profile, manifest_warnings) = classify(root, &self.config.walk);
        let language = profile.language;

        let mut aggregator = Aggregator::new(profile);
        aggregator.add_warnings(manifest_warnings);

        let walker = FileWalker::new(root, language, &self.config.walk);
        let extractor = Extractor::new(language, &self.config);

        let mut files = 0usize;
        for file in walker.candidates() {
            if let Some(limit) = deadline {
                if started.elapsed() >= limit {
                    tracing::warn!(
                        "Analysis deadline of {}s reached after {} files, results are partial",
                        limit.as_secs(),
                        files
                    );
                    aggregator.add_warnings([ExtractionWarning::new(
                        file.rel.clone(),
                        "Analysis deadline reached before this file was extracted",
                    )]);
                    aggregator.mark_truncated();
                    break;
                }
            }

            on_file(&file);
            aggregator.add(extractor.extract_file(&file));
            files += 1;
        }

        tracing::info!(
            "Extracted {} files in {:.2}s",
            files,
            started.elapsed().as_secs_f64()
        );

        Ok(aggregator.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root() {
        let analyzer = Analyzer::new(Config::default());
        let err = analyzer.analyze(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, AnalysisError::PathNotFound(_)));
    }

    #[test]
    fn test_file_root_is_rejected() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("main.py");
        fs::write(&file, "print('hi')").unwrap();

        let err = Analyzer::new(Config::default()).analyze(&file).unwrap_err();
        assert!(matches!(err, AnalysisError::NotADirectory(_)));
    }

    #[test]
    fn test_progress_sees_every_candidate() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "def a():\n    pass\n").unwrap();
        fs::write(temp.path().join("b.py"), "def b():\n    pass\n").unwrap();
        fs::write(temp.path().join("schema.sql"), "CREATE TABLE t (id INT);").unwrap();

        let mut seen = Vec::new();
        let model = Analyzer::new(Config::default())
            .analyze_with_progress(temp.path(), |f| seen.push(f.rel.clone()))
            .unwrap();

        assert_eq!(seen, vec!["a.py", "b.py", "schema.sql"]);
        assert_eq!(model.modules.len(), 2);
        assert!(model.tables.contains_key("t"));
        assert!(!model.truncated);
    }
}

//! Post-classification analysis
//!
//! Analyzers enrich an already classified result with optional fields
//! (`miss_reason`, `ownership`, `first_detected_at`). They run in order;
//! one that fails, or that touches a classification field, is rolled back
//! and skipped with a warning.

mod history;
mod ownership;
mod reason;

pub use history::{DetectionHistory, HistoryAnalyzer, PreviousResultHistory};
pub use ownership::OwnershipAnalyzer;
pub use reason::ReasonAnalyzer;

use chrono::{DateTime, Utc};
use mfc_core::{fingerprint, CheckResult, MissingFile};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("failed to read history {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse history {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("{0}")]
    Failed(String),
}

/// Run identity handed to every analyzer
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub task_id: String,
    pub run_id: String,
    pub now: DateTime<Utc>,
}

impl AnalysisContext {
    pub fn for_result(result: &CheckResult) -> Self {
        Self {
            task_id: result.task_id.clone(),
            run_id: result.run_id.clone(),
            now: result.timestamp,
        }
    }
}

pub trait Analyzer: Send + Sync {
    fn name(&self) -> &str;

    /// Fill enrichment fields; existing values are left alone
    fn analyze(&self, files: &mut [MissingFile], ctx: &AnalysisContext) -> Result<(), AnalysisError>;
}

#[derive(Default)]
pub struct AnalysisPipeline {
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl AnalysisPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ownership (default owner only) then reason
    pub fn standard() -> Self {
        Self::new()
            .with(Box::new(OwnershipAnalyzer::default()))
            .with(Box::new(ReasonAnalyzer))
    }

    pub fn with(mut self, analyzer: Box<dyn Analyzer>) -> Self {
        self.add(analyzer);
        self
    }

    pub fn add(&mut self, analyzer: Box<dyn Analyzer>) {
        self.analyzers.push(analyzer);
    }

    /// Remove an analyzer by name; false if none matched
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.analyzers.len();
        self.analyzers.retain(|a| a.name() != name);
        self.analyzers.len() != before
    }

    pub fn names(&self) -> Vec<&str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    pub fn run(&self, mut result: CheckResult) -> CheckResult {
        let ctx = AnalysisContext::for_result(&result);

        for analyzer in &self.analyzers {
            let snapshot = result.missing_files.clone();

            match analyzer.analyze(&mut result.missing_files, &ctx) {
                Ok(()) if fingerprint(&result.missing_files) == result.fingerprint => {
                    debug!(analyzer = analyzer.name(), "analyzer applied");
                }
                Ok(()) => {
                    warn!(
                        analyzer = analyzer.name(),
                        "analyzer changed classification fields, discarding its output"
                    );
                    result.missing_files = snapshot;
                }
                Err(err) => {
                    warn!(analyzer = analyzer.name(), error = %err, "analyzer failed, skipping");
                    result.missing_files = snapshot;
                }
            }
        }

        result
    }
}

impl std::fmt::Debug for AnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("AnalysisPipeline")
            .field("analyzers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfc_core::{CheckContext, MissingStatus};

    struct Failing;

    impl Analyzer for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn analyze(&self, files: &mut [MissingFile], _: &AnalysisContext) -> Result<(), AnalysisError> {
            files[0].ownership = Some("half-written".to_string());
            Err(AnalysisError::Failed("backend unavailable".to_string()))
        }
    }

    struct Meddling;

    impl Analyzer for Meddling {
        fn name(&self) -> &str {
            "meddling"
        }

        fn analyze(&self, files: &mut [MissingFile], _: &AnalysisContext) -> Result<(), AnalysisError> {
            files[0].status = MissingStatus::Shielded;
            Ok(())
        }
    }

    fn result() -> CheckResult {
        CheckResult::assemble(
            &CheckContext::new("T"),
            &[],
            &[],
            vec![MissingFile::missed("a.py", "b"), MissingFile::failed("c.py", "b")],
        )
    }

    #[test]
    fn test_failing_analyzer_is_rolled_back() {
        let out = AnalysisPipeline::new()
            .with(Box::new(Failing))
            .with(Box::new(ReasonAnalyzer))
            .run(result());

        assert!(out.missing_files[0].ownership.is_none());
        assert_eq!(out.missing_files[0].miss_reason.as_deref(), Some("not_in_list"));
    }

    #[test]
    fn test_classification_changes_are_discarded() {
        let out = AnalysisPipeline::new().with(Box::new(Meddling)).run(result());
        assert_eq!(out.missing_files[0].status, MissingStatus::Missed);
        assert_eq!(out.fingerprint, fingerprint(&out.missing_files));
    }

    #[test]
    fn test_remove_by_name() {
        let mut pipeline = AnalysisPipeline::standard();
        assert_eq!(pipeline.names(), vec!["ownership", "reason"]);
        assert!(pipeline.remove("ownership"));
        assert!(!pipeline.remove("ownership"));
        assert_eq!(pipeline.names(), vec!["reason"]);
    }
}

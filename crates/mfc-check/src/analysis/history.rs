use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use mfc_core::{CheckResult, MissingFile};

use super::{AnalysisContext, AnalysisError, Analyzer};

/// Source of earlier detections of a path
pub trait DetectionHistory: Send + Sync {
    fn first_detected_at(&self, path: &str) -> Option<DateTime<Utc>>;
}

/// History indexed from the result of an earlier run
#[derive(Debug, Clone, Default)]
pub struct PreviousResultHistory {
    first_seen: HashMap<String, DateTime<Utc>>,
}

impl PreviousResultHistory {
    pub fn from_result(previous: &CheckResult) -> Self {
        let first_seen = previous
            .missing_files
            .iter()
            .map(|f| (f.path.clone(), f.first_detected_at.unwrap_or(previous.timestamp)))
            .collect();
        Self { first_seen }
    }

    /// Read a JSON result written by `mfc scan --output`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let previous: CheckResult =
            serde_json::from_str(&content).map_err(|e| AnalysisError::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::from_result(&previous))
    }

    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }
}

impl DetectionHistory for PreviousResultHistory {
    fn first_detected_at(&self, path: &str) -> Option<DateTime<Utc>> {
        self.first_seen.get(path).copied()
    }
}

/// Fills `first_detected_at`; paths with no history date from this run
pub struct HistoryAnalyzer {
    history: Box<dyn DetectionHistory>,
}

impl HistoryAnalyzer {
    pub fn new(history: Box<dyn DetectionHistory>) -> Self {
        Self { history }
    }
}

impl Analyzer for HistoryAnalyzer {
    fn name(&self) -> &str {
        "history"
    }

    fn analyze(&self, files: &mut [MissingFile], ctx: &AnalysisContext) -> Result<(), AnalysisError> {
        for file in files.iter_mut().filter(|f| f.first_detected_at.is_none()) {
            file.first_detected_at = Some(self.history.first_detected_at(&file.path).unwrap_or(ctx.now));
        }
        Ok(())
    }
}

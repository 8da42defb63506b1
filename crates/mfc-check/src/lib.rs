//! MFC Check: runs a missing-file check end to end
//!
//! ```text
//! TaskConfig + AdapterRegistry
//!        │
//!        ▼
//! CheckOrchestrator::check() ─→ CheckResult ─→ AnalysisPipeline::run() ─→ CheckResult (enriched)
//! ```

pub mod analysis;
pub mod orchestrator;

pub use analysis::{
    AnalysisContext, AnalysisError, AnalysisPipeline, Analyzer, DetectionHistory, HistoryAnalyzer,
    OwnershipAnalyzer, PreviousResultHistory, ReasonAnalyzer,
};
pub use orchestrator::CheckOrchestrator;

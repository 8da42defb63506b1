//! MFC Core: data model, configuration types and error model
//!
//! Shared vocabulary for every stage of a missing-file check: the scan
//! results produced by adapters, the rules the classifier applies and the
//! classified result handed to reporting.

pub mod context;
pub mod data_model;
pub mod error;
pub mod project;
pub mod rules;
pub mod strategy;

pub use context::CheckContext;
pub use data_model::{
    fingerprint, BuildInfo, BuildProvenance, BuildStatus, CheckResult, FileEntry, FileStatus,
    InputTotals, MissingFile, MissingStatus, ProjectRole, ProjectScanResult, ResultStatistics,
};
pub use error::{AdapterError, CheckError, CheckStage, FilterAttempt};
pub use project::{BuildFilter, BuildQuery, Connection, ProjectConfig, ProjectKind};
pub use rules::{MappingRule, PathPrefix, PatternKind, ShieldRule};
pub use strategy::{BaselineStrategy, SelectorParams};

/// Engine version stamped into every `CheckResult`
pub const MFC_VERSION: &str = env!("CARGO_PKG_VERSION");

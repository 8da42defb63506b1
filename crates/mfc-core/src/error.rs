//! Unified Error Model
use std::fmt;
use thiserror::Error;

use crate::project::{BuildFilter, BuildQuery};

/// Stages of a check run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckStage {
    Init,
    FetchTargets,
    SelectBaselines,
    Merge,
    Compare,
    Classify,
    Assemble,
}

impl fmt::Display for CheckStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CheckStage::Init => "init",
            CheckStage::FetchTargets => "fetch_targets",
            CheckStage::SelectBaselines => "select_baselines",
            CheckStage::Merge => "merge",
            CheckStage::Compare => "compare",
            CheckStage::Classify => "classify",
            CheckStage::Assemble => "assemble",
        };
        f.write_str(name)
    }
}

/// Failures raised by a data-source adapter
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("no build of '{project_id}' matches {query}")]
    NoMatchingBuild { project_id: String, query: BuildQuery },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data for '{project_id}': {reason}")]
    Malformed { project_id: String, reason: String },

    #[error("connection failed for '{project_id}': {reason}")]
    Connection { project_id: String, reason: String },

    #[error("no adapter registered for project type '{kind}'")]
    Unsupported { kind: String },
}

impl AdapterError {
    pub fn malformed(project_id: impl Into<String>, reason: impl fmt::Display) -> Self {
        AdapterError::Malformed {
            project_id: project_id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, AdapterError::NoMatchingBuild { .. })
    }
}

/// One filter value a selector tried, and the target it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterAttempt {
    pub filter: BuildFilter,
    pub target_project_id: Option<String>,
}

impl fmt::Display for FilterAttempt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.target_project_id {
            Some(target) => write!(f, "{} (target '{}')", self.filter, target),
            None => write!(f, "{}", self.filter),
        }
    }
}

fn join_attempts(attempts: &[FilterAttempt]) -> String {
    attempts
        .iter()
        .map(FilterAttempt::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that abort a check run
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("PATH/invalid path {path:?} in project '{project_id}': {reason}")]
    InvalidPath {
        project_id: String,
        path: String,
        reason: String,
    },

    #[error("BASELINE/no matching build for baseline '{baseline_project_id}', tried {}", join_attempts(.attempts))]
    NoMatchingBaseline {
        baseline_project_id: String,
        attempts: Vec<FilterAttempt>,
    },

    #[error("FETCH/{stage}: project '{project_id}': {source}")]
    AdapterFetch {
        stage: CheckStage,
        project_id: String,
        #[source]
        source: AdapterError,
    },

    #[error("RULE/invalid pattern {pattern:?} in rule '{rule_id}': {reason}")]
    InvalidRulePattern {
        rule_id: String,
        pattern: String,
        reason: String,
    },

    #[error("PROJECT/{role} project '{project_id}' is not part of this run")]
    UnknownProject { role: String, project_id: String },

    #[error("CONFIG/{0}")]
    InvalidConfig(String),

    #[error("TASK/{stage}: fetch task aborted: {reason}")]
    TaskAborted { stage: CheckStage, reason: String },
}

impl CheckError {
    /// Stage of the run that raised this error
    pub fn stage(&self) -> CheckStage {
        match self {
            CheckError::InvalidPath { .. } => CheckStage::Merge,
            CheckError::NoMatchingBaseline { .. } => CheckStage::SelectBaselines,
            CheckError::AdapterFetch { stage, .. } => *stage,
            CheckError::InvalidRulePattern { .. } => CheckStage::Init,
            CheckError::UnknownProject { .. } => CheckStage::SelectBaselines,
            CheckError::InvalidConfig(_) => CheckStage::Init,
            CheckError::TaskAborted { stage, .. } => *stage,
        }
    }

    pub fn fetch(stage: CheckStage, project_id: impl Into<String>, source: AdapterError) -> Self {
        CheckError::AdapterFetch {
            stage,
            project_id: project_id.into(),
            source,
        }
    }
}

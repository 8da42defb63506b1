//! Baseline selection strategies as a closed set of variants
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters for the strategies that pin one baseline to one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorParams {
    pub baseline_project_id: String,
    pub target_project_id: String,
}

impl SelectorParams {
    pub fn new(baseline_project_id: impl Into<String>, target_project_id: impl Into<String>) -> Self {
        Self {
            baseline_project_id: baseline_project_id.into(),
            target_project_id: target_project_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum BaselineStrategy {
    /// Every baseline, latest successful build matching a target commit id
    LatestSuccessCommitId,
    /// Every baseline, latest successful build matching a target version
    LatestSuccessVersion,
    /// One baseline matched against one target's commit id
    SpecificBaselineCommitId(SelectorParams),
    /// One baseline matched against one target's version
    SpecificBaselineVersion(SelectorParams),
    /// Every baseline, latest successful build
    LatestSuccess,
    /// Every baseline, most recent build whatever its status
    NoRestriction,
}

impl BaselineStrategy {
    pub const NAMES: [&'static str; 6] = [
        "latest_success_commit_id",
        "latest_success_version",
        "specific_baseline_commit_id",
        "specific_baseline_version",
        "latest_success",
        "no_restriction",
    ];

    /// Resolve a configured strategy name and its optional parameters
    pub fn from_name(name: &str, params: Option<SelectorParams>) -> Result<Self, String> {
        let needs_params = |params: Option<SelectorParams>| {
            params.ok_or_else(|| {
                format!(
                    "strategy '{}' requires parameters: baseline_project_id, target_project_id",
                    name
                )
            })
        };

        match name {
            "latest_success_commit_id" => Ok(BaselineStrategy::LatestSuccessCommitId),
            "latest_success_version" => Ok(BaselineStrategy::LatestSuccessVersion),
            "specific_baseline_commit_id" => {
                Ok(BaselineStrategy::SpecificBaselineCommitId(needs_params(params)?))
            }
            "specific_baseline_version" => {
                Ok(BaselineStrategy::SpecificBaselineVersion(needs_params(params)?))
            }
            "latest_success" => Ok(BaselineStrategy::LatestSuccess),
            "no_restriction" => Ok(BaselineStrategy::NoRestriction),
            other => Err(format!(
                "unknown baseline selector strategy '{}', available: {}",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BaselineStrategy::LatestSuccessCommitId => "latest_success_commit_id",
            BaselineStrategy::LatestSuccessVersion => "latest_success_version",
            BaselineStrategy::SpecificBaselineCommitId(_) => "specific_baseline_commit_id",
            BaselineStrategy::SpecificBaselineVersion(_) => "specific_baseline_version",
            BaselineStrategy::LatestSuccess => "latest_success",
            BaselineStrategy::NoRestriction => "no_restriction",
        }
    }

    pub fn params(&self) -> Option<&SelectorParams> {
        match self {
            BaselineStrategy::SpecificBaselineCommitId(p)
            | BaselineStrategy::SpecificBaselineVersion(p) => Some(p),
            _ => None,
        }
    }
}

impl Default for BaselineStrategy {
    fn default() -> Self {
        BaselineStrategy::LatestSuccess
    }
}

impl fmt::Display for BaselineStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

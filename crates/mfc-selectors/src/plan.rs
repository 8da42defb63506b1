//! Pure planning half of baseline selection
//!
//! A plan says which baseline projects are in scope, which filters to try
//! for each (in order) and whether the fetched build must be successful.
//! Nothing here touches an adapter.

use mfc_core::{
    BaselineStrategy, BuildFilter, CheckError, FilterAttempt, ProjectConfig, ProjectScanResult,
    SelectorParams,
};

/// What to fetch for one baseline project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub project: ProjectConfig,
    /// Tried in order until one yields an acceptable build
    pub candidates: Vec<FilterAttempt>,
    pub require_success: bool,
}

/// Which build field a matching strategy compares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchOn {
    CommitId,
    Version,
}

impl MatchOn {
    fn value<'a>(&self, target: &'a ProjectScanResult) -> &'a str {
        match self {
            MatchOn::CommitId => target.build_info.commit_id.as_str(),
            MatchOn::Version => target.build_info.version.as_str(),
        }
    }

    fn filter(&self, value: &str) -> BuildFilter {
        match self {
            MatchOn::CommitId => BuildFilter::CommitId(value.to_string()),
            MatchOn::Version => BuildFilter::Version(value.to_string()),
        }
    }
}

/// Distinct non-empty target values, in target order.
///
/// Targets that carry no value for the field contribute nothing.
fn matching_candidates(targets: &[ProjectScanResult], on: MatchOn) -> Vec<FilterAttempt> {
    let mut seen: Vec<&str> = Vec::new();
    let mut candidates = Vec::new();

    for target in targets {
        let value = on.value(target).trim();
        if value.is_empty() || seen.contains(&value) {
            continue;
        }
        seen.push(value);
        candidates.push(FilterAttempt {
            filter: on.filter(value),
            target_project_id: Some(target.project_id.clone()),
        });
    }

    candidates
}

/// No target has a value to match on: nothing can be matched, so the
/// baseline fails with the empty value recorded against each target
fn nothing_to_match(baseline: &ProjectConfig, targets: &[ProjectScanResult], on: MatchOn) -> CheckError {
    CheckError::NoMatchingBaseline {
        baseline_project_id: baseline.project_id.clone(),
        attempts: targets
            .iter()
            .map(|t| FilterAttempt {
                filter: on.filter(""),
                target_project_id: Some(t.project_id.clone()),
            })
            .collect(),
    }
}

fn matched(
    baselines: &[ProjectConfig],
    targets: &[ProjectScanResult],
    on: MatchOn,
) -> Result<Vec<FetchPlan>, CheckError> {
    let candidates = matching_candidates(targets, on);
    match baselines.first() {
        Some(first) if candidates.is_empty() => Err(nothing_to_match(first, targets, on)),
        _ => Ok(every_baseline(baselines, candidates, true)),
    }
}

fn latest() -> FilterAttempt {
    FilterAttempt {
        filter: BuildFilter::None,
        target_project_id: None,
    }
}

fn every_baseline(
    baselines: &[ProjectConfig],
    candidates: Vec<FilterAttempt>,
    require_success: bool,
) -> Vec<FetchPlan> {
    baselines
        .iter()
        .map(|project| FetchPlan {
            project: project.clone(),
            candidates: candidates.clone(),
            require_success,
        })
        .collect()
}

fn specific(
    params: &SelectorParams,
    baselines: &[ProjectConfig],
    targets: &[ProjectScanResult],
    on: MatchOn,
) -> Result<Vec<FetchPlan>, CheckError> {
    let project = baselines
        .iter()
        .find(|b| b.project_id == params.baseline_project_id)
        .ok_or_else(|| CheckError::UnknownProject {
            role: "baseline".to_string(),
            project_id: params.baseline_project_id.clone(),
        })?;

    let target = targets
        .iter()
        .find(|t| t.project_id == params.target_project_id)
        .ok_or_else(|| CheckError::UnknownProject {
            role: "target".to_string(),
            project_id: params.target_project_id.clone(),
        })?;

    let scoped = std::slice::from_ref(target);
    let candidates = matching_candidates(scoped, on);
    if candidates.is_empty() {
        return Err(nothing_to_match(project, scoped, on));
    }

    Ok(vec![FetchPlan {
        project: project.clone(),
        candidates,
        require_success: true,
    }])
}

/// Plan the baseline fetches for `strategy`
pub fn plan(
    strategy: &BaselineStrategy,
    baselines: &[ProjectConfig],
    targets: &[ProjectScanResult],
) -> Result<Vec<FetchPlan>, CheckError> {
    match strategy {
        BaselineStrategy::LatestSuccessCommitId => matched(baselines, targets, MatchOn::CommitId),
        BaselineStrategy::LatestSuccessVersion => matched(baselines, targets, MatchOn::Version),
        BaselineStrategy::SpecificBaselineCommitId(params) => {
            specific(params, baselines, targets, MatchOn::CommitId)
        }
        BaselineStrategy::SpecificBaselineVersion(params) => {
            specific(params, baselines, targets, MatchOn::Version)
        }
        BaselineStrategy::LatestSuccess => Ok(every_baseline(baselines, vec![latest()], true)),
        BaselineStrategy::NoRestriction => Ok(every_baseline(baselines, vec![latest()], false)),
    }
}

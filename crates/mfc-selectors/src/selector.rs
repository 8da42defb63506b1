//! Executing selection plans against the adapter registry

use std::sync::Arc;

use mfc_adapters::{try_join_ordered, AdapterRegistry};
use mfc_core::{
    BaselineStrategy, BuildQuery, CheckError, CheckStage, FilterAttempt, ProjectConfig,
    ProjectScanResult,
};
use tracing::{debug, info};

use crate::plan::{plan, FetchPlan};

/// Default number of baseline fetches in flight
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct BaselineSelector {
    strategy: BaselineStrategy,
    registry: Arc<AdapterRegistry>,
    max_concurrency: usize,
}

impl BaselineSelector {
    pub fn new(strategy: BaselineStrategy, registry: Arc<AdapterRegistry>) -> Self {
        Self {
            strategy,
            registry,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// 1 fetches baselines one after another
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn strategy(&self) -> &BaselineStrategy {
        &self.strategy
    }

    pub fn plan(
        &self,
        baselines: &[ProjectConfig],
        targets: &[ProjectScanResult],
    ) -> Result<Vec<FetchPlan>, CheckError> {
        plan(&self.strategy, baselines, targets)
    }

    /// Fetch the baseline builds the strategy selects, in plan order
    pub async fn select(
        &self,
        baselines: &[ProjectConfig],
        targets: &[ProjectScanResult],
    ) -> Result<Vec<ProjectScanResult>, CheckError> {
        let plans = self.plan(baselines, targets)?;
        info!(
            strategy = %self.strategy,
            baselines = plans.len(),
            "baseline plan ready"
        );

        try_join_ordered(CheckStage::SelectBaselines, plans, self.max_concurrency, |plan| {
            execute(Arc::clone(&self.registry), plan)
        })
        .await
    }
}

/// Try each candidate filter until one yields an acceptable build
async fn execute(
    registry: Arc<AdapterRegistry>,
    plan: FetchPlan,
) -> Result<ProjectScanResult, CheckError> {
    let project_id = plan.project.project_id.clone();
    let mut attempts: Vec<FilterAttempt> = Vec::with_capacity(plan.candidates.len());

    for candidate in plan.candidates {
        let mut query = BuildQuery::new(candidate.filter.clone());
        query.require_success = plan.require_success;

        // adapters honour require_success; the status check below covers any that cannot
        match registry.fetch(&plan.project, &query).await {
            Ok(result) if !plan.require_success || result.build_info.is_success() => {
                debug!(
                    project_id = %project_id,
                    filter = %candidate,
                    build_no = %result.build_info.build_no,
                    "baseline build selected"
                );
                return Ok(result);
            }
            Ok(result) => {
                debug!(
                    project_id = %project_id,
                    filter = %candidate,
                    status = ?result.build_info.build_status,
                    "baseline build not successful, trying next candidate"
                );
            }
            Err(err) if err.is_no_match() => {
                debug!(project_id = %project_id, filter = %candidate, "no matching baseline build");
            }
            Err(err) => return Err(CheckError::fetch(CheckStage::SelectBaselines, project_id, err)),
        }
        attempts.push(candidate);
    }

    Err(CheckError::NoMatchingBaseline {
        baseline_project_id: project_id,
        attempts,
    })
}

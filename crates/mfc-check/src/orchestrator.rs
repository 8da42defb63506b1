//! Check orchestration
//!
//! One linear run per call:
//!
//! ```text
//! Init → FetchTargets → SelectBaselines → Merge → Compare → Classify → Assemble
//! ```
//!
//! Any stage error ends the run; no partial result is returned.

use std::sync::Arc;
use std::time::Instant;

use mfc_adapters::{fetch_projects, AdapterRegistry};
use mfc_config::TaskConfig;
use mfc_core::{
    BuildQuery, CheckContext, CheckError, CheckResult, CheckStage, ProjectConfig,
    ProjectScanResult,
};
use mfc_scanner::{FileSetMerger, PathNormalizer, RuleEngine, SetComparator};
use mfc_selectors::BaselineSelector;
use tracing::{info, info_span, Instrument};

fn total_files(results: &[ProjectScanResult]) -> usize {
    results.iter().map(ProjectScanResult::file_count).sum()
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Runs missing-file checks for one task.
///
/// Built once per task: rule patterns are compiled and every project is
/// checked for a registered adapter at construction, so a misconfigured
/// task fails before anything is fetched.
#[derive(Debug, Clone)]
pub struct CheckOrchestrator {
    config: TaskConfig,
    registry: Arc<AdapterRegistry>,
    normalizer: PathNormalizer,
    engine: RuleEngine,
    selector: BaselineSelector,
}

impl CheckOrchestrator {
    pub fn new(config: TaskConfig, registry: Arc<AdapterRegistry>) -> Result<Self, CheckError> {
        if config.max_concurrency == 0 {
            return Err(CheckError::InvalidConfig(
                "max_concurrency must be at least 1".to_string(),
            ));
        }

        let unsupported: Vec<String> = config
            .target_projects
            .iter()
            .chain(&config.baseline_projects)
            .filter(|p| !registry.supports(p.kind()))
            .map(|p| format!("'{}' ({})", p.project_id, p.kind()))
            .collect();
        if !unsupported.is_empty() {
            return Err(CheckError::InvalidConfig(format!(
                "no adapter registered for projects {}",
                unsupported.join(", ")
            )));
        }

        let engine = RuleEngine::new(&config.shield_rules, &config.mapping_rules)?;
        let normalizer = PathNormalizer::new(&config.path_prefixes);
        let selector = BaselineSelector::new(config.strategy.clone(), Arc::clone(&registry))
            .with_max_concurrency(config.max_concurrency);

        Ok(Self {
            config,
            registry,
            normalizer,
            engine,
            selector,
        })
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    pub fn rule_engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub async fn check(&self) -> Result<CheckResult, CheckError> {
        self.check_with(CheckContext::new(&self.config.task_id)).await
    }

    pub async fn check_with(&self, ctx: CheckContext) -> Result<CheckResult, CheckError> {
        let span = info_span!("check", task_id = %ctx.task_id, run_id = %ctx.run_id);
        self.run(ctx).instrument(span).await
    }

    async fn fetch_targets(&self, projects: &[ProjectConfig]) -> Result<Vec<ProjectScanResult>, CheckError> {
        fetch_projects(
            Arc::clone(&self.registry),
            CheckStage::FetchTargets,
            projects,
            BuildQuery::latest(),
            self.config.max_concurrency,
        )
        .await
    }

    async fn run(&self, ctx: CheckContext) -> Result<CheckResult, CheckError> {
        info!(
            strategy = %self.config.strategy,
            targets = self.config.target_projects.len(),
            baselines = self.config.baseline_projects.len(),
            shield_rules = self.engine.shield_count(),
            mapping_rules = self.engine.mapping_count(),
            "starting check"
        );

        let start = Instant::now();
        let targets = self.fetch_targets(&self.config.target_projects).await?;
        info!(
            stage = %CheckStage::FetchTargets,
            projects = targets.len(),
            files = total_files(&targets),
            elapsed_ms = elapsed_ms(start),
            "targets fetched"
        );

        let start = Instant::now();
        let baselines = self.selector.select(&self.config.baseline_projects, &targets).await?;
        info!(
            stage = %CheckStage::SelectBaselines,
            projects = baselines.len(),
            files = total_files(&baselines),
            elapsed_ms = elapsed_ms(start),
            "baselines selected"
        );

        let start = Instant::now();
        let merger = FileSetMerger::new(&self.normalizer);
        let target_map = merger.merge_targets(&targets)?;
        let baseline_map = merger.merge_baselines(&baselines)?;
        info!(
            stage = %CheckStage::Merge,
            target_paths = target_map.len(),
            baseline_paths = baseline_map.len(),
            elapsed_ms = elapsed_ms(start),
            "file sets merged"
        );

        let start = Instant::now();
        let missing = SetComparator::find_missing(&baseline_map, &target_map);
        let failed = SetComparator::find_failed(&baseline_map, &target_map);
        info!(
            stage = %CheckStage::Compare,
            missing = missing.len(),
            failed = failed.len(),
            elapsed_ms = elapsed_ms(start),
            "file sets compared"
        );

        let start = Instant::now();
        let missing_files = self.engine.classify(&missing, &failed, &target_map, &baseline_map);
        info!(
            stage = %CheckStage::Classify,
            classified = missing_files.len(),
            elapsed_ms = elapsed_ms(start),
            "missing files classified"
        );

        let result = CheckResult::assemble(&ctx, &targets, &baselines, missing_files);
        let stats = &result.statistics;
        info!(
            stage = %CheckStage::Assemble,
            missed = stats.missed_count,
            failed = stats.failed_count,
            shielded = stats.shielded_count,
            remapped = stats.remapped_count,
            fingerprint = %result.fingerprint,
            "check complete"
        );

        Ok(result)
    }
}

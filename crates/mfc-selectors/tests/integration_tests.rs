//! Strategy behaviour against an in-memory adapter.

use std::sync::Arc;
use std::time::Duration;

use mfc_adapters::{AdapterRegistry, StaticAdapter};
use mfc_core::{
    BaselineStrategy, BuildFilter, BuildInfo, BuildStatus, CheckError, Connection, FileEntry,
    ProjectConfig, ProjectKind, ProjectScanResult, SelectorParams,
};
use mfc_selectors::BaselineSelector;

fn project(id: &str) -> ProjectConfig {
    ProjectConfig::new(id, Connection::local("unused.json", "unused.json"))
}

fn build(project_id: &str, build_no: &str, commit: &str, version: &str, status: BuildStatus) -> ProjectScanResult {
    ProjectScanResult::new(
        project_id,
        BuildInfo::new(build_no)
            .with_commit(commit)
            .with_version(version)
            .with_status(status),
        vec![FileEntry::success(format!("{}/{}.py", project_id, build_no))],
    )
}

fn target(id: &str, commit: &str, version: &str) -> ProjectScanResult {
    build(id, "T", commit, version, BuildStatus::Success)
}

fn registry(adapter: StaticAdapter) -> Arc<AdapterRegistry> {
    Arc::new(AdapterRegistry::new().with(ProjectKind::Local, Arc::new(adapter)))
}

/// Builds are added oldest first
fn standard_adapter() -> StaticAdapter {
    StaticAdapter::new()
        .with_build(build("b1", "10", "c1", "1.0", BuildStatus::Success))
        .with_build(build("b1", "11", "c2", "1.1", BuildStatus::Success))
        .with_build(build("b1", "12", "c3", "1.2", BuildStatus::Failed))
        .with_build(build("b2", "20", "c1", "1.0", BuildStatus::Success))
        .with_build(build("b2", "21", "c2", "1.1", BuildStatus::Failed))
}

fn build_numbers(results: &[ProjectScanResult]) -> Vec<&str> {
    results.iter().map(|r| r.build_info.build_no.as_str()).collect()
}

#[tokio::test]
async fn test_latest_success_commit_id() {
    let selector = BaselineSelector::new(BaselineStrategy::LatestSuccessCommitId, registry(standard_adapter()));

    let results = selector
        .select(&[project("b1")], &[target("t1", "c2", "")])
        .await
        .unwrap();
    assert_eq!(build_numbers(&results), vec!["11"]);
}

#[tokio::test]
async fn test_commit_match_moves_past_failed_build() {
    // b2 at c2 failed; c1 from the second target succeeds
    let selector = BaselineSelector::new(BaselineStrategy::LatestSuccessCommitId, registry(standard_adapter()));

    let results = selector
        .select(
            &[project("b1"), project("b2")],
            &[target("t1", "c2", ""), target("t2", "c1", "")],
        )
        .await
        .unwrap();
    assert_eq!(build_numbers(&results), vec!["11", "20"]);
}

#[tokio::test]
async fn test_no_matching_baseline_lists_attempts() {
    let selector = BaselineSelector::new(BaselineStrategy::LatestSuccessVersion, registry(standard_adapter()));

    let err = selector
        .select(&[project("b2")], &[target("t1", "", "1.1"), target("t2", "", "9.9")])
        .await
        .unwrap_err();

    match err {
        CheckError::NoMatchingBaseline {
            baseline_project_id,
            attempts,
        } => {
            assert_eq!(baseline_project_id, "b2");
            assert_eq!(attempts.len(), 2);
            assert_eq!(attempts[0].filter, BuildFilter::Version("1.1".to_string()));
            assert_eq!(attempts[1].target_project_id.as_deref(), Some("t2"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_specific_baseline_ignores_others() {
    let strategy = BaselineStrategy::SpecificBaselineVersion(SelectorParams::new("b2", "t2"));
    let selector = BaselineSelector::new(strategy, registry(standard_adapter()));

    let results = selector
        .select(
            &[project("b1"), project("b2")],
            &[target("t1", "", "1.1"), target("t2", "", "1.0")],
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].project_id, "b2");
    assert_eq!(results[0].build_info.build_no, "20");
}

#[tokio::test]
async fn test_latest_success_skips_newer_failed_build() {
    let selector = BaselineSelector::new(BaselineStrategy::LatestSuccess, registry(standard_adapter()));

    let results = selector
        .select(&[project("b1"), project("b2")], &[])
        .await
        .unwrap();
    assert_eq!(build_numbers(&results), vec!["11", "20"]);
    assert!(results.iter().all(|r| r.build_info.is_success()));
}

#[tokio::test]
async fn test_latest_success_without_any_successful_build() {
    let adapter = StaticAdapter::new().with_build(build("b3", "30", "c1", "1.0", BuildStatus::Failed));
    let selector = BaselineSelector::new(BaselineStrategy::LatestSuccess, registry(adapter));

    let err = selector.select(&[project("b3")], &[]).await.unwrap_err();
    assert!(matches!(err, CheckError::NoMatchingBaseline { ref baseline_project_id, .. } if baseline_project_id == "b3"));
}

#[tokio::test]
async fn test_commit_strategy_without_target_commit_fails() {
    let adapter = StaticAdapter::new().with_build(build("b1", "10", "zzz", "1.0", BuildStatus::Success));
    let selector = BaselineSelector::new(BaselineStrategy::LatestSuccessCommitId, registry(adapter));

    let err = selector
        .select(&[project("b1")], &[target("t1", "", "1.0")])
        .await
        .unwrap_err();

    match err {
        CheckError::NoMatchingBaseline {
            baseline_project_id,
            attempts,
        } => {
            assert_eq!(baseline_project_id, "b1");
            assert_eq!(attempts.len(), 1);
            assert_eq!(attempts[0].filter, BuildFilter::CommitId(String::new()));
            assert_eq!(attempts[0].target_project_id.as_deref(), Some("t1"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_no_restriction_takes_latest_any_status() {
    let selector = BaselineSelector::new(BaselineStrategy::NoRestriction, registry(standard_adapter()));

    let results = selector
        .select(&[project("b1"), project("b2")], &[])
        .await
        .unwrap();
    assert_eq!(build_numbers(&results), vec!["12", "21"]);
    assert_eq!(results[0].build_info.build_status, BuildStatus::Failed);
}

#[tokio::test]
async fn test_connection_failure_is_fatal() {
    let adapter = standard_adapter().with_failure("b2", "connection refused");
    let selector = BaselineSelector::new(BaselineStrategy::NoRestriction, registry(adapter));

    let err = selector
        .select(&[project("b1"), project("b2")], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, CheckError::AdapterFetch { ref project_id, .. } if project_id == "b2"));
}

#[tokio::test]
async fn test_sequential_and_parallel_select_agree() {
    let adapter = standard_adapter().with_delay(Duration::from_millis(5));
    let registry = registry(adapter);
    let baselines = [project("b1"), project("b2")];
    let targets = [target("t1", "c1", "")];

    let sequential = BaselineSelector::new(BaselineStrategy::LatestSuccessCommitId, Arc::clone(&registry))
        .with_max_concurrency(1)
        .select(&baselines, &targets)
        .await
        .unwrap();
    let parallel = BaselineSelector::new(BaselineStrategy::LatestSuccessCommitId, registry)
        .with_max_concurrency(4)
        .select(&baselines, &targets)
        .await
        .unwrap();

    assert_eq!(sequential, parallel);
}

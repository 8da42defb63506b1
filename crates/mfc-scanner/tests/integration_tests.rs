//! End-to-end classification over in-memory scan results.

use std::collections::BTreeSet;

use mfc_core::{
    BuildInfo, FileEntry, InputTotals, MappingRule, MissingStatus, PathPrefix, ProjectScanResult,
    ResultStatistics, ShieldRule,
};
use mfc_scanner::{classify_results, FileSetMerger, PathNormalizer, RuleEngine, SetComparator};

fn scan(project_id: &str, files: &[(&str, bool)]) -> ProjectScanResult {
    ProjectScanResult::new(
        project_id,
        BuildInfo::new("1"),
        files
            .iter()
            .map(|(path, ok)| {
                if *ok {
                    FileEntry::success(*path)
                } else {
                    FileEntry::failed(*path)
                }
            })
            .collect(),
    )
}

fn ok(paths: &[&'static str]) -> Vec<(&'static str, bool)> {
    paths.iter().map(|p| (*p, true)).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_shielded_and_missed() {
    let engine = RuleEngine::new(&[ShieldRule::new("docs", "docs/*")], &[]).unwrap();
    let baselines = vec![scan("b", &ok(&["a.py", "b.py", "docs/readme.md"]))];
    let targets = vec![scan("t", &ok(&["a.py"]))];

    let files =
        classify_results(&PathNormalizer::default(), &engine, &targets, &baselines).unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, "b.py");
    assert_eq!(files[0].status, MissingStatus::Missed);
    assert_eq!(files[1].path, "docs/readme.md");
    assert_eq!(files[1].status, MissingStatus::Shielded);
    assert_eq!(files[1].shielded_by.as_deref(), Some("docs"));

    let stats = ResultStatistics::compute(&files, InputTotals::default());
    assert_eq!(stats.missed_count, 1);
    assert_eq!(stats.shielded_count, 1);
    assert_eq!(stats.remapped_count, 0);
    assert_eq!(stats.failed_count, 0);
}

#[test]
fn test_remapped() {
    let engine = RuleEngine::new(&[], &[MappingRule::new("mv", "old/(.+)", "new/$1")]).unwrap();
    let files = classify_results(
        &PathNormalizer::default(),
        &engine,
        &[scan("t", &ok(&["new/x.py"]))],
        &[scan("b", &ok(&["old/x.py"]))],
    )
    .unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].status, MissingStatus::Remapped);
    assert_eq!(files[0].remapped_to.as_deref(), Some("new/x.py"));
    assert_eq!(files[0].remapped_by.as_deref(), Some("mv"));
}

#[test]
fn test_failed_in_target() {
    let files = classify_results(
        &PathNormalizer::default(),
        &RuleEngine::default(),
        &[scan("t", &[("c.py", false)])],
        &[scan("b", &ok(&["c.py"]))],
    )
    .unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].status, MissingStatus::Failed);
    assert_eq!(files[0].source_baseline_project_id, "b");
}

#[test]
fn test_failed_bypasses_shield() {
    let engine = RuleEngine::new(&[ShieldRule::new("all", "*")], &[]).unwrap();
    let files = classify_results(
        &PathNormalizer::default(),
        &engine,
        &[scan("t", &[("c.py", false)])],
        &[scan("b", &ok(&["c.py"]))],
    )
    .unwrap();

    assert_eq!(files[0].status, MissingStatus::Failed);
    assert!(files[0].shielded_by.is_none());
}

#[test]
fn test_shared_baseline_path_reported_once() {
    let files = classify_results(
        &PathNormalizer::default(),
        &RuleEngine::default(),
        &[scan("t", &ok(&["other.py"]))],
        &[
            scan("b1", &ok(&["shared/util.py"])),
            scan("b2", &ok(&["shared/util.py"])),
        ],
    )
    .unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].source_baseline_project_id, "b1");
}

#[test]
fn test_prefixes_align_both_sides() {
    let normalizer = PathNormalizer::new(&[
        PathPrefix::new("b", "/srv/base"),
        PathPrefix::new("t", "D:\\ci\\app"),
    ]);
    let files = classify_results(
        &normalizer,
        &RuleEngine::default(),
        &[scan("t", &ok(&["D:\\ci\\app\\src\\a.py"]))],
        &[scan("b", &ok(&["/srv/base/src/a.py", "/srv/base/src/b.py"]))],
    )
    .unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "src/b.py");
}

// =============================================================================
// Properties
// =============================================================================

fn mixed_inputs() -> (Vec<ProjectScanResult>, Vec<ProjectScanResult>, RuleEngine) {
    let targets = vec![
        scan("t1", &[("a.py", true), ("c.py", false), ("new/m.py", true)]),
        scan("t2", &[("d.py", false), ("e.py", true)]),
    ];
    let baselines = vec![
        scan("b1", &ok(&["a.py", "b.py", "c.py", "docs/x.md", "old/m.py"])),
        scan("b2", &ok(&["b.py", "d.py", "old/n.py", "z.py"])),
    ];
    let engine = RuleEngine::new(
        &[ShieldRule::new("docs", "docs/*")],
        &[MappingRule::new("mv", "old/(.+)", "new/$1")],
    )
    .unwrap();
    (targets, baselines, engine)
}

#[test]
fn test_statistics_match_recount() {
    let (targets, baselines, engine) = mixed_inputs();
    let files = classify_results(&PathNormalizer::default(), &engine, &targets, &baselines).unwrap();
    let stats = ResultStatistics::compute(&files, InputTotals::default());

    assert_eq!(
        files.len(),
        stats.missed_count + stats.shielded_count + stats.remapped_count + stats.failed_count
    );
    assert_eq!(stats, ResultStatistics::compute(&files, InputTotals::default()));
}

#[test]
fn test_membership_invariant() {
    let (targets, baselines, engine) = mixed_inputs();
    let normalizer = PathNormalizer::default();
    let merger = FileSetMerger::new(&normalizer);
    let target = merger.merge_targets(&targets).unwrap();
    let baseline = merger.merge_baselines(&baselines).unwrap();

    let files = classify_results(&normalizer, &engine, &targets, &baselines).unwrap();

    let mut seen = BTreeSet::new();
    for file in &files {
        assert!(seen.insert(file.path.clone()), "duplicate {}", file.path);
        assert!(baseline.contains(&file.path));
        match file.status {
            MissingStatus::Failed => {
                assert_eq!(target.status_of(&file.path), Some(mfc_core::FileStatus::Failed))
            }
            _ => assert!(!target.contains(&file.path)),
        }
    }

    let expected_missing = SetComparator::find_missing(&baseline, &target);
    let classified_missing: BTreeSet<String> = files
        .iter()
        .filter(|f| f.status != MissingStatus::Failed)
        .map(|f| f.path.clone())
        .collect();
    assert_eq!(classified_missing, expected_missing);
}

#[test]
fn test_classify_is_idempotent() {
    let (targets, baselines, engine) = mixed_inputs();
    let normalizer = PathNormalizer::default();
    let first = classify_results(&normalizer, &engine, &targets, &baselines).unwrap();
    let second = classify_results(&normalizer, &engine, &targets, &baselines).unwrap();
    assert_eq!(first, second);
    assert_eq!(mfc_core::fingerprint(&first), mfc_core::fingerprint(&second));
}

#[test]
fn test_baseline_order_does_not_change_missing_set() {
    let (targets, baselines, engine) = mixed_inputs();
    let reversed: Vec<_> = baselines.iter().rev().cloned().collect();
    let normalizer = PathNormalizer::default();

    let paths = |b: &[ProjectScanResult]| -> Vec<(String, MissingStatus)> {
        classify_results(&normalizer, &engine, &targets, b)
            .unwrap()
            .into_iter()
            .map(|f| (f.path, f.status))
            .collect()
    };

    assert_eq!(paths(&baselines), paths(&reversed));
}

#[test]
fn test_mixed_classification() {
    let (targets, baselines, engine) = mixed_inputs();
    let files = classify_results(&PathNormalizer::default(), &engine, &targets, &baselines).unwrap();
    let summary: Vec<(&str, MissingStatus)> =
        files.iter().map(|f| (f.path.as_str(), f.status)).collect();

    assert_eq!(
        summary,
        vec![
            ("b.py", MissingStatus::Missed),
            ("docs/x.md", MissingStatus::Shielded),
            ("old/m.py", MissingStatus::Remapped),
            ("old/n.py", MissingStatus::Missed),
            ("z.py", MissingStatus::Missed),
            ("c.py", MissingStatus::Failed),
            ("d.py", MissingStatus::Failed),
        ]
    );
}

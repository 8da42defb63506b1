//! Set difference between merged baseline and target file maps

use std::collections::{BTreeMap, BTreeSet};

use mfc_core::FileStatus;

use crate::merger::MergedFileMap;

pub struct SetComparator;

impl SetComparator {
    /// Baseline paths with no entry at all in the target map
    pub fn find_missing(baseline: &MergedFileMap, target: &MergedFileMap) -> BTreeSet<String> {
        baseline
            .paths()
            .filter(|path| !target.contains(path))
            .map(str::to_string)
            .collect()
    }

    /// Baseline paths the target scanned but failed, with the baseline
    /// project that contributed each one
    pub fn find_failed(baseline: &MergedFileMap, target: &MergedFileMap) -> BTreeMap<String, String> {
        baseline
            .iter()
            .filter(|(path, _)| target.status_of(path) == Some(FileStatus::Failed))
            .map(|(path, entry)| (path.to_string(), entry.source_project_id.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merger::FileSetMerger;
    use crate::normalizer::PathNormalizer;
    use mfc_core::{BuildInfo, FileEntry, ProjectScanResult};

    fn maps() -> (MergedFileMap, MergedFileMap) {
        let normalizer = PathNormalizer::default();
        let merger = FileSetMerger::new(&normalizer);
        let baseline = merger
            .merge_baselines(&[ProjectScanResult::new(
                "b1",
                BuildInfo::new("1"),
                vec![
                    FileEntry::success("a"),
                    FileEntry::success("b"),
                    FileEntry::success("c"),
                ],
            )])
            .unwrap();
        let target = merger
            .merge_targets(&[ProjectScanResult::new(
                "t1",
                BuildInfo::new("2"),
                vec![
                    FileEntry::success("a"),
                    FileEntry::failed("c"),
                    FileEntry::success("extra"),
                ],
            )])
            .unwrap();
        (baseline, target)
    }

    #[test]
    fn test_missing_excludes_failed_and_extra() {
        let (baseline, target) = maps();
        let missing = SetComparator::find_missing(&baseline, &target);
        assert_eq!(missing.into_iter().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_failed_carries_source() {
        let (baseline, target) = maps();
        let failed = SetComparator::find_failed(&baseline, &target);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed.get("c").map(String::as_str), Some("b1"));
    }

    #[test]
    fn test_empty_baseline_yields_nothing() {
        let (_, target) = maps();
        let empty = MergedFileMap::new();
        assert!(SetComparator::find_missing(&empty, &target).is_empty());
        assert!(SetComparator::find_failed(&empty, &target).is_empty());
    }
}

//! MFC Scanner: from raw scan results to classified missing files
//!
//! ```text
//! ProjectScanResult* ─→ PathNormalizer ─→ FileSetMerger ─→ MergedFileMap ×2
//!                                                              │
//!                         SetComparator (missing, failed) ←────┘
//!                                   │
//!                              RuleEngine ─→ Vec<MissingFile>
//! ```
//!
//! Everything here is synchronous and pure; fetching lives in
//! `mfc-adapters`.

pub mod comparator;
pub mod merger;
pub mod normalizer;
pub mod pattern;
pub mod rule_engine;

pub use comparator::SetComparator;
pub use merger::{FileSetMerger, MergedEntry, MergedFileMap};
pub use normalizer::PathNormalizer;
pub use pattern::PathMatcher;
pub use rule_engine::RuleEngine;

use mfc_core::{CheckError, MissingFile, ProjectScanResult};

/// Merge, diff and classify already-fetched results in one call
pub fn classify_results(
    normalizer: &PathNormalizer,
    engine: &RuleEngine,
    targets: &[ProjectScanResult],
    baselines: &[ProjectScanResult],
) -> Result<Vec<MissingFile>, CheckError> {
    let merger = FileSetMerger::new(normalizer);
    let target = merger.merge_targets(targets)?;
    let baseline = merger.merge_baselines(baselines)?;

    let missing = SetComparator::find_missing(&baseline, &target);
    let failed = SetComparator::find_failed(&baseline, &target);

    Ok(engine.classify(&missing, &failed, &target, &baseline))
}

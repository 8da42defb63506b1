//! Merging per-project scan results into one keyed file set
//!
//! Targets and baselines merge under different collision policies:
//! - targets: a path counts as scanned if any occurrence succeeded
//! - baselines: the first project (in configuration order) keeps the path

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use mfc_core::{CheckError, FileStatus, ProjectScanResult};
use tracing::debug;

use crate::normalizer::PathNormalizer;

/// Where a merged path came from and how it scanned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedEntry {
    pub status: FileStatus,
    pub source_project_id: String,
}

/// normalized path → entry, ordered by path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedFileMap {
    entries: BTreeMap<String, MergedEntry>,
}

impl MergedFileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&MergedEntry> {
        self.entries.get(path)
    }

    pub fn status_of(&self, path: &str) -> Option<FileStatus> {
        self.entries.get(path).map(|e| e.status)
    }

    pub fn source_of(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(|e| e.source_project_id.as_str())
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MergedEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Collision policy when two projects report the same normalized path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collision {
    SuccessWins,
    FirstWins,
}

#[derive(Debug, Clone, Copy)]
pub struct FileSetMerger<'a> {
    normalizer: &'a PathNormalizer,
}

impl<'a> FileSetMerger<'a> {
    pub fn new(normalizer: &'a PathNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn merge_targets(&self, results: &[ProjectScanResult]) -> Result<MergedFileMap, CheckError> {
        self.merge(results, Collision::SuccessWins)
    }

    pub fn merge_baselines(&self, results: &[ProjectScanResult]) -> Result<MergedFileMap, CheckError> {
        self.merge(results, Collision::FirstWins)
    }

    fn merge(
        &self,
        results: &[ProjectScanResult],
        policy: Collision,
    ) -> Result<MergedFileMap, CheckError> {
        let mut merged = MergedFileMap::new();

        for result in results {
            for file in &result.files {
                let path = self.normalizer.normalize(&file.path, &result.project_id)?;

                match merged.entries.entry(path) {
                    Entry::Vacant(slot) => {
                        slot.insert(MergedEntry {
                            status: file.status,
                            source_project_id: result.project_id.clone(),
                        });
                    }
                    Entry::Occupied(mut slot) => match policy {
                        Collision::SuccessWins => {
                            let existing = slot.get_mut();
                            if existing.status == FileStatus::Failed
                                && file.status == FileStatus::Success
                            {
                                existing.status = FileStatus::Success;
                                existing.source_project_id = result.project_id.clone();
                            }
                        }
                        Collision::FirstWins => {
                            debug!(
                                path = %slot.key(),
                                kept = %slot.get().source_project_id,
                                dropped = %result.project_id,
                                "baseline path collision"
                            );
                        }
                    },
                }
            }
        }

        Ok(merged)
    }
}

//! Data Model: scan results in, classified missing files out
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::context::CheckContext;

/// Scan outcome of a single file inside a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Success,
    Failed,
}

impl FromStr for FileStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "success" => Ok(FileStatus::Success),
            "failed" => Ok(FileStatus::Failed),
            other => Err(format!("unknown file status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub status: FileStatus,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }

    pub fn success(path: impl Into<String>) -> Self {
        Self::new(path, FileStatus::Success)
    }

    pub fn failed(path: impl Into<String>) -> Self {
        Self::new(path, FileStatus::Failed)
    }

    pub fn is_failed(&self) -> bool {
        self.status == FileStatus::Failed
    }
}

/// Outcome of a whole build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    #[default]
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildStatus::Success => write!(f, "success"),
            BuildStatus::Failed => write!(f, "failed"),
            BuildStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Provenance of a file list: the build that produced it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildInfo {
    pub build_no: String,
    pub build_status: BuildStatus,
    pub branch: String,
    pub commit_id: String,
    #[serde(alias = "b_version")]
    pub version: String,
    pub build_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl BuildInfo {
    pub fn new(build_no: impl Into<String>) -> Self {
        Self {
            build_no: build_no.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: BuildStatus) -> Self {
        self.build_status = status;
        self
    }

    pub fn with_commit(mut self, commit_id: impl Into<String>) -> Self {
        self.commit_id = commit_id.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn is_success(&self) -> bool {
        self.build_status == BuildStatus::Success
    }
}

/// File list of one project as fetched by an adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectScanResult {
    pub project_id: String,
    pub build_info: BuildInfo,
    pub files: Vec<FileEntry>,
}

impl ProjectScanResult {
    pub fn new(project_id: impl Into<String>, build_info: BuildInfo, files: Vec<FileEntry>) -> Self {
        Self {
            project_id: project_id.into(),
            build_info,
            files,
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Classification of a path found missing (or failed) in the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingStatus {
    /// Absent from the target, no rule explains it
    Missed,
    /// Absent from the target, excluded by a shield rule
    Shielded,
    /// Absent under this path, present under a mapped path
    Remapped,
    /// Present in the target, but its scan failed
    Failed,
}

impl MissingStatus {
    /// Missed and failed files need attention; the rest were reviewed.
    pub fn is_issue(&self) -> bool {
        matches!(self, MissingStatus::Missed | MissingStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MissingStatus::Missed => "missed",
            MissingStatus::Shielded => "shielded",
            MissingStatus::Remapped => "remapped",
            MissingStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for MissingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified output record
///
/// The classification fields are written once by the rule engine. The
/// trailing optional fields belong to post-processing analyzers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFile {
    pub path: String,
    pub status: MissingStatus,
    pub source_baseline_project_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shielded_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shielded_remark: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remapped_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remapped_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remapped_remark: Option<String>,

    // === Enrichment ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miss_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_detected_at: Option<DateTime<Utc>>,
}

impl MissingFile {
    fn base(path: impl Into<String>, status: MissingStatus, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status,
            source_baseline_project_id: source.into(),
            shielded_by: None,
            shielded_remark: None,
            remapped_by: None,
            remapped_to: None,
            remapped_remark: None,
            ownership: None,
            miss_reason: None,
            first_detected_at: None,
        }
    }

    pub fn missed(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self::base(path, MissingStatus::Missed, source)
    }

    pub fn failed(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self::base(path, MissingStatus::Failed, source)
    }

    pub fn shielded(
        path: impl Into<String>,
        source: impl Into<String>,
        rule_id: impl Into<String>,
        remark: impl Into<String>,
    ) -> Self {
        let mut file = Self::base(path, MissingStatus::Shielded, source);
        file.shielded_by = Some(rule_id.into());
        file.shielded_remark = Some(remark.into());
        file
    }

    pub fn remapped(
        path: impl Into<String>,
        source: impl Into<String>,
        rule_id: impl Into<String>,
        remapped_to: impl Into<String>,
        remark: impl Into<String>,
    ) -> Self {
        let mut file = Self::base(path, MissingStatus::Remapped, source);
        file.remapped_by = Some(rule_id.into());
        file.remapped_to = Some(remapped_to.into());
        file.remapped_remark = Some(remark.into());
        file
    }

    pub fn is_issue(&self) -> bool {
        self.status.is_issue()
    }
}

/// Aggregate sizes of the fetched inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputTotals {
    pub target_file_count: usize,
    pub baseline_file_count: usize,
    pub target_project_count: usize,
    pub baseline_project_count: usize,
}

impl InputTotals {
    pub fn from_results(targets: &[ProjectScanResult], baselines: &[ProjectScanResult]) -> Self {
        Self {
            target_file_count: targets.iter().map(ProjectScanResult::file_count).sum(),
            baseline_file_count: baselines.iter().map(ProjectScanResult::file_count).sum(),
            target_project_count: targets.len(),
            baseline_project_count: baselines.len(),
        }
    }
}

/// Counts derived from a classified list
///
/// Always produced by [`ResultStatistics::compute`]; never edited by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultStatistics {
    pub missed_count: usize,
    pub failed_count: usize,
    /// shielded + remapped: reviewed, not issues
    pub passed_count: usize,
    pub shielded_count: usize,
    pub remapped_count: usize,
    pub target_file_count: usize,
    pub baseline_file_count: usize,
    pub target_project_count: usize,
    pub baseline_project_count: usize,
}

impl ResultStatistics {
    pub fn compute(missing_files: &[MissingFile], totals: InputTotals) -> Self {
        let mut stats = Self {
            target_file_count: totals.target_file_count,
            baseline_file_count: totals.baseline_file_count,
            target_project_count: totals.target_project_count,
            baseline_project_count: totals.baseline_project_count,
            ..Default::default()
        };

        for file in missing_files {
            match file.status {
                MissingStatus::Missed => stats.missed_count += 1,
                MissingStatus::Failed => stats.failed_count += 1,
                MissingStatus::Shielded => stats.shielded_count += 1,
                MissingStatus::Remapped => stats.remapped_count += 1,
            }
        }
        stats.passed_count = stats.shielded_count + stats.remapped_count;

        stats
    }

    pub fn totals(&self) -> InputTotals {
        InputTotals {
            target_file_count: self.target_file_count,
            baseline_file_count: self.baseline_file_count,
            target_project_count: self.target_project_count,
            baseline_project_count: self.baseline_project_count,
        }
    }

    /// Number of classified records
    pub fn classified_count(&self) -> usize {
        self.missed_count + self.shielded_count + self.remapped_count + self.failed_count
    }

    pub fn issue_count(&self) -> usize {
        self.missed_count + self.failed_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    Target,
    Baseline,
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProjectRole::Target => write!(f, "target"),
            ProjectRole::Baseline => write!(f, "baseline"),
        }
    }
}

/// Which build each compared file list came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildProvenance {
    pub role: ProjectRole,
    pub project_id: String,
    pub build_no: String,
    pub build_status: BuildStatus,
    pub commit_id: String,
    pub version: String,
    pub file_count: usize,
}

impl BuildProvenance {
    pub fn of(role: ProjectRole, result: &ProjectScanResult) -> Self {
        Self {
            role,
            project_id: result.project_id.clone(),
            build_no: result.build_info.build_no.clone(),
            build_status: result.build_info.build_status,
            commit_id: result.build_info.commit_id.clone(),
            version: result.build_info.version.clone(),
            file_count: result.file_count(),
        }
    }
}

/// Outcome of one orchestration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub task_id: String,
    pub run_id: String,
    pub target_project_ids: Vec<String>,
    pub baseline_project_ids: Vec<String>,
    pub missing_files: Vec<MissingFile>,
    pub statistics: ResultStatistics,
    pub builds: Vec<BuildProvenance>,
    /// Digest of the classification fields of `missing_files`
    pub fingerprint: String,
    /// Engine version that produced the result
    #[serde(default)]
    pub engine_version: String,
    #[serde(default)]
    pub started_at: DateTime<Utc>,
    /// When the result was assembled
    pub timestamp: DateTime<Utc>,
}

impl CheckResult {
    pub fn assemble(
        ctx: &CheckContext,
        targets: &[ProjectScanResult],
        baselines: &[ProjectScanResult],
        missing_files: Vec<MissingFile>,
    ) -> Self {
        let statistics =
            ResultStatistics::compute(&missing_files, InputTotals::from_results(targets, baselines));

        let builds = targets
            .iter()
            .map(|r| BuildProvenance::of(ProjectRole::Target, r))
            .chain(baselines.iter().map(|r| BuildProvenance::of(ProjectRole::Baseline, r)))
            .collect();

        Self {
            task_id: ctx.task_id.clone(),
            run_id: ctx.run_id.clone(),
            target_project_ids: targets.iter().map(|r| r.project_id.clone()).collect(),
            baseline_project_ids: baselines.iter().map(|r| r.project_id.clone()).collect(),
            fingerprint: fingerprint(&missing_files),
            missing_files,
            statistics,
            builds,
            engine_version: crate::MFC_VERSION.to_string(),
            started_at: ctx.started_at,
            timestamp: Utc::now(),
        }
    }

    /// Statistics recomputed from the current list
    pub fn recount(&self) -> ResultStatistics {
        ResultStatistics::compute(&self.missing_files, self.statistics.totals())
    }

    pub fn has_issues(&self) -> bool {
        self.missing_files.iter().any(MissingFile::is_issue)
    }

    pub fn with_status(&self, status: MissingStatus) -> impl Iterator<Item = &MissingFile> {
        self.missing_files.iter().filter(move |f| f.status == status)
    }

    pub fn find(&self, path: &str) -> Option<&MissingFile> {
        self.missing_files.iter().find(|f| f.path == path)
    }
}

/// Stable digest over the fields the rule engine writes.
///
/// Enrichment fields are excluded so analyzers never change it.
pub fn fingerprint(missing_files: &[MissingFile]) -> String {
    let mut hasher = blake3::Hasher::new();
    for file in missing_files {
        for field in [
            Some(file.path.as_str()),
            Some(file.status.as_str()),
            Some(file.source_baseline_project_id.as_str()),
            file.shielded_by.as_deref(),
            file.remapped_by.as_deref(),
            file.remapped_to.as_deref(),
        ] {
            hasher.update(field.unwrap_or("").as_bytes());
            hasher.update(&[0]);
        }
        hasher.update(b"\n");
    }
    format!("blake3:{}", hasher.finalize().to_hex())
}

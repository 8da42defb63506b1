//! Adapter contract: the single way scan data enters a check
use async_trait::async_trait;
use mfc_core::{AdapterError, BuildQuery, ProjectConfig, ProjectScanResult};

/// Fetches the file list of one project build.
///
/// Implementations return the newest build satisfying the query, and
/// `AdapterError::NoMatchingBuild` when none does, so selectors can fall
/// through to the next candidate. A query with `require_success` must skip
/// failed builds rather than return them. Retries and timeouts belong to the implementation.
#[async_trait]
pub trait ProjectAdapter: Send + Sync {
    /// Short adapter name for logs (ex: "local")
    fn name(&self) -> &'static str;

    async fn fetch_files(
        &self,
        project: &ProjectConfig,
        query: &BuildQuery,
    ) -> Result<ProjectScanResult, AdapterError>;
}

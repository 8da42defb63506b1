//! In-memory adapter serving preloaded builds
//!
//! Builds are kept newest first per project; a fetch returns the newest
//! build that satisfies the query. Used for dry runs and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use mfc_core::{AdapterError, BuildQuery, ProjectConfig, ProjectScanResult};

use crate::adapter::ProjectAdapter;

#[derive(Debug, Clone, Default)]
pub struct StaticAdapter {
    builds: HashMap<String, Vec<ProjectScanResult>>,
    failures: HashMap<String, String>,
    delay: Option<Duration>,
}

impl StaticAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a build; later calls are treated as newer builds
    pub fn with_build(mut self, result: ProjectScanResult) -> Self {
        self.builds
            .entry(result.project_id.clone())
            .or_default()
            .insert(0, result);
        self
    }

    /// Make every fetch of `project_id` fail with a connection error
    pub fn with_failure(mut self, project_id: impl Into<String>, reason: impl Into<String>) -> Self {
        self.failures.insert(project_id.into(), reason.into());
        self
    }

    /// Delay every fetch, to exercise concurrent paths
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ProjectAdapter for StaticAdapter {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_files(
        &self,
        project: &ProjectConfig,
        query: &BuildQuery,
    ) -> Result<ProjectScanResult, AdapterError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(reason) = self.failures.get(&project.project_id) {
            return Err(AdapterError::Connection {
                project_id: project.project_id.clone(),
                reason: reason.clone(),
            });
        }

        self.builds
            .get(&project.project_id)
            .and_then(|builds| builds.iter().find(|b| query.accepts(&b.build_info)))
            .cloned()
            .ok_or_else(|| AdapterError::NoMatchingBuild {
                project_id: project.project_id.clone(),
                query: query.clone(),
            })
    }
}

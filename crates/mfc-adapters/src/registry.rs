//! Adapter registry, built once and injected into the orchestrator
use std::collections::HashMap;
use std::sync::Arc;

use mfc_core::{AdapterError, BuildQuery, ProjectConfig, ProjectKind, ProjectScanResult};

use crate::adapter::ProjectAdapter;
use crate::local::LocalAdapter;

#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<ProjectKind, Arc<dyn ProjectAdapter>>,
}

impl AdapterRegistry {
    /// Empty registry; every fetch fails with `Unsupported`
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in local-file adapter
    pub fn with_defaults() -> Self {
        Self::new().with(ProjectKind::Local, Arc::new(LocalAdapter::new()))
    }

    pub fn with(mut self, kind: ProjectKind, adapter: Arc<dyn ProjectAdapter>) -> Self {
        self.register(kind, adapter);
        self
    }

    pub fn register(&mut self, kind: ProjectKind, adapter: Arc<dyn ProjectAdapter>) {
        self.adapters.insert(kind, adapter);
    }

    pub fn get(&self, kind: ProjectKind) -> Option<&Arc<dyn ProjectAdapter>> {
        self.adapters.get(&kind)
    }

    pub fn supports(&self, kind: ProjectKind) -> bool {
        self.adapters.contains_key(&kind)
    }

    /// Fetch through the adapter registered for the project's kind
    pub async fn fetch(
        &self,
        project: &ProjectConfig,
        query: &BuildQuery,
    ) -> Result<ProjectScanResult, AdapterError> {
        let adapter = self.get(project.kind()).ok_or_else(|| AdapterError::Unsupported {
            kind: project.kind().to_string(),
        })?;

        tracing::debug!(
            project_id = %project.project_id,
            adapter = adapter.name(),
            %query,
            "fetching project files"
        );

        adapter.fetch_files(project, query).await
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut kinds: Vec<String> = self.adapters.keys().map(|k| k.to_string()).collect();
        kinds.sort();
        f.debug_struct("AdapterRegistry").field("kinds", &kinds).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfc_core::Connection;

    #[tokio::test]
    async fn test_unregistered_kind_is_unsupported() {
        let registry = AdapterRegistry::with_defaults();
        let project = ProjectConfig::new(
            "api-project",
            Connection::Api {
                api_endpoint: "https://scan.example".to_string(),
                token: "t".to_string(),
                project_key: "k".to_string(),
            },
        );

        assert!(registry.supports(ProjectKind::Local));
        assert!(!registry.supports(ProjectKind::Api));

        let err = registry.fetch(&project, &BuildQuery::latest()).await.unwrap_err();
        assert!(matches!(err, AdapterError::Unsupported { ref kind } if kind == "api"));
    }
}

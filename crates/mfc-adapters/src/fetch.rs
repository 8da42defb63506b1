//! Concurrent fetching with barrier semantics
//!
//! All tasks of a stage finish before their results are returned, in input
//! order. The first failure aborts the siblings still in flight.

use std::future::Future;
use std::sync::Arc;

use mfc_core::{BuildQuery, CheckError, CheckStage, ProjectConfig, ProjectScanResult};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::registry::AdapterRegistry;

/// Run `f` over `items` with at most `max_concurrency` tasks in flight.
///
/// With `max_concurrency == 1` items run inline, one after another.
pub async fn try_join_ordered<I, T, F, Fut>(
    stage: CheckStage,
    items: Vec<I>,
    max_concurrency: usize,
    f: F,
) -> Result<Vec<T>, CheckError>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, CheckError>> + Send + 'static,
{
    if max_concurrency <= 1 || items.len() <= 1 {
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            results.push(f(item).await?);
        }
        return Ok(results);
    }

    let total = items.len();
    let semaphore = Arc::new(Semaphore::new(max_concurrency));
    let mut set = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let permits = Arc::clone(&semaphore);
        let task = f(item);
        set.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| CheckError::TaskAborted {
                    stage,
                    reason: e.to_string(),
                })?;
            task.await.map(|value| (index, value))
        });
    }

    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(Ok((index, value))) => slots[index] = Some(value),
            Ok(Err(err)) => {
                set.abort_all();
                tracing::warn!(%stage, error = %err, "fetch failed, cancelling sibling tasks");
                return Err(err);
            }
            Err(join_err) => {
                set.abort_all();
                return Err(CheckError::TaskAborted {
                    stage,
                    reason: join_err.to_string(),
                });
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Fetch every project with the same query
pub async fn fetch_projects(
    registry: Arc<AdapterRegistry>,
    stage: CheckStage,
    projects: &[ProjectConfig],
    query: BuildQuery,
    max_concurrency: usize,
) -> Result<Vec<ProjectScanResult>, CheckError> {
    try_join_ordered(stage, projects.to_vec(), max_concurrency, |project| {
        let registry = Arc::clone(&registry);
        let query = query.clone();
        async move {
            registry
                .fetch(&project, &query)
                .await
                .map_err(|source| CheckError::fetch(stage, project.project_id.clone(), source))
        }
    })
    .await
}

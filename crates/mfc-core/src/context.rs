//! Run context: identity shared by every stage of one check
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct CheckContext {
    pub task_id: String,
    pub run_id: String,
    pub started_at: DateTime<Utc>,
}

impl CheckContext {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
        }
    }
}

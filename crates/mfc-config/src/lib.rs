//! MFC Config: task configuration for missing-file checks
//!
//! ```text
//! task.yaml ─→ RawTaskConfig ─→ validate() ─→ TaskConfig
//!                 (enabled flags,     (strategy resolved,
//!                  strategy name)      enabled rules only)
//! ```

pub mod error;
pub mod loader;
pub mod raw;
pub mod template;
pub mod validate;

pub use error::{ConfigError, ConfigFormat};
pub use loader::{from_json, from_yaml, load, load_raw, parse};
pub use raw::{RawMappingRule, RawShieldRule, RawTaskConfig, DEFAULT_MAX_CONCURRENCY};
pub use template::TEMPLATE;
pub use validate::{validate, TaskConfig};

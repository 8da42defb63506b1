//! MFC Adapters: where scan data comes from
//!
//! Adapters turn a [`ProjectConfig`](mfc_core::ProjectConfig) plus a build
//! query into a [`ProjectScanResult`](mfc_core::ProjectScanResult). The
//! registry maps each project type to its adapter and is handed to the
//! orchestrator once, at construction.
//!
//! ```text
//! ProjectConfig ─┐
//!                ├─→ AdapterRegistry ─→ ProjectAdapter ─→ ProjectScanResult
//! BuildQuery ────┘
//! ```

pub mod adapter;
pub mod fetch;
pub mod local;
pub mod memory;
pub mod registry;

pub use adapter::ProjectAdapter;
pub use fetch::{fetch_projects, try_join_ordered};
pub use local::LocalAdapter;
pub use memory::StaticAdapter;
pub use registry::AdapterRegistry;

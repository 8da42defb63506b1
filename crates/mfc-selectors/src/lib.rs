//! MFC Selectors: which baseline builds a check compares against
//!
//! The six strategies are variants of [`BaselineStrategy`](mfc_core::BaselineStrategy).
//! Selection happens in two steps:
//!
//! ```text
//! strategy + baselines + target results ─→ plan() ─→ Vec<FetchPlan>
//!                                                        │
//!                       AdapterRegistry ←── select() ────┘ (concurrent)
//! ```
//!
//! Every candidate filter of a plan is tried in order; a baseline that
//! exhausts its candidates fails the run with `NoMatchingBaseline`.

pub mod plan;
pub mod selector;

pub use plan::{plan, FetchPlan};
pub use selector::{BaselineSelector, DEFAULT_MAX_CONCURRENCY};

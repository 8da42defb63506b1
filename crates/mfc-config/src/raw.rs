//! On-disk shape of a task configuration, before validation

use serde::{Deserialize, Serialize};

use mfc_core::{MappingRule, PathPrefix, PatternKind, ProjectConfig, SelectorParams, ShieldRule};

pub const DEFAULT_STRATEGY: &str = "latest_success";
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

fn default_strategy() -> String {
    DEFAULT_STRATEGY.to_string()
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTaskConfig {
    pub task_id: String,
    #[serde(default)]
    pub target_projects: Vec<ProjectConfig>,
    #[serde(default)]
    pub baseline_projects: Vec<ProjectConfig>,
    #[serde(default = "default_strategy")]
    pub baseline_selector_strategy: String,
    #[serde(default)]
    pub baseline_selector_params: Option<SelectorParams>,
    #[serde(default)]
    pub shield_rules: Vec<RawShieldRule>,
    #[serde(default)]
    pub mapping_rules: Vec<RawMappingRule>,
    #[serde(default)]
    pub path_prefixes: Vec<PathPrefix>,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawShieldRule {
    pub id: String,
    pub pattern: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub kind: PatternKind,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

impl RawShieldRule {
    pub fn to_rule(&self) -> ShieldRule {
        ShieldRule::new(&self.id, &self.pattern)
            .with_remark(&self.remark)
            .with_kind(self.kind)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMappingRule {
    pub id: String,
    pub source_pattern: String,
    pub target_pattern: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

impl RawMappingRule {
    pub fn to_rule(&self) -> MappingRule {
        MappingRule::new(&self.id, &self.source_pattern, &self.target_pattern).with_remark(&self.remark)
    }
}

//! Validation of a raw task configuration
//!
//! Every problem is collected before reporting, so one run of
//! `mfc validate` lists everything that needs fixing.

use std::collections::HashSet;

use mfc_core::{BaselineStrategy, MappingRule, PathPrefix, ProjectConfig, ShieldRule};
use mfc_scanner::pattern::anchored_regex;
use mfc_scanner::PathMatcher;
use tracing::warn;

use crate::error::ConfigError;
use crate::raw::RawTaskConfig;

/// A validated task: strategy resolved, only enabled rules kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskConfig {
    pub task_id: String,
    pub target_projects: Vec<ProjectConfig>,
    pub baseline_projects: Vec<ProjectConfig>,
    pub strategy: BaselineStrategy,
    pub shield_rules: Vec<ShieldRule>,
    pub mapping_rules: Vec<MappingRule>,
    pub path_prefixes: Vec<PathPrefix>,
    pub max_concurrency: usize,
}

impl TaskConfig {
    pub fn target_ids(&self) -> Vec<String> {
        self.target_projects.iter().map(|p| p.project_id.clone()).collect()
    }

    pub fn baseline_ids(&self) -> Vec<String> {
        self.baseline_projects.iter().map(|p| p.project_id.clone()).collect()
    }

    /// Same task, fetching one project at a time
    pub fn sequential(mut self) -> Self {
        self.max_concurrency = 1;
        self
    }
}

fn check_projects(role: &str, projects: &[ProjectConfig], problems: &mut Vec<String>) {
    if projects.is_empty() {
        problems.push(format!("at least one {} project is required", role));
    }

    let mut seen = HashSet::new();
    for project in projects {
        if project.project_id.trim().is_empty() {
            problems.push(format!("{} project with empty project_id", role));
            continue;
        }
        if !seen.insert(project.project_id.as_str()) {
            problems.push(format!("duplicate {} project id '{}'", role, project.project_id));
        }
        for field in project.connection.blank_fields() {
            problems.push(format!(
                "{} project '{}': {} connection field '{}' is empty",
                role,
                project.project_id,
                project.kind(),
                field
            ));
        }
    }
}

fn check_rule_ids<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
    problems: &mut Vec<String>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            problems.push(format!("{} rule with empty id", kind));
        } else if !seen.insert(id) {
            problems.push(format!("duplicate {} rule id '{}'", kind, id));
        }
    }
}

fn resolve_strategy(raw: &RawTaskConfig, problems: &mut Vec<String>) -> Option<BaselineStrategy> {
    let strategy = match BaselineStrategy::from_name(
        raw.baseline_selector_strategy.trim(),
        raw.baseline_selector_params.clone(),
    ) {
        Ok(strategy) => strategy,
        Err(reason) => {
            problems.push(reason);
            return None;
        }
    };

    if let Some(params) = strategy.params() {
        if !raw.baseline_projects.iter().any(|p| p.project_id == params.baseline_project_id) {
            problems.push(format!(
                "selector parameter baseline_project_id '{}' is not a configured baseline project",
                params.baseline_project_id
            ));
        }
        if !raw.target_projects.iter().any(|p| p.project_id == params.target_project_id) {
            problems.push(format!(
                "selector parameter target_project_id '{}' is not a configured target project",
                params.target_project_id
            ));
        }
    }

    Some(strategy)
}

/// Prefixes for unconfigured projects are harmless but usually a typo
fn warn_unknown_prefixes(raw: &RawTaskConfig) {
    let known: HashSet<&str> = raw
        .target_projects
        .iter()
        .chain(&raw.baseline_projects)
        .map(|p| p.project_id.as_str())
        .collect();

    for prefix in &raw.path_prefixes {
        if !known.contains(prefix.project_id.as_str()) {
            warn!(
                project_id = %prefix.project_id,
                prefix = %prefix.prefix,
                "path prefix refers to a project that is not configured"
            );
        }
    }
}

/// Validate `raw` and produce the task the engine runs
pub fn validate(raw: RawTaskConfig) -> Result<TaskConfig, ConfigError> {
    let mut problems = Vec::new();

    if raw.task_id.trim().is_empty() {
        problems.push("task_id must not be empty".to_string());
    }

    check_projects("target", &raw.target_projects, &mut problems);
    check_projects("baseline", &raw.baseline_projects, &mut problems);

    let strategy = resolve_strategy(&raw, &mut problems);

    check_rule_ids("shield", raw.shield_rules.iter().map(|r| r.id.as_str()), &mut problems);
    check_rule_ids("mapping", raw.mapping_rules.iter().map(|r| r.id.as_str()), &mut problems);

    let shield_rules: Vec<ShieldRule> = raw
        .shield_rules
        .iter()
        .filter(|r| r.enabled)
        .map(|r| r.to_rule())
        .collect();
    let mapping_rules: Vec<MappingRule> = raw
        .mapping_rules
        .iter()
        .filter(|r| r.enabled)
        .map(|r| r.to_rule())
        .collect();

    for rule in &shield_rules {
        if let Err(err) = PathMatcher::compile(&rule.id, &rule.pattern, rule.kind) {
            problems.push(err.to_string());
        }
    }
    for rule in &mapping_rules {
        if let Err(err) = anchored_regex(&rule.id, &rule.source_pattern) {
            problems.push(err.to_string());
        }
    }

    if raw.max_concurrency == 0 {
        problems.push("max_concurrency must be at least 1".to_string());
    }

    warn_unknown_prefixes(&raw);

    match strategy {
        Some(strategy) if problems.is_empty() => Ok(TaskConfig {
            task_id: raw.task_id,
            target_projects: raw.target_projects,
            baseline_projects: raw.baseline_projects,
            strategy,
            shield_rules,
            mapping_rules,
            path_prefixes: raw.path_prefixes,
            max_concurrency: raw.max_concurrency,
        }),
        _ => Err(ConfigError::Invalid { problems }),
    }
}

//! Classification rules
//!
//! Rules arrive here already filtered to the enabled ones; the
//! classifier only ever sees rules it must apply.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a shield pattern is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Regex if the pattern uses regex-only syntax, glob otherwise; `{a,b}`
    /// stays a glob, brace quantifiers such as `{2,4}` mean regex
    #[default]
    Auto,
    Glob,
    Regex,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PatternKind::Auto => write!(f, "auto"),
            PatternKind::Glob => write!(f, "glob"),
            PatternKind::Regex => write!(f, "regex"),
        }
    }
}

/// Marks a missing path as intentionally excluded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldRule {
    pub id: String,
    pub pattern: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub kind: PatternKind,
}

impl ShieldRule {
    pub fn new(id: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pattern: pattern.into(),
            remark: String::new(),
            kind: PatternKind::Auto,
        }
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = remark.into();
        self
    }

    pub fn with_kind(mut self, kind: PatternKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Reconciles a renamed or relocated file
///
/// `source_pattern` is a regex anchored at the start of the path;
/// `target_pattern` is a replacement template (`$1`, `${name}`, `\1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    pub id: String,
    pub source_pattern: String,
    pub target_pattern: String,
    #[serde(default)]
    pub remark: String,
}

impl MappingRule {
    pub fn new(
        id: impl Into<String>,
        source_pattern: impl Into<String>,
        target_pattern: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_pattern: source_pattern.into(),
            target_pattern: target_pattern.into(),
            remark: String::new(),
        }
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = remark.into();
        self
    }
}

/// Prefix stripped from one project's raw paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPrefix {
    pub project_id: String,
    pub prefix: String,
}

impl PathPrefix {
    pub fn new(project_id: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            prefix: prefix.into(),
        }
    }
}

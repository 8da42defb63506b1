//! Shield and mapping classification
//!
//! Every missing path is offered to the shield rules first, then to the
//! mapping rules, each in configured order; the first rule that applies
//! decides. Paths no rule claims stay `missed`. Failed paths bypass the
//! rules entirely.

use std::collections::{BTreeMap, BTreeSet};

use mfc_core::{CheckError, MappingRule, MissingFile, ShieldRule};
use regex::Regex;
use tracing::debug;

use crate::merger::MergedFileMap;
use crate::pattern::{anchored_regex, convert_template, PathMatcher};

#[derive(Debug, Clone)]
struct CompiledShield {
    rule: ShieldRule,
    matcher: PathMatcher,
}

#[derive(Debug, Clone)]
struct CompiledMapping {
    rule: MappingRule,
    source: Regex,
    template: String,
}

impl CompiledMapping {
    /// Candidate path: expanded template followed by the unmatched tail
    fn rewrite(&self, path: &str) -> Option<String> {
        let caps = self.source.captures(path)?;
        let matched = caps.get(0)?;

        let mut candidate = String::with_capacity(path.len() + self.template.len());
        caps.expand(&self.template, &mut candidate);
        candidate.push_str(&path[matched.end()..]);
        Some(candidate)
    }
}

/// Compiled rule set, built once per run
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    shields: Vec<CompiledShield>,
    mappings: Vec<CompiledMapping>,
}

impl RuleEngine {
    pub fn new(shields: &[ShieldRule], mappings: &[MappingRule]) -> Result<Self, CheckError> {
        let shields = shields
            .iter()
            .map(|rule| {
                PathMatcher::compile(&rule.id, &rule.pattern, rule.kind).map(|matcher| CompiledShield {
                    rule: rule.clone(),
                    matcher,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mappings = mappings
            .iter()
            .map(|rule| {
                anchored_regex(&rule.id, &rule.source_pattern).map(|source| CompiledMapping {
                    rule: rule.clone(),
                    source,
                    template: convert_template(&rule.target_pattern),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { shields, mappings })
    }

    pub fn shield_count(&self) -> usize {
        self.shields.len()
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    /// First shield rule matching `path`
    pub fn shield_for(&self, path: &str) -> Option<&ShieldRule> {
        self.shields
            .iter()
            .find(|s| s.matcher.is_match(path))
            .map(|s| &s.rule)
    }

    /// First mapping rule whose rewrite of `path` exists in the target
    pub fn remap(&self, path: &str, target: &MergedFileMap) -> Option<(&MappingRule, String)> {
        self.mappings.iter().find_map(|m| {
            let candidate = m.rewrite(path)?;
            if target.contains(&candidate) {
                Some((&m.rule, candidate))
            } else {
                debug!(rule = %m.rule.id, %path, %candidate, "mapping candidate absent from target");
                None
            }
        })
    }

    /// Classify one missing path
    pub fn classify_path(&self, path: &str, source: &str, target: &MergedFileMap) -> MissingFile {
        if let Some(rule) = self.shield_for(path) {
            debug!(rule = %rule.id, %path, "shielded");
            return MissingFile::shielded(path, source, &rule.id, &rule.remark);
        }

        if let Some((rule, remapped_to)) = self.remap(path, target) {
            debug!(rule = %rule.id, %path, to = %remapped_to, "remapped");
            return MissingFile::remapped(path, source, &rule.id, remapped_to, &rule.remark);
        }

        MissingFile::missed(path, source)
    }

    /// Classify every missing path, then append the failed ones.
    ///
    /// Output is ordered by path within each group.
    pub fn classify(
        &self,
        missing: &BTreeSet<String>,
        failed: &BTreeMap<String, String>,
        target: &MergedFileMap,
        baseline: &MergedFileMap,
    ) -> Vec<MissingFile> {
        let mut out = Vec::with_capacity(missing.len() + failed.len());

        for path in missing {
            let source = baseline.source_of(path).unwrap_or_default();
            out.push(self.classify_path(path, source, target));
        }

        out.extend(
            failed
                .iter()
                .map(|(path, source)| MissingFile::failed(path.as_str(), source.as_str())),
        );

        out
    }
}

//! Path normalization for comparison.
//!
//! Turns a raw scanner path into the canonical key used on both sides of
//! the diff:
//! - backslashes become forward slashes
//! - the longest configured prefix for the project is stripped, together
//!   with a single following separator
//!
//! Paths with no matching prefix keep everything but their separators.

use std::collections::HashMap;

use mfc_core::{CheckError, PathPrefix};

#[derive(Debug, Clone, Default)]
pub struct PathNormalizer {
    /// project_id → prefixes, longest first
    prefixes: HashMap<String, Vec<String>>,
}

fn unify_separators(path: &str) -> String {
    path.replace('\\', "/")
}

impl PathNormalizer {
    pub fn new(prefixes: &[PathPrefix]) -> Self {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();

        for entry in prefixes {
            let prefix = unify_separators(entry.prefix.trim());
            if prefix.is_empty() {
                continue;
            }
            let list = map.entry(entry.project_id.clone()).or_default();
            if !list.contains(&prefix) {
                list.push(prefix);
            }
        }

        for list in map.values_mut() {
            // Stable: equal lengths keep configured order
            list.sort_by(|a, b| b.len().cmp(&a.len()));
        }

        Self { prefixes: map }
    }

    /// Prefixes configured for a project, in matching order
    pub fn prefixes_for(&self, project_id: &str) -> &[String] {
        self.prefixes.get(project_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn normalize(&self, raw_path: &str, project_id: &str) -> Result<String, CheckError> {
        let invalid = |reason: &str| CheckError::InvalidPath {
            project_id: project_id.to_string(),
            path: raw_path.to_string(),
            reason: reason.to_string(),
        };

        if raw_path.trim().is_empty() {
            return Err(invalid("empty path"));
        }

        let unified = unify_separators(raw_path);

        for prefix in self.prefixes_for(project_id) {
            let Some(rest) = unified.strip_prefix(prefix.as_str()) else {
                continue;
            };
            // "/srv/app" must not match "/srv/application/x"
            if !(rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/')) {
                continue;
            }

            let relative = rest.strip_prefix('/').unwrap_or(rest);
            if relative.is_empty() {
                return Err(invalid("path is the configured prefix itself"));
            }
            return Ok(relative.to_string());
        }

        Ok(unified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> PathNormalizer {
        PathNormalizer::new(&[
            PathPrefix::new("base", "/srv/base"),
            PathPrefix::new("base", "/srv/base/checkout/"),
            PathPrefix::new("win", "C:\\work\\app"),
        ])
    }

    #[test]
    fn test_strip_prefix_and_separator() {
        assert_eq!(normalizer().normalize("/srv/base/src/a.py", "base").unwrap(), "src/a.py");
    }

    #[test]
    fn test_longest_prefix_wins() {
        assert_eq!(
            normalizer().normalize("/srv/base/checkout/src/a.py", "base").unwrap(),
            "src/a.py"
        );
    }

    #[test]
    fn test_backslashes_unified_before_matching() {
        assert_eq!(
            normalizer().normalize("C:\\work\\app\\src\\main.rs", "win").unwrap(),
            "src/main.rs"
        );
    }

    #[test]
    fn test_prefix_respects_segment_boundary() {
        assert_eq!(
            normalizer().normalize("/srv/baseline/a.py", "base").unwrap(),
            "/srv/baseline/a.py"
        );
    }

    #[test]
    fn test_unknown_project_only_unifies_separators() {
        assert_eq!(normalizer().normalize("src\\lib\\x.py", "other").unwrap(), "src/lib/x.py");
    }

    #[test]
    fn test_empty_path_rejected() {
        let err = normalizer().normalize("   ", "base").unwrap_err();
        assert!(matches!(err, CheckError::InvalidPath { .. }));
    }

    #[test]
    fn test_prefix_only_path_rejected() {
        assert!(normalizer().normalize("/srv/base", "base").is_err());
    }

    #[test]
    fn test_deterministic() {
        let n = normalizer();
        let first = n.normalize("/srv/base/x/y.py", "base").unwrap();
        let second = n.normalize("/srv/base/x/y.py", "base").unwrap();
        assert_eq!(first, second);
    }
}

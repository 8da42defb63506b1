use mfc_core::MissingFile;

use super::{AnalysisContext, AnalysisError, Analyzer};

pub const DEFAULT_OWNER: &str = "unknown";

/// Fills `ownership` from path prefixes; the longest matching prefix wins
#[derive(Debug, Clone)]
pub struct OwnershipAnalyzer {
    /// (prefix without trailing slash, owner), longest first
    owners: Vec<(String, String)>,
    default_owner: String,
}

impl Default for OwnershipAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_OWNER)
    }
}

impl OwnershipAnalyzer {
    pub fn new(default_owner: impl Into<String>) -> Self {
        Self {
            owners: Vec::new(),
            default_owner: default_owner.into(),
        }
    }

    pub fn with_owner(mut self, prefix: impl AsRef<str>, owner: impl Into<String>) -> Self {
        let prefix = prefix.as_ref().trim_end_matches('/').to_string();
        self.owners.push((prefix, owner.into()));
        self.owners.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }

    pub fn owner_of(&self, path: &str) -> &str {
        self.owners
            .iter()
            .find(|(prefix, _)| {
                path.strip_prefix(prefix.as_str())
                    .map_or(false, |rest| rest.is_empty() || rest.starts_with('/'))
            })
            .map(|(_, owner)| owner.as_str())
            .unwrap_or(self.default_owner.as_str())
    }
}

impl Analyzer for OwnershipAnalyzer {
    fn name(&self) -> &str {
        "ownership"
    }

    fn analyze(&self, files: &mut [MissingFile], _ctx: &AnalysisContext) -> Result<(), AnalysisError> {
        for file in files.iter_mut().filter(|f| f.ownership.is_none()) {
            file.ownership = Some(self.owner_of(&file.path).to_string());
        }
        Ok(())
    }
}

use mfc_core::{MissingFile, MissingStatus};

use super::{AnalysisContext, AnalysisError, Analyzer};

/// Fills `miss_reason` from the classification
#[derive(Debug, Clone, Copy, Default)]
pub struct ReasonAnalyzer;

fn reason(file: &MissingFile) -> String {
    match file.status {
        MissingStatus::Missed => "not_in_list".to_string(),
        MissingStatus::Failed => "failed_status".to_string(),
        MissingStatus::Shielded => match file.shielded_remark.as_deref() {
            Some(remark) if !remark.is_empty() => format!("shielded: {}", remark),
            _ => "shielded: by rule".to_string(),
        },
        MissingStatus::Remapped => {
            format!("remapped: {}", file.remapped_to.as_deref().unwrap_or_default())
        }
    }
}

impl Analyzer for ReasonAnalyzer {
    fn name(&self) -> &str {
        "reason"
    }

    fn analyze(&self, files: &mut [MissingFile], _ctx: &AnalysisContext) -> Result<(), AnalysisError> {
        for file in files.iter_mut().filter(|f| f.miss_reason.is_none()) {
            file.miss_reason = Some(reason(file));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ctx() -> AnalysisContext {
        AnalysisContext {
            task_id: "T".to_string(),
            run_id: "R".to_string(),
            now: Utc::now(),
        }
    }

    #[test]
    fn test_reasons_per_status() {
        let mut files = vec![
            MissingFile::missed("a", "b"),
            MissingFile::failed("c", "b"),
            MissingFile::shielded("d", "b", "s1", "vendored"),
            MissingFile::shielded("e", "b", "s2", ""),
            MissingFile::remapped("f", "b", "m1", "g", ""),
        ];
        ReasonAnalyzer.analyze(&mut files, &ctx()).unwrap();

        let reasons: Vec<&str> = files.iter().map(|f| f.miss_reason.as_deref().unwrap()).collect();
        assert_eq!(
            reasons,
            vec!["not_in_list", "failed_status", "shielded: vendored", "shielded: by rule", "remapped: g"]
        );
    }

    #[test]
    fn test_existing_reason_kept() {
        let mut file = MissingFile::missed("a", "b");
        file.miss_reason = Some("confirmed".to_string());
        let mut files = vec![file];

        ReasonAnalyzer.analyze(&mut files, &ctx()).unwrap();
        assert_eq!(files[0].miss_reason.as_deref(), Some("confirmed"));
    }
}

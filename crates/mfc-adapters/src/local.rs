//! Local-file adapter
//!
//! Reads one project build from two files:
//! - a build-info JSON document, either `{"project_id": .., "build_info": {..}}`
//!   or the build-info object itself
//! - a file list, `.json` (strings, `{path|file_path, status}` objects, or
//!   `{"files": [..]}`) or `.csv` (header row with a `file_path`/`path`
//!   column and an optional `status` column; fields may be double-quoted)

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

use mfc_core::{
    AdapterError, BuildInfo, BuildQuery, Connection, FileEntry, FileStatus, ProjectConfig,
    ProjectScanResult,
};

use crate::adapter::ProjectAdapter;

#[derive(Debug, Clone, Default)]
pub struct LocalAdapter;

impl LocalAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProjectAdapter for LocalAdapter {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn fetch_files(
        &self,
        project: &ProjectConfig,
        query: &BuildQuery,
    ) -> Result<ProjectScanResult, AdapterError> {
        let (build_info_file, file_list_file) = match &project.connection {
            Connection::Local {
                build_info_file,
                file_list_file,
            } => (build_info_file, file_list_file),
            other => {
                return Err(AdapterError::Unsupported {
                    kind: other.kind().to_string(),
                })
            }
        };

        let build_info = load_build_info(&project.project_id, build_info_file).await?;

        // a local project holds exactly one build
        if !query.accepts(&build_info) {
            return Err(AdapterError::NoMatchingBuild {
                project_id: project.project_id.clone(),
                query: query.clone(),
            });
        }

        let files = load_file_list(&project.project_id, file_list_file).await?;

        tracing::debug!(
            project_id = %project.project_id,
            build_no = %build_info.build_no,
            files = files.len(),
            "loaded local scan result"
        );

        Ok(ProjectScanResult::new(
            project.project_id.clone(),
            build_info,
            files,
        ))
    }
}

async fn read(path: &Path) -> Result<String, AdapterError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AdapterError::Io {
            path: path.display().to_string(),
            source,
        })
}

#[derive(Debug, Deserialize)]
struct BuildInfoDocument {
    #[serde(default)]
    project_id: Option<String>,
    build_info: BuildInfo,
}

/// Parse a build-info document (wrapped or bare)
pub fn parse_build_info(project_id: &str, content: &str) -> Result<BuildInfo, AdapterError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| AdapterError::malformed(project_id, e))?;

    if value.get("build_info").is_some() {
        let doc: BuildInfoDocument =
            serde_json::from_value(value).map_err(|e| AdapterError::malformed(project_id, e))?;
        if let Some(declared) = doc.project_id.as_deref() {
            if declared != project_id {
                tracing::warn!(
                    project_id,
                    declared,
                    "build info declares a different project id; using the configured one"
                );
            }
        }
        Ok(doc.build_info)
    } else {
        serde_json::from_value(value).map_err(|e| AdapterError::malformed(project_id, e))
    }
}

async fn load_build_info(project_id: &str, path: &Path) -> Result<BuildInfo, AdapterError> {
    let content = read(path).await?;
    parse_build_info(project_id, &content)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFileItem {
    Path(String),
    Entry {
        #[serde(alias = "file_path")]
        path: String,
        #[serde(default)]
        status: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFileList {
    List(Vec<RawFileItem>),
    Wrapped { files: Vec<RawFileItem> },
}

fn entry(project_id: &str, path: &str, status: Option<&str>) -> Result<FileEntry, AdapterError> {
    let status: FileStatus = status
        .unwrap_or("")
        .parse()
        .map_err(|e: String| AdapterError::malformed(project_id, format!("{}: {}", path, e)))?;
    Ok(FileEntry::new(path.trim(), status))
}

/// Parse a JSON file list
pub fn parse_json_file_list(project_id: &str, content: &str) -> Result<Vec<FileEntry>, AdapterError> {
    let raw: RawFileList =
        serde_json::from_str(content).map_err(|e| AdapterError::malformed(project_id, e))?;
    let items = match raw {
        RawFileList::List(items) => items,
        RawFileList::Wrapped { files } => files,
    };

    items
        .iter()
        .map(|item| match item {
            RawFileItem::Path(path) => (path.as_str(), None),
            RawFileItem::Entry { path, status } => (path.as_str(), status.as_deref()),
        })
        .filter(|(path, _)| !path.trim().is_empty())
        .map(|(path, status)| entry(project_id, path, status))
        .collect()
}

/// Split one CSV record. Double-quoted fields may hold commas, and `""`
/// inside quotes is a literal quote. Records do not span lines.
fn split_record(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (quoted, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            (true, '"') => quoted = false,
            (true, _) => field.push(c),
            (false, '"') if field.trim().is_empty() => {
                field.clear();
                quoted = true;
            }
            (false, '"') => return Err(format!("unexpected quote in field '{}'", field)),
            (false, ',') => fields.push(std::mem::take(&mut field)),
            (false, _) => field.push(c),
        }
    }

    if quoted {
        return Err(format!("unterminated quoted field in '{}'", line));
    }
    fields.push(field);
    Ok(fields)
}

/// Parse a CSV file list with a header row
pub fn parse_csv_file_list(project_id: &str, content: &str) -> Result<Vec<FileEntry>, AdapterError> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());

    let first = lines
        .next()
        .ok_or_else(|| AdapterError::malformed(project_id, "empty CSV file list"))?;
    let header: Vec<String> = split_record(first.trim_start_matches('\u{feff}'))
        .map_err(|e| AdapterError::malformed(project_id, e))?
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();

    let path_col = header
        .iter()
        .position(|h| h == "file_path" || h == "path")
        .ok_or_else(|| AdapterError::malformed(project_id, "CSV header has no file_path/path column"))?;
    let status_col = header.iter().position(|h| h == "status");

    let mut files = Vec::new();
    for line in lines {
        let fields = split_record(line).map_err(|e| AdapterError::malformed(project_id, e))?;
        let path = match fields.get(path_col) {
            Some(p) if !p.trim().is_empty() => p.as_str(),
            _ => continue,
        };
        let status = status_col.and_then(|c| fields.get(c)).map(|s| s.trim());
        files.push(entry(project_id, path, status)?);
    }

    Ok(files)
}

async fn load_file_list(project_id: &str, path: &Path) -> Result<Vec<FileEntry>, AdapterError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => parse_json_file_list(project_id, &read(path).await?),
        "csv" => parse_csv_file_list(project_id, &read(path).await?),
        other => Err(AdapterError::malformed(
            project_id,
            format!("unsupported file list format '.{}', expected .json or .csv", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped_build_info() {
        let info = parse_build_info(
            "p1",
            r#"{"project_id": "p1", "build_info": {"build_no": "B-9", "commit_id": "abc", "b_version": "2.0"}}"#,
        )
        .unwrap();

        assert_eq!(info.build_no, "B-9");
        assert_eq!(info.commit_id, "abc");
        assert_eq!(info.version, "2.0");
    }

    #[test]
    fn test_parse_bare_build_info() {
        let info = parse_build_info("p1", r#"{"build_no": "B-1", "build_status": "failed"}"#).unwrap();
        assert!(!info.is_success());
    }

    #[test]
    fn test_parse_json_list_shapes() {
        let plain = parse_json_file_list("p1", r#"["a.py", "b.py"]"#).unwrap();
        assert_eq!(plain, vec![FileEntry::success("a.py"), FileEntry::success("b.py")]);

        let objects = parse_json_file_list(
            "p1",
            r#"{"files": [{"file_path": "a.py", "status": "failed"}, {"path": "b.py"}]}"#,
        )
        .unwrap();
        assert_eq!(objects, vec![FileEntry::failed("a.py"), FileEntry::success("b.py")]);
    }

    #[test]
    fn test_parse_json_rejects_unknown_status() {
        let err = parse_json_file_list("p1", r#"[{"path": "a.py", "status": "skipped"}]"#).unwrap_err();
        assert!(matches!(err, AdapterError::Malformed { .. }));
    }

    #[test]
    fn test_parse_csv_list() {
        let csv = "file_path,status\n/proj/src/main.py,success\n/proj/src/test.py,failed\n,success\n";
        let files = parse_csv_file_list("p1", csv).unwrap();

        assert_eq!(
            files,
            vec![
                FileEntry::success("/proj/src/main.py"),
                FileEntry::failed("/proj/src/test.py"),
            ]
        );
    }

    #[test]
    fn test_parse_csv_quoted_fields() {
        let csv = "\"file_path\",status\n\"src/a,b.py\",failed\n\"say \"\"hi\"\".txt\",success\n";
        let files = parse_csv_file_list("p1", csv).unwrap();

        assert_eq!(
            files,
            vec![FileEntry::failed("src/a,b.py"), FileEntry::success("say \"hi\".txt")]
        );
    }

    #[test]
    fn test_parse_csv_rejects_broken_quotes() {
        let err = parse_csv_file_list("p1", "path,status\n\"src/a.py,success\n").unwrap_err();
        assert!(matches!(err, AdapterError::Malformed { .. }));

        let err = parse_csv_file_list("p1", "path,status\nsrc/a\"b.py,success\n").unwrap_err();
        assert!(err.to_string().contains("unexpected quote"));
    }

    #[test]
    fn test_parse_csv_requires_path_column() {
        let err = parse_csv_file_list("p1", "name,status\na,success\n").unwrap_err();
        assert!(err.to_string().contains("file_path"));
    }
}

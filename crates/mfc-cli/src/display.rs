//! Human-readable rendering of check results

use std::fmt::Write;

use mfc_core::{CheckResult, MissingFile, MissingStatus};

fn detail(file: &MissingFile) -> String {
    match file.status {
        MissingStatus::Shielded => {
            let rule = file.shielded_by.as_deref().unwrap_or_default();
            match file.shielded_remark.as_deref() {
                Some(remark) if !remark.is_empty() => format!("{}: {}", rule, remark),
                _ => rule.to_string(),
            }
        }
        MissingStatus::Remapped => format!(
            "{} -> {}",
            file.remapped_by.as_deref().unwrap_or_default(),
            file.remapped_to.as_deref().unwrap_or_default()
        ),
        MissingStatus::Missed | MissingStatus::Failed => String::new(),
    }
}

/// Column width: widest value, at least the header
fn width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values.map(str::len).chain(std::iter::once(header.len())).max().unwrap_or(0)
}

pub fn render_summary(result: &CheckResult) -> String {
    let mut out = String::new();
    let stats = &result.statistics;

    let _ = writeln!(out, "Task {} (run {})", result.task_id, result.run_id);
    let _ = writeln!(out, "Targets:   {}", result.target_project_ids.join(", "));
    let _ = writeln!(out, "Baselines: {}", result.baseline_project_ids.join(", "));

    if !result.builds.is_empty() {
        let _ = writeln!(out, "\nBuilds:");
        for build in &result.builds {
            let _ = writeln!(
                out,
                "  {:<8} {:<20} {:<12} {:<8} commit={} version={}",
                build.role.to_string(),
                build.project_id,
                build.build_no,
                build.build_status.to_string(),
                build.commit_id,
                build.version
            );
        }
    }

    if result.missing_files.is_empty() {
        let _ = writeln!(out, "\nNo missing files.");
    } else {
        let files = &result.missing_files;
        let path_w = width("PATH", files.iter().map(|f| f.path.as_str()));
        let source_w = width("SOURCE", files.iter().map(|f| f.source_baseline_project_id.as_str()));

        let _ = writeln!(out, "\nMissing files:");
        let _ = writeln!(
            out,
            "  {:<9} {:<path_w$} {:<source_w$} DETAIL",
            "STATUS",
            "PATH",
            "SOURCE",
            path_w = path_w,
            source_w = source_w
        );
        for file in files {
            let line = format!(
                "  {:<9} {:<path_w$} {:<source_w$} {}",
                file.status.as_str(),
                file.path,
                file.source_baseline_project_id,
                detail(file),
                path_w = path_w,
                source_w = source_w
            );
            let _ = writeln!(out, "{}", line.trim_end());
        }
    }

    let _ = writeln!(
        out,
        "\nmissed {}, failed {}, shielded {}, remapped {} (target files {}, baseline files {})",
        stats.missed_count,
        stats.failed_count,
        stats.shielded_count,
        stats.remapped_count,
        stats.target_file_count,
        stats.baseline_file_count
    );
    let _ = writeln!(
        out,
        "fingerprint {} (mfc {}, started {})",
        result.fingerprint,
        result.engine_version,
        result.started_at.to_rfc3339()
    );

    out
}

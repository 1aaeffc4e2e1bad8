//! Text rendering of job results

use es_core::{extract_item_issues, ItemIssue, JobKind, JobOutcome, JobSummary, SyncResult};

/// One-line summary of an entity outcome
pub(crate) fn entity_line(result: &SyncResult) -> String {
    let mark = if result.is_success() { "✓" } else { "✗" };
    let mut line = format!("  {} {} ({})", mark, result.label, result.entity_key);
    if !result.message.is_empty() {
        line.push_str(&format!(": {}", result.message));
    }
    line.push_str(&format!(" [{}ms]", result.duration_ms));
    line
}

fn issue_line(issue: &ItemIssue) -> String {
    let mut line = format!("#{}", issue.id);
    if let Some(name) = &issue.name {
        line.push(' ');
        line.push_str(name);
    }
    if let Some(reason) = &issue.reason {
        line.push_str(" - ");
        line.push_str(reason);
    }
    line
}

/// Entity line followed by its failed and skipped records
pub(crate) fn entity_lines(result: &SyncResult) -> Vec<String> {
    let mut lines = vec![entity_line(result)];

    let issues = extract_item_issues(result);
    if !issues.failed.is_empty() {
        lines.push(format!("      failed ({}):", issues.failed.len()));
        lines.extend(issues.failed.iter().map(|i| format!("        {}", issue_line(i))));
    }
    if !issues.skipped.is_empty() {
        lines.push(format!("      skipped ({}):", issues.skipped.len()));
        lines.extend(issues.skipped.iter().map(|i| format!("        {}", issue_line(i))));
    }

    if let Some(detail) = &result.detail {
        lines.extend(detail.skipped_log.iter().map(|l| format!("      > {}", l)));
    }
    lines
}

/// Closing summary line
pub(crate) fn summary_line(kind: JobKind, results: &[SyncResult], elapsed_secs: f64) -> String {
    let summary = JobSummary::from_results(results);
    let headline = match summary.outcome() {
        JobOutcome::Success => format!("{} completed", capitalize(kind)),
        JobOutcome::Partial => format!("{} partially completed", capitalize(kind)),
        JobOutcome::Error => format!("{} failed", capitalize(kind)),
    };
    format!(
        "{}: {} succeeded, {} failed, {} total in {:.1}s",
        headline, summary.success_count, summary.error_count, summary.total, elapsed_secs
    )
}

fn capitalize(kind: JobKind) -> &'static str {
    match kind {
        JobKind::Import => "Import",
        JobKind::Delete => "Delete",
    }
}

/// Print the results panel
///
/// Entity lines are printed while the job runs; with `include_entities`
/// they are repeated here (used when progress output was suppressed).
pub(crate) fn print_results(
    kind: JobKind,
    results: &[SyncResult],
    elapsed_secs: f64,
    include_entities: bool,
) {
    println!();
    for result in results {
        let lines = entity_lines(result);
        let skip = if include_entities { 0 } else { 1 };
        for line in lines.iter().skip(skip) {
            println!("{}", line);
        }
    }
    println!("{}", summary_line(kind, results, elapsed_secs));
}

#[cfg(test)]
mod tests {
    use super::*;
    use es_core::{EntityKey, ItemAction, SyncDetail};

    #[test]
    fn test_entity_line() {
        let ok = SyncResult::success(EntityKey::new("countries"), "Countries", "12 imported")
            .with_duration_ms(40);
        assert_eq!(entity_line(&ok), "  ✓ Countries (countries): 12 imported [40ms]");

        let failed = SyncResult::error(EntityKey::new("products"), "Products", "network timeout");
        assert!(entity_line(&failed).starts_with("  ✗ Products"));
    }

    #[test]
    fn test_entity_lines_include_items() {
        let result = SyncResult::success(EntityKey::new("sales_orders"), "Sales Orders", "done")
            .with_detail(SyncDetail {
                items: vec![
                    ItemIssue::new(7_i64, ItemAction::Failed)
                        .with_name("SO-7")
                        .with_reason("missing client"),
                    ItemIssue::new("x1", ItemAction::Skipped),
                ],
                skipped_log: vec!["order SO-9 already exists".to_string()],
            });

        let lines = entity_lines(&result);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "      failed (1):");
        assert_eq!(lines[2], "        #7 SO-7 - missing client");
        assert_eq!(lines[4], "        #x1");
        assert_eq!(lines[5], "      > order SO-9 already exists");
    }

    #[test]
    fn test_summary_line() {
        let results = vec![
            SyncResult::success(EntityKey::new("safes"), "Safes", "ok"),
            SyncResult::error(EntityKey::new("safe_transactions"), "Safe Transactions", "boom"),
        ];
        assert_eq!(
            summary_line(JobKind::Delete, &results, 2.0),
            "Delete partially completed: 1 succeeded, 1 failed, 2 total in 2.0s"
        );
        assert!(summary_line(JobKind::Import, &[], 0.0).starts_with("Import completed"));
    }
}

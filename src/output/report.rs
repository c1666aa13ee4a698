use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::download::{DownloadReport, LawOutcome};

/// Longest error text shown in the failure table
const ERROR_COLUMN_WIDTH: usize = 80;

/// Human-readable end-of-run summary with a table of failed laws
pub fn format_report(report: &DownloadReport) -> String {
    let mut result = String::new();

    result.push_str(&format!(
        "\n{} Saved: {} | Failed: {} | Total: {}",
        "📊".cyan(),
        report.saved_count().to_string().green(),
        colored_failures(report.failed_count()),
        report.total().to_string().yellow()
    ));
    if report.fallback_count() > 0 {
        result.push_str(&format!(
            " | Found by law number: {}",
            report.fallback_count().to_string().yellow()
        ));
    }
    if report.dropped > 0 {
        result.push_str(&format!(
            " | Listed without law ID: {}",
            report.dropped.to_string().yellow()
        ));
    }
    result.push('\n');

    if report.has_failures() {
        result.push('\n');
        result.push_str(&failure_table(report).to_string());
        result.push('\n');
    }

    result
}

fn colored_failures(count: usize) -> ColoredString {
    if count == 0 {
        count.to_string().green()
    } else {
        count.to_string().red()
    }
}

fn failure_table(report: &DownloadReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Law ID").fg(Color::Cyan),
        Cell::new("Law Number").fg(Color::Cyan),
        Cell::new("Law Name").fg(Color::Cyan),
        Cell::new("Error").fg(Color::Cyan),
    ]);

    for record in report.failed() {
        let error = match &record.outcome {
            LawOutcome::Failed { error } => error.to_string(),
            LawOutcome::Saved { .. } => continue,
        };
        table.add_row(vec![
            Cell::new(&record.summary.law_id),
            Cell::new(record.summary.law_num.as_deref().unwrap_or("-")),
            Cell::new(truncate_string(
                record.summary.law_name.as_deref().unwrap_or("-"),
                40,
            )),
            Cell::new(truncate_string(&error, ERROR_COLUMN_WIDTH)),
        ]);
    }

    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Truncate to `max_chars` characters, marking the cut with "..."
fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

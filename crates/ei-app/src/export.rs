//! Report export as a Markdown document.

use std::fmt::Write as _;
use std::path::Path;

use ei_core::DetailedReport;
use ei_core::format::{format_cost, format_date, format_energy};

use crate::error::{AppError, AppResult};

/// `"q1-industrial-review.md"` style file name derived from the title.
pub fn export_file_name(report: &DetailedReport) -> String {
    let mut slug = String::new();
    for ch in report.title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        format!("report-{}.md", report.id)
    } else {
        format!("{}.md", slug)
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

pub fn render_markdown(report: &DetailedReport) -> String {
    // Writing into a String cannot fail.
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", report.title);
    if !report.description.is_empty() {
        let _ = writeln!(out, "{}\n", report.description);
    }

    let _ = writeln!(out, "## General Information\n");
    let _ = writeln!(out, "- **Status:** {}", report.state);
    let _ = writeln!(
        out,
        "- **Created by:** {} ({})",
        report.created_by.name, report.created_by.email
    );
    let _ = writeln!(out, "- **Created at:** {}", format_date(&report.created_at));
    if let Some(approver) = &report.approved_by {
        let _ = writeln!(out, "- **Approved by:** {} ({})", approver.name, approver.email);
    }
    if let Some(date) = &report.approved_date {
        let _ = writeln!(out, "- **Approved at:** {}", format_date(date));
    }
    let _ = writeln!(out, "- **Last updated:** {}\n", format_date(&report.updated_at));

    let params = &report.parameters;
    let _ = writeln!(out, "## Parameters\n");
    let _ = writeln!(
        out,
        "- **Date range:** {} to {}",
        format_date(&params.date_range.start),
        format_date(&params.date_range.end)
    );
    let _ = writeln!(out, "- **Sectors:** {}", list_or_none(&params.sectors));
    let _ = writeln!(out, "- **Locations:** {}\n", list_or_none(&params.locations));

    let schedule = &report.scheduled_report;
    let _ = writeln!(out, "## Schedule\n");
    if schedule.is_scheduled {
        let _ = writeln!(out, "- **Frequency:** {}", schedule.frequency);
        let _ = writeln!(out, "- **Recipients:** {}\n", list_or_none(&schedule.recipients));
    } else {
        let _ = writeln!(out, "Not scheduled.\n");
    }

    if !report.findings.is_empty() {
        let _ = writeln!(out, "## Findings\n");
        for finding in &report.findings {
            let _ = writeln!(out, "### {} ({})\n", finding.title, finding.importance);
            let _ = writeln!(out, "{}\n", finding.description);
        }
    }

    if !report.recommendations.is_empty() {
        let _ = writeln!(out, "## Recommendations\n");
        for rec in &report.recommendations {
            let _ = writeln!(out, "### {}\n", rec.title);
            let _ = writeln!(out, "{}\n", rec.description);
            let _ = writeln!(out, "- **Estimated savings:** {}", format_cost(rec.estimated_savings));
            let _ = writeln!(out, "- **Difficulty:** {}\n", rec.implementation_difficulty);
        }
    }

    let m = &report.visualization_data.summary_metrics;
    let _ = writeln!(out, "## Summary Metrics\n");
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Total consumption | {} |", format_energy(m.total_consumption));
    let _ = writeln!(out, "| Total cost | {} |", format_cost(m.total_cost));
    let _ = writeln!(out, "| Average consumption | {} |", format_energy(m.average_consumption));
    let _ = writeln!(out, "| Peak consumption | {} |", format_energy(m.peak_consumption));
    let _ = writeln!(out, "| Savings opportunity | {} |", format_cost(m.savings_opportunity));
    out
}

/// Render `report` and write it to `path`.
pub fn export_report(report: &DetailedReport, path: &Path) -> AppResult<()> {
    std::fs::write(path, render_markdown(report)).map_err(|e| AppError::ExportWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(id = %report.id, path = %path.display(), "report exported");
    Ok(())
}

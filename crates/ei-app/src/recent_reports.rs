//! Dashboard "recent reports" tabs.

use ei_core::{Report, ReportStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportTab {
    #[default]
    Approved,
    Draft,
    Pending,
}

impl ReportTab {
    pub const ALL: [ReportTab; 3] = [ReportTab::Approved, ReportTab::Draft, ReportTab::Pending];

    pub fn label(self) -> &'static str {
        match self {
            ReportTab::Approved => "Ready",
            ReportTab::Draft => "Drafts",
            ReportTab::Pending => "Pending",
        }
    }

    pub fn status(self) -> ReportStatus {
        match self {
            ReportTab::Approved => ReportStatus::Approved,
            ReportTab::Draft => ReportStatus::Draft,
            ReportTab::Pending => ReportStatus::Pending,
        }
    }

    pub fn empty_message(self) -> String {
        let kind = match self {
            ReportTab::Approved => "ready",
            ReportTab::Draft => "draft",
            ReportTab::Pending => "pending",
        };
        format!(
            "There are no {} reports available. Try selecting a different category or create a new report.",
            kind
        )
    }
}

/// Reports whose status belongs to `tab`, in their original order.
pub fn filter_reports(reports: &[Report], tab: ReportTab) -> Vec<Report> {
    reports
        .iter()
        .filter(|r| r.status_kind() == tab.status())
        .cloned()
        .collect()
}

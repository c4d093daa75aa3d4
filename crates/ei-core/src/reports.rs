//! Report summaries and detailed reports.

use serde::{Deserialize, Serialize};

use crate::paging::Pagination;

/// Row of the reports table (`GET /api/reports/table`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub date: String,
    pub location: String,
    pub creator: String,
}

impl Report {
    pub fn status_kind(&self) -> ReportStatus {
        ReportStatus::parse(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportsPage {
    pub reports: Vec<Report>,
    pub pagination: Pagination,
}

/// Workflow state of a report, parsed from the backend's free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportStatus {
    Approved,
    Pending,
    Rejected,
    Draft,
    Other,
}

impl ReportStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "approved" => ReportStatus::Approved,
            "pending" | "pending approval" => ReportStatus::Pending,
            "rejected" => ReportStatus::Rejected,
            "draft" => ReportStatus::Draft,
            _ => ReportStatus::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportParameters {
    #[serde(rename = "dateRange")]
    pub date_range: DateRange,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReport {
    pub is_scheduled: bool,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub title: String,
    pub description: String,
    pub importance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub estimated_savings: f64,
    pub implementation_difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub total_consumption: f64,
    pub total_cost: f64,
    pub average_consumption: f64,
    pub peak_consumption: f64,
    pub savings_opportunity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<f64>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationData {
    pub summary_metrics: SummaryMetrics,
    #[serde(default)]
    pub chart_data: Vec<ChartSeries>,
}

/// Full report served by `GET /api/reports/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedReport {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub state: String,
    pub created_by: Person,
    #[serde(default)]
    pub approved_by: Option<Person>,
    #[serde(default)]
    pub approved_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub parameters: ReportParameters,
    pub scheduled_report: ScheduledReport,
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub visualization_data: VisualizationData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(ReportStatus::parse("Approved"), ReportStatus::Approved);
        assert_eq!(
            ReportStatus::parse("Pending Approval"),
            ReportStatus::Pending
        );
        assert_eq!(ReportStatus::parse("DRAFT"), ReportStatus::Draft);
        assert_eq!(ReportStatus::parse("archived"), ReportStatus::Other);
    }

    #[test]
    fn detailed_report_tolerates_missing_optionals() {
        let json = r#"{
            "_id": "r1",
            "title": "Q1 Industrial",
            "description": "Quarterly review",
            "state": "Draft",
            "createdBy": { "_id": "u1", "name": "Ada", "email": "ada@example.com" },
            "createdAt": "2024-01-02T00:00:00.000Z",
            "updatedAt": "2024-01-03T00:00:00.000Z",
            "parameters": {
                "dateRange": { "start": "2024-01-01", "end": "2024-03-31" },
                "sectors": ["Industrial"],
                "locations": ["Texas"]
            },
            "scheduledReport": { "isScheduled": false, "frequency": "", "recipients": [] }
        }"#;

        let report: DetailedReport = serde_json::from_str(json).unwrap();
        assert!(report.approved_by.is_none());
        assert!(report.findings.is_empty());
        assert_eq!(report.visualization_data.summary_metrics.total_cost, 0.0);
    }
}

use ei_app::{OpenAction, ReportDetails};
use ei_core::DetailedReport;
use ei_core::format::{format_cost, format_date, format_energy};

use crate::worker::DetailPurpose;

/// Modal content for the report currently opened by a view.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Loading { id: String },
    Showing(DetailedReport),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    None,
    Close,
    Export,
}

/// Detail lookups plus the modal they feed, one per view.
#[derive(Default)]
pub struct ReportDetailPanel {
    details: ReportDetails,
    modal: ModalState,
}

impl ReportDetailPanel {
    /// Row hovered: fetch to return if a prefetch should start.
    pub fn hover(&mut self, id: &str) -> Option<(String, DetailPurpose)> {
        self.details
            .begin_prefetch(id)
            .then(|| (id.to_string(), DetailPurpose::Prefetch))
    }

    /// Row opened: shows a prefetched report at once, otherwise asks for a fetch.
    pub fn open(&mut self, id: &str) -> Option<(String, DetailPurpose)> {
        match self.details.begin_open(id) {
            OpenAction::Ready(report) => {
                self.modal = ModalState::Showing(report);
                None
            }
            OpenAction::Fetch => {
                self.modal = ModalState::Loading { id: id.to_string() };
                Some((id.to_string(), DetailPurpose::Open))
            }
        }
    }

    pub fn is_loading(&self, id: &str) -> bool {
        self.details.is_loading(id)
    }

    pub fn on_detail(&mut self, id: &str, purpose: DetailPurpose, result: Result<DetailedReport, String>) {
        match purpose {
            DetailPurpose::Prefetch => self.details.finish_prefetch(id, result),
            DetailPurpose::Open => {
                let outcome = self.details.finish_open(id, result);
                // A later open may have replaced the modal already.
                if self.modal != (ModalState::Loading { id: id.to_string() }) {
                    return;
                }
                self.modal = match outcome {
                    Ok(report) => ModalState::Showing(report),
                    Err(e) => ModalState::Failed(e.to_string()),
                };
            }
        }
    }

    /// Draw the modal; returns a report the user asked to export.
    pub fn show(&mut self, ctx: &egui::Context, id_salt: &str) -> Option<DetailedReport> {
        match show(ctx, id_salt, &self.modal) {
            ModalAction::None => None,
            ModalAction::Close => {
                self.modal = ModalState::Closed;
                None
            }
            ModalAction::Export => match &self.modal {
                ModalState::Showing(report) => Some(report.clone()),
                _ => None,
            },
        }
    }
}

pub fn show(ctx: &egui::Context, id_salt: &str, state: &ModalState) -> ModalAction {
    if *state == ModalState::Closed {
        return ModalAction::None;
    }

    let mut open = true;
    let mut action = ModalAction::None;
    let title = match state {
        ModalState::Showing(report) => report.title.clone(),
        _ => "Report Details".to_string(),
    };

    egui::Window::new(title)
        .id(egui::Id::new(("report_modal", id_salt)))
        .collapsible(false)
        .resizable(true)
        .default_width(640.0)
        .open(&mut open)
        .show(ctx, |ui| match state {
            ModalState::Closed => {}
            ModalState::Loading { .. } => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading report details...");
                });
            }
            ModalState::Failed(message) => {
                ui.colored_label(egui::Color32::RED, message);
            }
            ModalState::Showing(report) => {
                egui::ScrollArea::vertical()
                    .max_height(520.0)
                    .show(ui, |ui| report_body(ui, report));
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Export").clicked() {
                        action = ModalAction::Export;
                    }
                    if ui.button("Close").clicked() {
                        action = ModalAction::Close;
                    }
                });
            }
        });

    if !open {
        ModalAction::Close
    } else {
        action
    }
}

fn report_body(ui: &mut egui::Ui, report: &DetailedReport) {
    if !report.description.is_empty() {
        ui.label(&report.description);
        ui.add_space(6.0);
    }

    ui.heading("General Information");
    egui::Grid::new("report_general").num_columns(2).show(ui, |ui| {
        ui.label("Status");
        ui.label(&report.state);
        ui.end_row();
        ui.label("Created by");
        ui.label(format!("{} ({})", report.created_by.name, report.created_by.email));
        ui.end_row();
        ui.label("Created at");
        ui.label(format_date(&report.created_at));
        ui.end_row();
        if let Some(approver) = &report.approved_by {
            ui.label("Approved by");
            ui.label(&approver.name);
            ui.end_row();
        }
        if let Some(date) = &report.approved_date {
            ui.label("Approved at");
            ui.label(format_date(date));
            ui.end_row();
        }
    });

    ui.add_space(6.0);
    ui.heading("Parameters");
    let params = &report.parameters;
    ui.label(format!(
        "{} to {}",
        format_date(&params.date_range.start),
        format_date(&params.date_range.end)
    ));
    ui.label(format!("Sectors: {}", params.sectors.join(", ")));
    ui.label(format!("Locations: {}", params.locations.join(", ")));

    if report.scheduled_report.is_scheduled {
        ui.label(format!(
            "Scheduled {} to {}",
            report.scheduled_report.frequency,
            report.scheduled_report.recipients.join(", ")
        ));
    }

    if !report.findings.is_empty() {
        ui.add_space(6.0);
        ui.heading("Findings");
        for finding in &report.findings {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.strong(&finding.title);
                    ui.weak(format!("({})", finding.importance));
                });
                ui.label(&finding.description);
            });
        }
    }

    if !report.recommendations.is_empty() {
        ui.add_space(6.0);
        ui.heading("Recommendations");
        for rec in &report.recommendations {
            ui.group(|ui| {
                ui.strong(&rec.title);
                ui.label(&rec.description);
                ui.label(format!(
                    "Estimated savings {} · difficulty {}",
                    format_cost(rec.estimated_savings),
                    rec.implementation_difficulty
                ));
            });
        }
    }

    let m = &report.visualization_data.summary_metrics;
    ui.add_space(6.0);
    ui.heading("Summary Metrics");
    egui::Grid::new("report_metrics").num_columns(2).show(ui, |ui| {
        for (label, value) in [
            ("Total consumption", format_energy(m.total_consumption)),
            ("Total cost", format_cost(m.total_cost)),
            ("Average consumption", format_energy(m.average_consumption)),
            ("Peak consumption", format_energy(m.peak_consumption)),
            ("Savings opportunity", format_cost(m.savings_opportunity)),
        ] {
            ui.label(label);
            ui.label(value);
            ui.end_row();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str) -> DetailedReport {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "title": "Monthly usage",
            "description": "",
            "state": "Draft",
            "createdBy": { "_id": "u1", "name": "Ada", "email": "ada@example.com" },
            "createdAt": "2024-04-01T09:00:00.000Z",
            "updatedAt": "2024-04-01T09:00:00.000Z",
            "parameters": {
                "dateRange": { "start": "2024-03-01", "end": "2024-03-31" },
                "sectors": [],
                "locations": []
            },
            "scheduledReport": { "isScheduled": false, "frequency": "", "recipients": [] },
            "findings": [],
            "recommendations": [],
            "visualizationData": {
                "summaryMetrics": { "totalConsumption": 0, "totalCost": 0,
                    "averageConsumption": 0, "peakConsumption": 0, "savingsOpportunity": 0 }
            }
        }))
        .unwrap()
    }

    #[test]
    fn hover_prefetches_once() {
        let mut panel = ReportDetailPanel::default();
        assert_eq!(
            panel.hover("r1"),
            Some(("r1".to_string(), DetailPurpose::Prefetch))
        );
        assert_eq!(panel.hover("r1"), None);
        panel.on_detail("r1", DetailPurpose::Prefetch, Ok(report("r1")));
        assert_eq!(panel.hover("r1"), None);
    }

    #[test]
    fn prefetched_report_opens_without_fetch() {
        let mut panel = ReportDetailPanel::default();
        panel.hover("r1");
        panel.on_detail("r1", DetailPurpose::Prefetch, Ok(report("r1")));
        assert_eq!(panel.open("r1"), None);
        assert_eq!(panel.modal, ModalState::Showing(report("r1")));
    }

    #[test]
    fn failed_open_shows_message() {
        let mut panel = ReportDetailPanel::default();
        assert_eq!(
            panel.open("r2"),
            Some(("r2".to_string(), DetailPurpose::Open))
        );
        assert!(panel.is_loading("r2"));
        panel.on_detail("r2", DetailPurpose::Open, Err("timeout".to_string()));
        assert!(!panel.is_loading("r2"));
        assert_eq!(
            panel.modal,
            ModalState::Failed("Failed to fetch report details".to_string())
        );
    }

    #[test]
    fn late_response_does_not_replace_newer_modal() {
        let mut panel = ReportDetailPanel::default();
        panel.open("r1");
        panel.open("r2");
        panel.on_detail("r1", DetailPurpose::Open, Ok(report("r1")));
        assert_eq!(panel.modal, ModalState::Loading { id: "r2".to_string() });
    }

    #[test]
    fn silent_prefetch_failure_leaves_modal_closed() {
        let mut panel = ReportDetailPanel::default();
        panel.hover("r3");
        panel.on_detail("r3", DetailPurpose::Prefetch, Err("down".to_string()));
        assert_eq!(panel.modal, ModalState::Closed);
        assert!(panel.hover("r3").is_some());
    }
}

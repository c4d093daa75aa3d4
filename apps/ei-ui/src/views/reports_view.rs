use egui_extras::{Column, TableBuilder};
use ei_app::ReportsService;
use ei_client::ApiClient;
use ei_core::format::{format_date, truncate_with_ellipsis};
use ei_core::{DetailedReport, FIRST_PAGE, ReportStatus, ReportsPage};
use ei_state::Pager;

use super::report_modal::ReportDetailPanel;
use crate::worker::DetailPurpose;

const DESCRIPTION_CHARS: usize = 40;

#[derive(Default)]
pub struct ReportsActions {
    pub fetch_page: Option<(u32, usize)>,
    pub fetch_detail: Option<(String, DetailPurpose)>,
    pub export: Option<DetailedReport>,
}

pub struct ReportsView {
    service: ReportsService<ApiClient>,
    current_page: u32,
    /// Last page shown, kept on screen while the next one loads.
    shown: Option<ReportsPage>,
    loading: Option<u32>,
    error: Option<String>,
    detail: ReportDetailPanel,
}

impl ReportsView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            service: ReportsService::new(api),
            current_page: FIRST_PAGE,
            shown: None,
            loading: None,
            error: None,
            detail: ReportDetailPanel::default(),
        }
    }

    pub fn detail_panel(&mut self) -> &mut ReportDetailPanel {
        &mut self.detail
    }

    pub fn on_page(&mut self, page: u32, result: Result<ReportsPage, String>) {
        if self.loading == Some(page) {
            self.loading = None;
        }
        match result {
            Ok(reports) => {
                self.service.store(page, reports.clone());
                if page == self.current_page {
                    self.shown = Some(reports);
                    self.error = None;
                }
            }
            Err(message) if page == self.current_page => self.error = Some(message),
            Err(_) => {}
        }
    }

    fn go_to(&mut self, page: u32, actions: &mut ReportsActions) {
        self.current_page = page;
        self.error = None;
        match self.service.cached(page) {
            Some(reports) => {
                tracing::debug!(page, "reports page served from cache");
                self.shown = Some(reports.clone());
            }
            None => {
                self.loading = Some(page);
                actions.fetch_page = Some((page, self.service.page_size()));
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> ReportsActions {
        let mut actions = ReportsActions::default();
        if self.shown.is_none() && self.loading.is_none() && self.error.is_none() {
            self.go_to(self.current_page, &mut actions);
        }

        ui.horizontal(|ui| {
            ui.heading("Reports");
            if self.loading.is_some() {
                ui.spinner();
            }
        });
        ui.separator();

        if let Some(message) = self.error.clone() {
            ui.colored_label(egui::Color32::RED, message);
            if ui.button("Retry").clicked() {
                self.go_to(self.current_page, &mut actions);
            }
        }

        if let Some(page) = self.shown.clone() {
            if page.reports.is_empty() {
                ui.label("No reports found");
            } else {
                self.table(ui, &page, &mut actions);
            }
            ui.add_space(8.0);
            self.pager(ui, &page, &mut actions);
        }

        actions.export = self.detail.show(ui.ctx(), "reports");
        actions
    }

    fn table(&mut self, ui: &mut egui::Ui, page: &ReportsPage, actions: &mut ReportsActions) {
        let height = (ui.available_height() - 48.0).max(120.0);
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .sense(egui::Sense::click())
            .max_scroll_height(height)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(220.0).at_least(120.0).clip(true))
            .column(Column::initial(260.0).at_least(120.0).clip(true))
            .column(Column::initial(100.0))
            .column(Column::initial(110.0))
            .column(Column::initial(120.0))
            .column(Column::initial(120.0))
            .column(Column::remainder())
            .header(24.0, |mut header| {
                for title in ["Title", "Description", "Status", "Date", "Location", "Creator", ""] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for report in &page.reports {
                    body.row(28.0, |mut row| {
                        row.col(|ui| {
                            ui.label(&report.title);
                        });
                        row.col(|ui| {
                            if report.description.chars().count() > DESCRIPTION_CHARS {
                                ui.label(truncate_with_ellipsis(&report.description, DESCRIPTION_CHARS))
                                    .on_hover_text(&report.description);
                            } else {
                                ui.label(&report.description);
                            }
                        });
                        row.col(|ui| {
                            ui.colored_label(status_color(report.status_kind()), &report.status);
                        });
                        row.col(|ui| {
                            ui.label(format_date(&report.date));
                        });
                        row.col(|ui| {
                            ui.label(&report.location);
                        });
                        row.col(|ui| {
                            ui.label(&report.creator);
                        });
                        let mut view_clicked = false;
                        row.col(|ui| {
                            let busy = self.detail.is_loading(&report.id);
                            let label = if busy { "Loading..." } else { "View" };
                            view_clicked = ui.add_enabled(!busy, egui::Button::new(label)).clicked();
                        });

                        let response = row.response();
                        if view_clicked || response.double_clicked() {
                            actions.fetch_detail = self.detail.open(&report.id);
                        } else if response.hovered() && actions.fetch_detail.is_none() {
                            actions.fetch_detail = self.detail.hover(&report.id);
                        }
                    });
                }
            });
    }

    fn pager(&mut self, ui: &mut egui::Ui, page: &ReportsPage, actions: &mut ReportsActions) {
        let pager = Pager {
            current: self.current_page,
            total_pages: page.pagination.pages,
            total_items: page.pagination.total,
        };
        if pager.total_pages <= 1 {
            ui.label(pager.summary("reports"));
            return;
        }

        let mut target = None;
        ui.horizontal(|ui| {
            if ui.add_enabled(pager.can_prev(), egui::Button::new("Previous")).clicked() {
                target = Some(pager.current - 1);
            }
            let mut previous = 0;
            for number in pager.buttons() {
                if number > previous + 1 {
                    ui.label("…");
                }
                previous = number;
                if ui
                    .selectable_label(number == pager.current, number.to_string())
                    .clicked()
                {
                    target = Some(number);
                }
            }
            if ui.add_enabled(pager.can_next(), egui::Button::new("Next")).clicked() {
                target = Some(pager.current + 1);
            }
        });
        ui.weak(pager.summary("reports"));

        if let Some(number) = target.filter(|n| *n != self.current_page) {
            self.go_to(number, actions);
        }
    }
}

fn status_color(status: ReportStatus) -> egui::Color32 {
    match status {
        ReportStatus::Approved => egui::Color32::from_rgb(34, 160, 80),
        ReportStatus::Pending => egui::Color32::from_rgb(210, 150, 30),
        ReportStatus::Rejected => egui::Color32::from_rgb(200, 60, 60),
        ReportStatus::Draft | ReportStatus::Other => egui::Color32::GRAY,
    }
}

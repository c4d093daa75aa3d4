use egui_plot::{GridMark, Legend, Line, Plot, PlotPoints};
use ei_app::{MetricCard, ReportTab, ReportsService, SavingsService, TimeRange, consumption_series, filter_reports};
use ei_client::{ApiClient, EiaClient};
use ei_core::format::format_date;
use ei_core::{DetailedReport, EiaResponse, EnergyRecord, FIRST_PAGE, ReportsPage, SAVINGS_YEARS, US_STATES};
use ei_state::WindowedLoader;

use super::report_modal::ReportDetailPanel;
use crate::worker::DetailPurpose;

/// Work the dashboard wants the app to start.
#[derive(Default)]
pub struct DashboardActions {
    pub fetch_savings: Option<(String, i32)>,
    pub fetch_recent: Option<(u32, usize)>,
    pub fetch_detail: Option<(String, DetailPurpose)>,
    pub export: Option<DetailedReport>,
}

enum Savings {
    Idle,
    Loading,
    Loaded(Vec<MetricCard>),
    Failed(String),
}

pub struct DashboardView {
    state: String,
    year: i32,
    savings: Savings,
    savings_cache: SavingsService<EiaClient>,
    time_range: TimeRange,
    tab: ReportTab,
    recent_cache: ReportsService<ApiClient>,
    recent_loading: bool,
    recent_error: Option<String>,
    detail: ReportDetailPanel,
}

impl DashboardView {
    pub fn new(api: ApiClient, eia: EiaClient) -> Self {
        Self {
            state: US_STATES[0].0.to_string(),
            year: SAVINGS_YEARS[0],
            savings: Savings::Idle,
            savings_cache: SavingsService::new(eia),
            time_range: TimeRange::default(),
            tab: ReportTab::default(),
            recent_cache: ReportsService::new(api),
            recent_loading: false,
            recent_error: None,
            detail: ReportDetailPanel::default(),
        }
    }

    pub fn on_savings(&mut self, state: &str, year: i32, result: Result<EiaResponse, String>) {
        if state != self.state || year != self.year {
            return;
        }
        self.savings = match result {
            Ok(data) => Savings::Loaded(self.savings_cache.store(state, year, data)),
            Err(message) => Savings::Failed(message),
        };
    }

    pub fn on_recent(&mut self, page: u32, result: Result<ReportsPage, String>) {
        self.recent_loading = false;
        match result {
            Ok(reports) => {
                self.recent_cache.store(page, reports);
                self.recent_error = None;
            }
            Err(message) => self.recent_error = Some(message),
        }
    }

    pub fn detail_panel(&mut self) -> &mut ReportDetailPanel {
        &mut self.detail
    }

    /// Ask for savings for the current selection, from cache when fresh.
    fn refresh_savings(&mut self, has_eia: bool, actions: &mut DashboardActions) {
        if !has_eia {
            self.savings = Savings::Failed("EIA API key is not configured (set EIA_API_KEY)".into());
            return;
        }
        match self.savings_cache.cached(&self.state, self.year) {
            Some(metrics) => self.savings = Savings::Loaded(metrics),
            None => {
                self.savings = Savings::Loading;
                actions.fetch_savings = Some((self.state.clone(), self.year));
            }
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        user_name: &str,
        has_eia: bool,
        records: &WindowedLoader<EnergyRecord>,
    ) -> DashboardActions {
        let mut actions = DashboardActions::default();

        if matches!(self.savings, Savings::Idle) {
            self.refresh_savings(has_eia, &mut actions);
        }
        if self.recent_cache.cached(FIRST_PAGE).is_none() && !self.recent_loading && self.recent_error.is_none() {
            self.recent_loading = true;
            actions.fetch_recent = Some((FIRST_PAGE, self.recent_cache.page_size()));
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading(format!("Welcome back, {}", user_name));
            ui.label("Here's an overview of your energy usage and savings.");
            ui.add_space(12.0);

            self.savings_panel(ui, has_eia, &mut actions);
            ui.add_space(12.0);
            self.chart_panel(ui, records);
            ui.add_space(12.0);
            self.recent_panel(ui, &mut actions);
        });

        actions.export = self.detail.show(ui.ctx(), "dashboard");
        actions
    }

    fn savings_panel(&mut self, ui: &mut egui::Ui, has_eia: bool, actions: &mut DashboardActions) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.strong("Energy Efficiency Savings");
                let mut changed = false;
                let state_name = US_STATES
                    .iter()
                    .find(|(code, _)| *code == self.state)
                    .map(|(_, name)| *name)
                    .unwrap_or("");
                egui::ComboBox::from_id_salt("savings_state")
                    .selected_text(state_name)
                    .show_ui(ui, |ui| {
                        for (code, name) in US_STATES {
                            changed |= ui
                                .selectable_value(&mut self.state, code.to_string(), name)
                                .changed();
                        }
                    });
                egui::ComboBox::from_id_salt("savings_year")
                    .selected_text(self.year.to_string())
                    .show_ui(ui, |ui| {
                        for year in SAVINGS_YEARS {
                            changed |= ui
                                .selectable_value(&mut self.year, year, year.to_string())
                                .changed();
                        }
                    });
                if changed {
                    self.refresh_savings(has_eia, actions);
                }
            });

            match &self.savings {
                Savings::Idle | Savings::Loading => {
                    ui.spinner();
                }
                Savings::Failed(message) => {
                    ui.colored_label(egui::Color32::RED, message);
                }
                Savings::Loaded(metrics) if metrics.is_empty() => {
                    ui.label("No savings data for this selection");
                }
                Savings::Loaded(metrics) => {
                    ui.horizontal_wrapped(|ui| {
                        for metric in metrics {
                            metric_card(ui, metric);
                        }
                    });
                }
            }
        });
    }

    fn chart_panel(&mut self, ui: &mut egui::Ui, records: &WindowedLoader<EnergyRecord>) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.strong("Energy Consumption Trends");
                for range in TimeRange::ALL {
                    ui.selectable_value(&mut self.time_range, range, range.label());
                }
            });

            let today = chrono::Local::now().date_naive();
            let series = consumption_series(
                records.window().iter_loaded().map(|(_, r)| r),
                self.time_range,
                today,
            );
            let points: Vec<[f64; 2]> = series
                .consumption
                .iter()
                .enumerate()
                .map(|(i, kwh)| [i as f64, *kwh])
                .collect();
            let labels = series.labels.clone();

            let plot_points: PlotPoints = points.into();
            Plot::new("consumption_plot")
                .height(240.0)
                .legend(Legend::default())
                .allow_scroll(false)
                .x_axis_formatter(move |mark: GridMark, _range| {
                    let index = mark.value.round();
                    if index < 0.0 || (mark.value - index).abs() > f64::EPSILON {
                        return String::new();
                    }
                    labels.get(index as usize).cloned().unwrap_or_default()
                })
                .y_axis_label("kWh")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new(plot_points).name("Consumption (kWh)"));
                });
            ui.weak(format!("Based on {} loaded records", records.loaded_count()));
        });
    }

    fn recent_panel(&mut self, ui: &mut egui::Ui, actions: &mut DashboardActions) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.strong("Recent Reports");
                for tab in ReportTab::ALL {
                    ui.selectable_value(&mut self.tab, tab, tab.label());
                }
            });

            if let Some(message) = &self.recent_error {
                ui.colored_label(egui::Color32::RED, message);
                if ui.button("Retry").clicked() {
                    self.recent_error = None;
                }
                return;
            }
            let Some(page) = self.recent_cache.cached(FIRST_PAGE) else {
                ui.spinner();
                return;
            };

            let reports = filter_reports(&page.reports, self.tab);
            if reports.is_empty() {
                ui.label(self.tab.empty_message());
                return;
            }
            for report in reports {
                let response = ui
                    .horizontal(|ui| {
                        ui.strong(&report.title);
                        ui.weak(format_date(&report.date));
                        ui.label(&report.location);
                        let busy = self.detail.is_loading(&report.id);
                        ui.add_enabled(!busy, egui::Button::new("View")).clicked()
                    });
                if response.inner {
                    actions.fetch_detail = self.detail.open(&report.id);
                } else if response.response.hovered() && actions.fetch_detail.is_none() {
                    actions.fetch_detail = self.detail.hover(&report.id);
                }
            }
        });
    }
}

fn metric_card(ui: &mut egui::Ui, metric: &MetricCard) {
    ui.group(|ui| {
        ui.set_min_width(220.0);
        ui.vertical(|ui| {
            ui.label(&metric.name);
            ui.heading(&metric.value);
            let (color, arrow) = if metric.change.is_positive {
                (egui::Color32::from_rgb(34, 160, 80), "▲")
            } else {
                (egui::Color32::from_rgb(200, 60, 60), "▼")
            };
            ui.colored_label(color, format!("{} {}", arrow, metric.change.value));
        });
    });
}

use std::path::PathBuf;

use egui_file_dialog::FileDialog;
use ei_app::{AuthService, export_file_name, export_report};
use ei_client::{ApiClient, EiaClient};
use ei_core::DetailedReport;

use crate::views::{
    AuthAction, AuthView, DashboardActions, DashboardView, EnergyView, ReportsActions, ReportsView,
};
use crate::worker::{Requester, Worker, WorkerMessage};

pub struct EnergyInsightApp {
    auth: AuthService,
    eia: EiaClient,
    worker: Worker,
    file_dialog: FileDialog,
    pending_export: Option<DetailedReport>,
    last_directory: Option<PathBuf>,
    status: Option<String>,
    active_view: ViewTab,
    auth_view: AuthView,
    dashboard_view: DashboardView,
    energy_view: EnergyView,
    reports_view: ReportsView,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ViewTab {
    Dashboard,
    Energy,
    Reports,
}

impl EnergyInsightApp {
    pub fn new(cc: &eframe::CreationContext<'_>, api: ApiClient, eia: EiaClient, has_key: bool) -> Self {
        let worker = Worker::new(api.clone(), has_key.then(|| eia.clone()), cc.egui_ctx.clone());
        Self {
            auth: AuthService::new(api.clone()),
            dashboard_view: DashboardView::new(api.clone(), eia.clone()),
            reports_view: ReportsView::new(api),
            eia,
            worker,
            file_dialog: FileDialog::new(),
            pending_export: None,
            last_directory: None,
            status: None,
            active_view: ViewTab::Dashboard,
            auth_view: AuthView::default(),
            energy_view: EnergyView::default(),
        }
    }

    /// Drop everything fetched for the previous user.
    fn reset_views(&mut self) {
        let api = self.worker.api().clone();
        self.dashboard_view = DashboardView::new(api.clone(), self.eia.clone());
        self.reports_view = ReportsView::new(api);
        self.energy_view = EnergyView::default();
        self.auth_view.reset();
        self.active_view = ViewTab::Dashboard;
        self.pending_export = None;
        self.status = None;
    }

    fn logout(&mut self) {
        if let Err(e) = self.auth.logout() {
            tracing::warn!(error = %e, "could not clear the saved session");
        }
        self.reset_views();
    }

    fn poll_worker(&mut self) {
        while let Some(msg) = self.worker.try_recv() {
            match msg {
                WorkerMessage::Auth(Ok(user)) => {
                    tracing::info!(user = %user.email, "signed in");
                    self.reset_views();
                }
                WorkerMessage::Auth(Err(message)) => self.auth_view.set_server_error(message),
                WorkerMessage::EnergyPage(response) => self.energy_view.on_page(response),
                WorkerMessage::ReportsPage {
                    requester,
                    page,
                    result,
                } => match requester {
                    Requester::Dashboard => self.dashboard_view.on_recent(page, result),
                    Requester::Reports => self.reports_view.on_page(page, result),
                },
                WorkerMessage::ReportDetail {
                    requester,
                    id,
                    purpose,
                    result,
                } => {
                    let panel = match requester {
                        Requester::Dashboard => self.dashboard_view.detail_panel(),
                        Requester::Reports => self.reports_view.detail_panel(),
                    };
                    panel.on_detail(&id, purpose, result);
                }
                WorkerMessage::Savings {
                    state,
                    year,
                    result,
                } => self.dashboard_view.on_savings(&state, year, result),
            }
        }
    }

    fn dispatch_auth(&mut self, action: AuthAction) {
        match action {
            AuthAction::Login(request) => self.worker.login(request),
            AuthAction::Register(request) => self.worker.register(request),
        }
    }

    fn dispatch_dashboard(&mut self, actions: DashboardActions) {
        if let Some((state, year)) = actions.fetch_savings {
            self.worker.savings(state, year);
        }
        if let Some((page, limit)) = actions.fetch_recent {
            self.worker.reports_page(Requester::Dashboard, page, limit);
        }
        if let Some((id, purpose)) = actions.fetch_detail {
            self.worker.report_detail(Requester::Dashboard, id, purpose);
        }
        if let Some(report) = actions.export {
            self.begin_export(report);
        }
    }

    fn dispatch_reports(&mut self, actions: ReportsActions) {
        if let Some((page, limit)) = actions.fetch_page {
            self.worker.reports_page(Requester::Reports, page, limit);
        }
        if let Some((id, purpose)) = actions.fetch_detail {
            self.worker.report_detail(Requester::Reports, id, purpose);
        }
        if let Some(report) = actions.export {
            self.begin_export(report);
        }
    }

    fn begin_export(&mut self, report: DetailedReport) {
        let dialog = FileDialog::new().default_file_name(&export_file_name(&report));
        self.file_dialog = match &self.last_directory {
            Some(dir) => dialog.initial_directory(dir.clone()),
            None => dialog,
        };
        self.file_dialog.save_file();
        self.pending_export = Some(report);
    }

    fn finish_export(&mut self, path: PathBuf) {
        let Some(report) = self.pending_export.take() else {
            return;
        };
        self.last_directory = path.parent().map(|p| p.to_path_buf());
        self.status = Some(match export_report(&report, &path) {
            Ok(()) => format!("Exported \"{}\" to {}", report.title, path.display()),
            Err(e) => e.to_string(),
        });
    }

    fn main_screen(&mut self, ctx: &egui::Context, user_name: &str) {
        let mut logout = false;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("EnergyInsight");
                ui.separator();
                ui.selectable_value(&mut self.active_view, ViewTab::Dashboard, "Dashboard");
                ui.selectable_value(&mut self.active_view, ViewTab::Energy, "Energy Data");
                ui.selectable_value(&mut self.active_view, ViewTab::Reports, "Reports");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Logout").clicked() {
                        logout = true;
                    }
                    ui.label(user_name);
                });
            });
        });

        if let Some(status) = self.status.clone() {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(&status);
                    if ui.small_button("Dismiss").clicked() {
                        self.status = None;
                    }
                });
            });
        }

        if logout {
            self.logout();
            return;
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.active_view {
            ViewTab::Dashboard => {
                // The consumption chart reads from the energy window.
                if let Some(request) = self.energy_view.start() {
                    self.worker.energy_page(request);
                }
                let actions = self.dashboard_view.show(
                    ui,
                    user_name,
                    self.worker.has_eia(),
                    self.energy_view.loader(),
                );
                self.dispatch_dashboard(actions);
            }
            ViewTab::Energy => {
                for request in self.energy_view.show(ui) {
                    self.worker.energy_page(request);
                }
            }
            ViewTab::Reports => {
                let actions = self.reports_view.show(ui);
                self.dispatch_reports(actions);
            }
        });
    }
}

impl eframe::App for EnergyInsightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();

        self.file_dialog.update(ctx);
        if let Some(path) = self.file_dialog.take_selected() {
            self.finish_export(path.to_path_buf());
        }

        match self.auth.current_user() {
            Some(user) => self.main_screen(ctx, &user.name),
            None => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    if let Some(action) = self.auth_view.show(ui) {
                        self.dispatch_auth(action);
                    }
                });
            }
        }
    }
}

use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use ei_app::{AuthService, EnergyService};
use ei_client::{ApiClient, EiaClient};
use ei_core::{
    AuthResponse, DetailedReport, EiaResponse, EnergyRecord, LoginRequest, RegisterRequest,
    ReportsPage,
};
use ei_state::{PageRequest, PageResponse, PageSource};

/// Why a report detail was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPurpose {
    Prefetch,
    Open,
}

/// View that asked for a report or report detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Dashboard,
    Reports,
}

#[derive(Debug)]
pub enum WorkerMessage {
    Auth(Result<AuthResponse, String>),
    EnergyPage(PageResponse<EnergyRecord>),
    ReportsPage {
        requester: Requester,
        page: u32,
        result: Result<ReportsPage, String>,
    },
    ReportDetail {
        requester: Requester,
        id: String,
        purpose: DetailPurpose,
        result: Result<DetailedReport, String>,
    },
    Savings {
        state: String,
        year: i32,
        result: Result<EiaResponse, String>,
    },
}

/// Runs blocking HTTP calls on short-lived threads and reports back over a
/// channel drained once per frame.
pub struct Worker {
    api: ApiClient,
    eia: Option<EiaClient>,
    ctx: egui::Context,
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
}

impl Worker {
    pub fn new(api: ApiClient, eia: Option<EiaClient>, ctx: egui::Context) -> Self {
        let (tx, rx) = channel();
        Self {
            api,
            eia,
            ctx,
            tx,
            rx,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn has_eia(&self) -> bool {
        self.eia.is_some()
    }

    pub fn try_recv(&self) -> Option<WorkerMessage> {
        self.rx.try_recv().ok()
    }

    fn spawn(&self, job: impl FnOnce() -> WorkerMessage + Send + 'static) {
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();
        thread::spawn(move || {
            // The receiver only disappears when the app is closing.
            let _ = tx.send(job());
            ctx.request_repaint();
        });
    }

    pub fn login(&self, request: LoginRequest) {
        let auth = AuthService::new(self.api.clone());
        self.spawn(move || WorkerMessage::Auth(auth.login(&request).map_err(|e| e.to_string())));
    }

    pub fn register(&self, request: RegisterRequest) {
        let auth = AuthService::new(self.api.clone());
        self.spawn(move || {
            WorkerMessage::Auth(auth.register(&request).map_err(|e| e.to_string()))
        });
    }

    pub fn energy_page(&self, request: PageRequest) {
        let source = EnergyService::new(self.api.clone());
        self.spawn(move || {
            let result = source.fetch_page(&request).map_err(|e| e.to_string());
            WorkerMessage::EnergyPage(PageResponse { request, result })
        });
    }

    pub fn reports_page(&self, requester: Requester, page: u32, limit: usize) {
        let api = self.api.clone();
        self.spawn(move || WorkerMessage::ReportsPage {
            requester,
            page,
            result: api.reports_page(page, limit).map_err(|e| e.to_string()),
        });
    }

    pub fn report_detail(&self, requester: Requester, id: String, purpose: DetailPurpose) {
        let api = self.api.clone();
        self.spawn(move || {
            let result = api.report(&id).map_err(|e| e.to_string());
            WorkerMessage::ReportDetail {
                requester,
                id,
                purpose,
                result,
            }
        });
    }

    /// No-op without an EIA key; callers check [`Self::has_eia`].
    pub fn savings(&self, state: String, year: i32) {
        let Some(eia) = self.eia.clone() else {
            return;
        };
        self.spawn(move || WorkerMessage::Savings {
            result: eia.savings(&state, year).map_err(|e| e.to_string()),
            state,
            year,
        });
    }
}

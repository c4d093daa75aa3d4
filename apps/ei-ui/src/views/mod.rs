pub mod auth_view;
pub mod dashboard_view;
pub mod energy_view;
pub mod report_modal;
pub mod reports_view;

pub use auth_view::{AuthAction, AuthView};
pub use dashboard_view::{DashboardActions, DashboardView};
pub use energy_view::EnergyView;
pub use report_modal::ReportDetailPanel;
pub use reports_view::{ReportsActions, ReportsView};

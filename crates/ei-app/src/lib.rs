//! Shared application service layer for energyinsight.
//!
//! Both the CLI and the GUI go through these services, so caching, validation
//! and report shaping behave the same in either front end.

pub mod auth_service;
pub mod chart;
pub mod energy_service;
pub mod error;
pub mod export;
pub mod recent_reports;
pub mod report_details;
pub mod reports_service;
pub mod savings_service;

// Re-export key types for convenience
pub use auth_service::AuthService;
pub use chart::{ConsumptionSeries, TimeRange, consumption_series, date_labels};
pub use energy_service::{EnergyService, energy_loader};
pub use error::{AppError, AppResult};
pub use export::{export_file_name, export_report, render_markdown};
pub use recent_reports::{ReportTab, filter_reports};
pub use report_details::{OpenAction, ReportDetails};
pub use reports_service::{REPORTS_CACHE_TTL, ReportsBackend, ReportsService, reports_cache_key};
pub use savings_service::{
    MetricCard, MetricChange, SAVINGS_CACHE_TTL, SavingsBackend, SavingsService,
    process_energy_savings, savings_cache_key,
};

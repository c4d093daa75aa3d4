//! ei-core: shared foundation for energyinsight.
//!
//! Contains:
//! - paging (backend paging protocol constants + pagination envelope)
//! - energy, reports, savings, auth (wire models for the REST backend and EIA)
//! - format (display helpers for dates, quantities and money)
//! - validate (client-side form validation)
//! - error (shared error types)

pub mod auth;
pub mod energy;
pub mod error;
pub mod format;
pub mod paging;
pub mod reports;
pub mod savings;
pub mod validate;

// Re-exports: nice ergonomics for downstream crates
pub use auth::*;
pub use energy::*;
pub use error::{CoreError, CoreResult};
pub use paging::*;
pub use reports::*;
pub use savings::*;

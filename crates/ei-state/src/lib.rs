//! ei-state: view-state core for the energyinsight dashboard.
//!
//! Nothing here performs I/O. Views and services own instances of these
//! types and feed them network results.
//!
//! - window: sparse, index-addressable record window
//! - loader: windowed incremental loader with generation-guarded merges
//! - cache: keyed response cache with per-instance TTL
//! - columns: column visibility controller for the energy table
//! - pager: page-button model for classic paginated tables

pub mod cache;
pub mod columns;
pub mod loader;
pub mod pager;
pub mod window;

pub use cache::{CacheStatus, TtlCache};
pub use columns::{ColumnDescriptor, ColumnKind, ColumnSet};
pub use loader::{
    ErrorNotice, Generation, LoaderConfig, MergeOutcome, PageData, PageRequest, PageResponse,
    PageSource, RowState, WindowedLoader, drive_range,
};
pub use pager::Pager;
pub use window::{RecordWindow, Slot};

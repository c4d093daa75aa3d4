//! Report detail lookups with hover prefetch.
//!
//! The state here is owned by one view. Prefetching a row stores its detail
//! so that opening it later needs no request. A failed prefetch is dropped
//! silently; a failed open surfaces a fixed user-facing message.

use std::collections::{HashMap, HashSet};

use ei_core::DetailedReport;

use crate::error::{AppError, AppResult};
use crate::reports_service::ReportsBackend;

/// What the caller must do to show a report.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenAction {
    Ready(DetailedReport),
    Fetch,
}

#[derive(Debug, Default)]
pub struct ReportDetails {
    prefetched: HashMap<String, DetailedReport>,
    prefetching: HashSet<String>,
    loading: HashSet<String>,
}

impl ReportDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefetched(&self, id: &str) -> Option<&DetailedReport> {
        self.prefetched.get(id)
    }

    pub fn is_loading(&self, id: &str) -> bool {
        self.loading.contains(id)
    }

    /// True if a prefetch for `id` should be issued now.
    pub fn begin_prefetch(&mut self, id: &str) -> bool {
        if self.prefetched.contains_key(id)
            || self.prefetching.contains(id)
            || self.loading.contains(id)
        {
            return false;
        }
        self.prefetching.insert(id.to_string());
        true
    }

    pub fn finish_prefetch<E: std::fmt::Display>(
        &mut self,
        id: &str,
        result: Result<DetailedReport, E>,
    ) {
        self.prefetching.remove(id);
        match result {
            Ok(report) => {
                self.prefetched.insert(id.to_string(), report);
            }
            Err(e) => tracing::debug!(id, error = %e, "report prefetch failed"),
        }
    }

    pub fn begin_open(&mut self, id: &str) -> OpenAction {
        if let Some(report) = self.prefetched.get(id) {
            return OpenAction::Ready(report.clone());
        }
        self.loading.insert(id.to_string());
        OpenAction::Fetch
    }

    pub fn finish_open<E: std::fmt::Display>(
        &mut self,
        id: &str,
        result: Result<DetailedReport, E>,
    ) -> AppResult<DetailedReport> {
        self.loading.remove(id);
        result.map_err(|e| {
            tracing::warn!(id, error = %e, "report details fetch failed");
            AppError::ReportDetails
        })
    }

    /// Prefetch `id` synchronously through `backend`.
    pub fn prefetch_with<B: ReportsBackend>(&mut self, backend: &B, id: &str) {
        if self.begin_prefetch(id) {
            let result = backend.report(id);
            self.finish_prefetch(id, result);
        }
    }

    /// Open `id`, fetching through `backend` unless it was prefetched.
    pub fn open_with<B: ReportsBackend>(&mut self, backend: &B, id: &str) -> AppResult<DetailedReport> {
        match self.begin_open(id) {
            OpenAction::Ready(report) => Ok(report),
            OpenAction::Fetch => {
                let result = backend.report(id);
                self.finish_open(id, result)
            }
        }
    }
}

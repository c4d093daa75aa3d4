//! Reports table paging through a short-lived response cache.

use std::time::{Duration, Instant};

use ei_client::{ApiClient, ClientResult};
use ei_core::{DetailedReport, REPORTS_PAGE_SIZE, ReportsPage};
use ei_state::{CacheStatus, TtlCache};

use crate::error::AppResult;

pub const REPORTS_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Report endpoints the services need.
pub trait ReportsBackend {
    fn reports_page(&self, page: u32, limit: usize) -> ClientResult<ReportsPage>;
    fn report(&self, id: &str) -> ClientResult<DetailedReport>;
}

impl ReportsBackend for ApiClient {
    fn reports_page(&self, page: u32, limit: usize) -> ClientResult<ReportsPage> {
        ApiClient::reports_page(self, page, limit)
    }

    fn report(&self, id: &str) -> ClientResult<DetailedReport> {
        ApiClient::report(self, id)
    }
}

pub fn reports_cache_key(page: u32, limit: usize) -> String {
    format!("{}-{}", page, limit)
}

#[derive(Debug)]
pub struct ReportsService<B = ApiClient> {
    backend: B,
    page_size: usize,
    cache: TtlCache<String, ReportsPage>,
}

impl<B: ReportsBackend> ReportsService<B> {
    pub fn new(backend: B) -> Self {
        Self::with_ttl(backend, REPORTS_CACHE_TTL)
    }

    pub fn with_ttl(backend: B, ttl: Duration) -> Self {
        Self {
            backend,
            page_size: REPORTS_PAGE_SIZE,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&mut self, page: u32) -> AppResult<ReportsPage> {
        self.page_at(page, Instant::now())
    }

    /// Serve `page` from the cache while fresh; otherwise fetch and store it.
    pub fn page_at(&mut self, page: u32, now: Instant) -> AppResult<ReportsPage> {
        let key = reports_cache_key(page, self.page_size);
        let backend = &self.backend;
        let limit = self.page_size;
        let (reports, status) = self
            .cache
            .fetch_through_at(key.clone(), now, || backend.reports_page(page, limit))?;
        match status {
            CacheStatus::Hit => tracing::debug!(%key, "reports cache hit"),
            CacheStatus::Miss => tracing::debug!(%key, "reports cache miss"),
        }
        Ok(reports)
    }

    /// Store a page fetched elsewhere (e.g. on a worker thread).
    pub fn store(&mut self, page: u32, reports: ReportsPage) {
        self.cache
            .insert(reports_cache_key(page, self.page_size), reports);
    }

    /// Fresh cached page, if any.
    pub fn cached(&self, page: u32) -> Option<&ReportsPage> {
        self.cache.get(&reports_cache_key(page, self.page_size))
    }
}

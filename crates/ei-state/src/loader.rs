//! Windowed incremental loader.
//!
//! Presents an effectively unbounded, paged backend sequence as a
//! [`RecordWindow`]. The renderer asks which rows are ready; the loader
//! answers with [`PageRequest`]s for pages that still need fetching. The
//! caller performs the I/O and hands the outcome back through
//! [`WindowedLoader::complete`].
//!
//! Every request carries the [`Generation`] that was current when it was
//! issued. A filter change bumps the generation, so responses belonging to a
//! superseded filter are dropped at merge time instead of corrupting the new
//! window.

use std::collections::BTreeSet;
use std::ops::Range;

use ei_core::{FIRST_PAGE, Pagination, page_base_offset, page_for_index};

use crate::window::RecordWindow;

/// Counter bumped on every filter change.
pub type Generation = u64;

/// Rows past the rendered range that still trigger a fetch.
pub const DEFAULT_LOAD_AHEAD: usize = 15;

#[derive(Debug, Clone, Copy)]
pub struct LoaderConfig {
    pub page_size: usize,
    pub load_ahead: usize,
}

impl LoaderConfig {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            load_ahead: DEFAULT_LOAD_AHEAD,
        }
    }
}

/// A fetch the caller must perform on the loader's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: usize,
    pub location: Option<String>,
    pub generation: Generation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageData<T> {
    pub records: Vec<T>,
    pub pagination: Pagination,
}

/// Outcome of a [`PageRequest`], errors already rendered for display.
#[derive(Debug, Clone)]
pub struct PageResponse<T> {
    pub request: PageRequest,
    pub result: Result<PageData<T>, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged { page: u32, records: usize },
    Failed { page: u32 },
    /// Response belonged to an older generation and was ignored.
    Stale { page: u32, generation: Generation },
}

/// How a fetch error should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorNotice<'a> {
    /// Nothing has loaded yet; the error replaces the table.
    Banner(&'a str),
    /// Some rows are visible; show a smaller notice under them.
    Inline(&'a str),
}

/// What the renderer should draw for one row index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowState<'a, T> {
    Loaded(&'a T),
    Loading,
    /// Past the known end of the data.
    Beyond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollReset {
    Idle,
    Requested,
    Settled,
}

/// Synchronous page fetcher, for callers without an event loop.
pub trait PageSource<T> {
    type Error: std::fmt::Display;

    fn fetch_page(&self, request: &PageRequest) -> Result<PageData<T>, Self::Error>;
}

#[derive(Debug)]
pub struct WindowedLoader<T> {
    config: LoaderConfig,
    window: RecordWindow<T>,
    location: Option<String>,
    generation: Generation,
    loaded_pages: BTreeSet<u32>,
    in_flight: BTreeSet<u32>,
    /// Pages whose last fetch failed; skipped by [`Self::request_visible`].
    failed: BTreeSet<u32>,
    total_pages: Option<u32>,
    has_next: bool,
    error: Option<String>,
    scroll_reset: ScrollReset,
}

impl<T> WindowedLoader<T> {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            window: RecordWindow::new(),
            location: None,
            generation: 0,
            loaded_pages: BTreeSet::new(),
            in_flight: BTreeSet::new(),
            failed: BTreeSet::new(),
            total_pages: None,
            has_next: true,
            error: None,
            scroll_reset: ScrollReset::Idle,
        }
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub fn window(&self) -> &RecordWindow<T> {
        &self.window
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn total(&self) -> Option<usize> {
        self.window.total()
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Highest page merged so far, 0 before the first response.
    pub fn last_loaded_page(&self) -> u32 {
        self.loaded_pages.last().copied().unwrap_or(0)
    }

    pub fn loaded_count(&self) -> usize {
        self.window.loaded_count()
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn is_in_flight(&self, page: u32) -> bool {
        self.in_flight.contains(&page)
    }

    pub fn has_failed(&self, page: u32) -> bool {
        self.failed.contains(&page)
    }

    /// Share of the known total that is materialized, rounded.
    pub fn progress_percent(&self) -> Option<u32> {
        match self.window.total() {
            Some(total) if total > 0 => {
                Some(((self.loaded_count() as f64 / total as f64) * 100.0).round() as u32)
            }
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_notice(&self) -> Option<ErrorNotice<'_>> {
        let message = self.error.as_deref()?;
        if self.window.loaded_count() == 0 {
            Some(ErrorNotice::Banner(message))
        } else {
            Some(ErrorNotice::Inline(message))
        }
    }

    pub fn is_slot_ready(&self, index: usize) -> bool {
        self.window.is_ready(index)
    }

    /// Row count handed to the renderer.
    pub fn visible_count(&self) -> usize {
        match self.window.total() {
            Some(total) => total,
            None if self.has_next => self.window.len() + self.config.page_size,
            None => self.window.len(),
        }
    }

    pub fn row(&self, index: usize) -> RowState<'_, T> {
        if let Some(record) = self.window.get(index) {
            RowState::Loaded(record)
        } else if self.window.total().is_some_and(|total| index >= total) {
            RowState::Beyond
        } else {
            RowState::Loading
        }
    }

    /// Issue a fetch for `page` unless it is out of range, already loaded,
    /// already in flight, or overtaken by a higher page in flight.
    ///
    /// Only `page` itself counts as loaded: a lower page left as a gap by
    /// out-of-order completion stays fetchable after higher pages land.
    /// An explicit call also re-arms a page whose previous fetch failed.
    pub fn request_page(&mut self, page: u32) -> Option<PageRequest> {
        if page < FIRST_PAGE {
            return None;
        }
        if self.total_pages.is_some_and(|pages| page > pages) {
            return None;
        }
        if self.loaded_pages.contains(&page) {
            return None;
        }
        if self.in_flight.range(page..).next().is_some() {
            return None;
        }

        self.in_flight.insert(page);
        self.failed.remove(&page);
        if self.failed.is_empty() {
            self.error = None;
        }
        tracing::debug!(page, generation = self.generation, location = ?self.location, "requesting page");

        Some(PageRequest {
            page,
            limit: self.config.page_size,
            location: self.location.clone(),
            generation: self.generation,
        })
    }

    /// Requests for every page owning a non-ready slot in `range`, extended
    /// by the load-ahead threshold and clamped to [`Self::visible_count`].
    ///
    /// Failed pages are not re-requested while they stay in view. Once the
    /// range no longer covers a failed page it becomes eligible again.
    pub fn request_visible(&mut self, range: Range<usize>) -> Vec<PageRequest> {
        let end = (range.end + self.config.load_ahead).min(self.visible_count());
        if range.start >= end {
            return Vec::new();
        }

        let page_size = self.config.page_size;
        let first = page_for_index(range.start, page_size);
        let last = page_for_index(end - 1, page_size);
        self.failed.retain(|page| (first..=last).contains(page));

        let mut requests = Vec::new();
        for page in first..=last {
            if self.failed.contains(&page) {
                continue;
            }
            let base = (page - FIRST_PAGE) as usize * page_size;
            let lo = base.max(range.start);
            let hi = (base + page_size).min(end);
            if (lo..hi).any(|i| !self.is_slot_ready(i)) {
                if let Some(request) = self.request_page(page) {
                    requests.push(request);
                }
            }
        }
        requests
    }

    /// Apply a finished fetch. In-flight state for the page is cleared on
    /// both success and failure; failures leave the window untouched.
    pub fn complete(&mut self, response: PageResponse<T>) -> MergeOutcome {
        let PageResponse { request, result } = response;
        let page = request.page;

        if request.generation != self.generation {
            tracing::debug!(
                page,
                stale = request.generation,
                current = self.generation,
                "dropping response from superseded filter"
            );
            return MergeOutcome::Stale {
                page,
                generation: request.generation,
            };
        }

        self.in_flight.remove(&page);

        match result {
            Ok(data) => {
                let base = match page_base_offset(page, self.config.page_size) {
                    Ok(base) => base,
                    Err(e) => {
                        self.error = Some(e.to_string());
                        return MergeOutcome::Failed { page };
                    }
                };
                let records = data.records.len();
                self.window.merge_at(base, data.records);
                self.window.set_total(data.pagination.total);
                self.loaded_pages.insert(page);
                self.failed.remove(&page);
                self.total_pages = Some(data.pagination.pages);
                self.has_next = self.last_loaded_page() < data.pagination.pages;
                MergeOutcome::Merged { page, records }
            }
            Err(message) => {
                tracing::warn!(page, error = %message, "page fetch failed");
                self.failed.insert(page);
                self.error = Some(message);
                MergeOutcome::Failed { page }
            }
        }
    }

    /// Replace the active location filter. Clears the window, bumps the
    /// generation, schedules a scroll to the top and returns the page-1 fetch.
    pub fn set_location(&mut self, location: Option<String>) -> Option<PageRequest> {
        self.window.clear();
        self.loaded_pages.clear();
        self.in_flight.clear();
        self.failed.clear();
        self.total_pages = None;
        self.has_next = true;
        self.error = None;
        self.generation += 1;
        self.location = location;
        self.scroll_reset = ScrollReset::Requested;
        self.request_page(FIRST_PAGE)
    }

    /// Re-issue every failed page, for an explicit retry.
    pub fn retry_failed(&mut self) -> Vec<PageRequest> {
        let pages: Vec<u32> = self.failed.iter().copied().collect();
        pages
            .into_iter()
            .filter_map(|page| self.request_page(page))
            .collect()
    }

    /// Select `location`, or clear the filter if it is already selected.
    pub fn toggle_location(&mut self, location: &str) -> Option<PageRequest> {
        let next = if self.location.as_deref() == Some(location) {
            None
        } else {
            Some(location.to_string())
        };
        self.set_location(next)
    }

    /// Call once per rendered frame. A pending scroll reset becomes
    /// deliverable only after the renderer has adopted the new row count.
    pub fn frame_settled(&mut self) {
        if self.scroll_reset == ScrollReset::Requested {
            self.scroll_reset = ScrollReset::Settled;
        }
    }

    /// True exactly once after a filter change has settled.
    pub fn take_scroll_to_top(&mut self) -> bool {
        if self.scroll_reset == ScrollReset::Settled {
            self.scroll_reset = ScrollReset::Idle;
            true
        } else {
            false
        }
    }
}

/// Fetch every page `range` needs through `source`, merging as each returns.
pub fn drive_range<T, S: PageSource<T>>(
    loader: &mut WindowedLoader<T>,
    source: &S,
    range: Range<usize>,
) -> Vec<MergeOutcome> {
    loader
        .request_visible(range)
        .into_iter()
        .map(|request| {
            let result = source.fetch_page(&request).map_err(|e| e.to_string());
            loader.complete(PageResponse { request, result })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(page: u32, total: usize, page_size: usize) -> PageData<usize> {
        let pages = total.div_ceil(page_size) as u32;
        let base = (page as usize - 1) * page_size;
        let end = (base + page_size).min(total);
        PageData {
            records: (base..end).collect(),
            pagination: Pagination { total, page, pages },
        }
    }

    fn loader() -> WindowedLoader<usize> {
        WindowedLoader::new(LoaderConfig::with_page_size(20))
    }

    fn ok(request: PageRequest, total: usize) -> PageResponse<usize> {
        let data = page_of(request.page, total, request.limit);
        PageResponse {
            request,
            result: Ok(data),
        }
    }

    #[test]
    fn visible_count_before_any_response_is_one_page() {
        let l = loader();
        assert_eq!(l.visible_count(), 20);
        assert_eq!(l.row(0), RowState::Loading);
    }

    #[test]
    fn visible_count_uses_known_total() {
        let mut l = loader();
        let req = l.request_page(1).unwrap();
        l.complete(ok(req, 91));
        assert_eq!(l.visible_count(), 91);
        assert_eq!(l.total_pages(), Some(5));
        assert_eq!(l.loaded_count(), 20);
        assert_eq!(l.progress_percent(), Some(22));
    }

    #[test]
    fn request_page_is_idempotent_while_in_flight() {
        let mut l = loader();
        assert!(l.request_page(2).is_some());
        assert!(l.request_page(2).is_none());
        assert!(l.is_in_flight(2));
    }

    #[test]
    fn lower_page_waits_for_higher_in_flight() {
        let mut l = loader();
        assert!(l.request_page(3).is_some());
        assert!(l.request_page(2).is_none());
        assert!(l.request_page(4).is_some());
    }

    #[test]
    fn loaded_and_out_of_range_pages_are_skipped() {
        let mut l = loader();
        assert!(l.request_page(0).is_none());
        let req = l.request_page(1).unwrap();
        l.complete(ok(req, 91));
        assert!(l.request_page(1).is_none());
        assert!(l.request_page(6).is_none());
        assert!(l.request_page(5).is_some());
    }

    #[test]
    fn failure_clears_in_flight_and_allows_retry() {
        let mut l = loader();
        let req = l.request_page(1).unwrap();
        let outcome = l.complete(PageResponse {
            request: req,
            result: Err("connection refused".into()),
        });
        assert_eq!(outcome, MergeOutcome::Failed { page: 1 });
        assert_eq!(l.error_notice(), Some(ErrorNotice::Banner("connection refused")));
        assert!(!l.is_loading());
        assert!(l.request_page(1).is_some());
        assert_eq!(l.error(), None);
    }

    #[test]
    fn error_after_data_is_inline() {
        let mut l = loader();
        let req = l.request_page(1).unwrap();
        l.complete(ok(req, 91));
        let req = l.request_page(2).unwrap();
        l.complete(PageResponse {
            request: req,
            result: Err("timeout".into()),
        });
        assert_eq!(l.error_notice(), Some(ErrorNotice::Inline("timeout")));
        assert_eq!(l.loaded_count(), 20);
    }

    fn fail(request: PageRequest, message: &str) -> PageResponse<usize> {
        PageResponse {
            request,
            result: Err(message.into()),
        }
    }

    #[test]
    fn failed_page_is_not_refetched_by_rerender() {
        let mut l = loader();
        let req = l.request_page(1).unwrap();
        l.complete(ok(req, 91));
        let requests = l.request_visible(10..20);
        assert_eq!(requests.iter().map(|r| r.page).collect::<Vec<_>>(), vec![2]);
        l.complete(fail(requests.into_iter().next().unwrap(), "500"));

        assert!(l.request_visible(10..20).is_empty());
        assert!(l.has_failed(2));
        assert_eq!(l.error_notice(), Some(ErrorNotice::Inline("500")));
    }

    #[test]
    fn retry_reissues_failed_pages() {
        let mut l = loader();
        let req = l.request_page(1).unwrap();
        l.complete(ok(req, 91));
        let req = l.request_page(2).unwrap();
        l.complete(fail(req, "500"));

        let retried: Vec<u32> = l.retry_failed().iter().map(|r| r.page).collect();
        assert_eq!(retried, vec![2]);
        assert!(!l.has_failed(2));
        assert_eq!(l.error(), None);
        assert!(l.retry_failed().is_empty());
    }

    #[test]
    fn failed_page_rearms_after_scrolling_away() {
        let mut l = loader();
        let req = l.request_page(1).unwrap();
        l.complete(ok(req, 91));
        let req = l.request_page(2).unwrap();
        l.complete(fail(req, "500"));

        assert!(l.request_visible(0..5).is_empty());
        assert!(!l.has_failed(2));
        let pages: Vec<u32> = l.request_visible(10..20).iter().map(|r| r.page).collect();
        assert_eq!(pages, vec![2]);
    }

    #[test]
    fn filter_change_forgets_failures() {
        let mut l = loader();
        let req = l.request_page(1).unwrap();
        l.complete(fail(req, "down"));
        assert!(l.has_failed(1));
        l.set_location(Some("Texas".into()));
        assert!(!l.has_failed(1));
        assert_eq!(l.error(), None);
    }

    #[test]
    fn rows_past_total_are_beyond() {
        let mut l = loader();
        let req = l.request_page(1).unwrap();
        l.complete(ok(req, 15));
        assert_eq!(l.visible_count(), 15);
        assert_eq!(l.row(14), RowState::Loaded(&14));
        assert_eq!(l.row(15), RowState::Beyond);
        assert!(l.is_slot_ready(99));
    }

    #[test]
    fn empty_result_has_no_rows() {
        let mut l = loader();
        let req = l.request_page(1).unwrap();
        l.complete(ok(req, 0));
        assert_eq!(l.visible_count(), 0);
        assert!(l.error_notice().is_none());
    }

    #[test]
    fn out_of_order_pages_land_at_their_offsets() {
        let mut l = loader();
        let p1 = l.request_page(1).unwrap();
        let p2 = l.request_page(2).unwrap();
        l.complete(ok(p2, 91));
        assert_eq!(l.row(0), RowState::Loading);
        assert_eq!(l.row(25), RowState::Loaded(&25));
        l.complete(ok(p1, 91));
        assert_eq!(l.row(0), RowState::Loaded(&0));
        assert_eq!(l.last_loaded_page(), 2);
    }

    #[test]
    fn gap_below_a_loaded_page_stays_fetchable() {
        let mut l = loader();
        let req = l.request_page(3).unwrap();
        l.complete(ok(req, 91));
        assert!(l.request_page(3).is_none());
        assert_eq!(l.request_page(1).map(|r| r.page), Some(1));
    }

    #[test]
    fn request_visible_covers_load_ahead() {
        let mut l = loader();
        let req = l.request_page(1).unwrap();
        l.complete(ok(req, 91));

        // 0..5 plus 15 rows of load-ahead stays inside page 1
        let requests = l.request_visible(0..5);
        assert!(requests.is_empty());

        let pages: Vec<u32> = l.request_visible(10..18).iter().map(|r| r.page).collect();
        assert_eq!(pages, vec![2]);
    }

    #[test]
    fn filter_change_discards_stale_response() {
        let mut l = loader();
        let p1 = l.request_page(1).unwrap();
        l.complete(ok(p1, 91));
        let stale = l.request_page(2).unwrap();

        let fresh = l.set_location(Some("Texas".into())).unwrap();
        assert_eq!(fresh.page, 1);
        assert_eq!(fresh.location.as_deref(), Some("Texas"));
        assert_eq!(l.loaded_count(), 0);
        assert_eq!(l.total(), None);

        let outcome = l.complete(ok(stale, 91));
        assert!(matches!(outcome, MergeOutcome::Stale { page: 2, .. }));
        assert_eq!(l.loaded_count(), 0);
        assert!(l.is_in_flight(1));
    }

    #[test]
    fn toggle_same_location_clears_filter() {
        let mut l = loader();
        l.toggle_location("Texas");
        assert_eq!(l.location(), Some("Texas"));
        l.toggle_location("Texas");
        assert_eq!(l.location(), None);
        assert_eq!(l.generation(), 2);
    }

    #[test]
    fn scroll_reset_waits_for_a_settled_frame() {
        let mut l = loader();
        l.set_location(Some("Florida".into()));
        assert!(!l.take_scroll_to_top());
        l.frame_settled();
        assert!(l.take_scroll_to_top());
        assert!(!l.take_scroll_to_top());
    }

    struct Backend {
        total: usize,
    }

    impl PageSource<usize> for Backend {
        type Error = String;

        fn fetch_page(&self, request: &PageRequest) -> Result<PageData<usize>, String> {
            Ok(page_of(request.page, self.total, request.limit))
        }
    }

    #[test]
    fn drive_range_fills_requested_rows() {
        let mut l = loader();
        let backend = Backend { total: 91 };
        drive_range(&mut l, &backend, 0..1);
        drive_range(&mut l, &backend, 0..91);
        assert_eq!(l.loaded_count(), 91);
        assert!((0..91).all(|i| l.row(i) == RowState::Loaded(&i)));
    }
}

//! Property tests for the windowed loader and the TTL cache.

use std::time::{Duration, Instant};

use ei_core::Pagination;
use ei_state::{
    LoaderConfig, MergeOutcome, PageData, PageRequest, PageResponse, RowState, TtlCache,
    WindowedLoader,
};
use proptest::prelude::*;

const PAGE_SIZE: usize = 20;

/// Backend stand-in: record `i` of a filter is `(filter_tag, i)`.
fn backend_page(request: &PageRequest, total: usize) -> PageData<(u8, usize)> {
    let tag = request.location.as_ref().map(|l| l.len() as u8).unwrap_or(0);
    let pages = total.div_ceil(PAGE_SIZE) as u32;
    let base = (request.page as usize - 1) * PAGE_SIZE;
    let end = (base + PAGE_SIZE).min(total);
    PageData {
        records: (base..end).map(|i| (tag, i)).collect(),
        pagination: Pagination {
            total,
            page: request.page,
            pages,
        },
    }
}

fn total_and_shuffled_pages() -> impl Strategy<Value = (usize, Vec<u32>)> {
    (1usize..240).prop_flat_map(|total| {
        let pages: Vec<u32> = (1..=total.div_ceil(PAGE_SIZE) as u32).collect();
        (Just(total), Just(pages).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn merge_order_does_not_matter((total, order) in total_and_shuffled_pages()) {
        let mut loader = WindowedLoader::new(LoaderConfig::with_page_size(PAGE_SIZE));

        let mut requests: Vec<PageRequest> = Vec::new();
        let mut ascending = order.clone();
        ascending.sort_unstable();
        for page in ascending {
            requests.push(loader.request_page(page).expect("fresh page is requested"));
        }

        for page in order {
            let request = requests.iter().find(|r| r.page == page).cloned().unwrap();
            let data = backend_page(&request, total);
            let outcome = loader.complete(PageResponse { request, result: Ok(data) });
            let merged = matches!(outcome, MergeOutcome::Merged { .. });
            prop_assert!(merged);
        }

        prop_assert_eq!(loader.visible_count(), total);
        prop_assert_eq!(loader.loaded_count(), total);
        for i in 0..total {
            let expected = (0u8, i);
            prop_assert_eq!(loader.row(i), RowState::Loaded(&expected));
        }
    }

    #[test]
    fn responses_from_before_a_filter_change_never_merge(
        (total, order) in total_and_shuffled_pages(),
        in_flight in 1usize..6,
    ) {
        let mut loader = WindowedLoader::new(LoaderConfig::with_page_size(PAGE_SIZE));

        let mut ascending = order.clone();
        ascending.sort_unstable();
        let stale: Vec<PageRequest> = ascending
            .into_iter()
            .take(in_flight)
            .filter_map(|page| loader.request_page(page))
            .collect();

        let fresh = loader.set_location(Some("Texas".into())).expect("page 1 for new filter");

        for request in stale {
            let data = backend_page(&request, total);
            let outcome = loader.complete(PageResponse { request, result: Ok(data) });
            let was_stale = matches!(outcome, MergeOutcome::Stale { .. });
            prop_assert!(was_stale);
        }
        prop_assert_eq!(loader.loaded_count(), 0);
        prop_assert_eq!(loader.total(), None);

        let data = backend_page(&fresh, total);
        loader.complete(PageResponse { request: fresh, result: Ok(data) });
        let expected = ("Texas".len() as u8, 0usize);
        prop_assert_eq!(loader.row(0), RowState::Loaded(&expected));
    }

    #[test]
    fn request_page_is_idempotent_while_in_flight(page in 1u32..50, repeats in 1usize..5) {
        let mut loader: WindowedLoader<u32> =
            WindowedLoader::new(LoaderConfig::with_page_size(PAGE_SIZE));
        prop_assert!(loader.request_page(page).is_some());
        for _ in 0..repeats {
            prop_assert!(loader.request_page(page).is_none());
        }
    }

    #[test]
    fn cache_entries_expire_at_ttl(ttl_s in 1u64..7200, extra_s in 0u64..7200) {
        let t0 = Instant::now();
        let ttl = Duration::from_secs(ttl_s);
        let mut cache = TtlCache::new(ttl);
        cache.insert_at("key", 1u8, t0);

        prop_assert_eq!(cache.get_at(&"key", t0 + ttl + Duration::from_secs(extra_s)), None);
        prop_assert_eq!(cache.get_at(&"key", t0 + ttl - Duration::from_millis(1)), Some(&1u8));
    }
}

#[test]
fn scenario_page_one_of_five() {
    let mut loader = WindowedLoader::new(LoaderConfig::with_page_size(PAGE_SIZE));
    let request = loader.request_page(1).unwrap();
    let data = backend_page(&request, 91);
    loader.complete(PageResponse {
        request,
        result: Ok(data),
    });
    assert_eq!(loader.total_pages(), Some(5));
    assert_eq!(loader.visible_count(), 91);

    for page in 2..=5 {
        let request = loader.request_page(page).unwrap();
        let data = backend_page(&request, 91);
        loader.complete(PageResponse {
            request,
            result: Ok(data),
        });
    }
    assert_eq!(loader.visible_count(), 91);
    assert_eq!(loader.loaded_count(), 91);
    assert_eq!(loader.request_page(6), None);
}

#[test]
fn scenario_texas_switch_discards_page_two() {
    let mut loader = WindowedLoader::new(LoaderConfig::with_page_size(PAGE_SIZE));
    let first = loader.request_page(1).unwrap();
    let data = backend_page(&first, 91);
    loader.complete(PageResponse {
        request: first,
        result: Ok(data),
    });

    let page_two = loader.request_page(2).unwrap();
    assert_eq!(page_two.location, None);

    let texas = loader.toggle_location("Texas").unwrap();
    let late = backend_page(&page_two, 91);
    assert!(matches!(
        loader.complete(PageResponse {
            request: page_two,
            result: Ok(late),
        }),
        MergeOutcome::Stale { page: 2, .. }
    ));

    let data = backend_page(&texas, 12);
    loader.complete(PageResponse {
        request: texas,
        result: Ok(data),
    });
    assert_eq!(loader.visible_count(), 12);
    assert!(
        loader
            .window()
            .iter_loaded()
            .all(|(_, record)| record.0 == "Texas".len() as u8)
    );
}

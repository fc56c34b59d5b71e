use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

use crate::domain::{PageResult, Product};

/// Products requested per page.
pub const PAGE_SIZE: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Exhausted,
}

/// A page fetch issued by [`FeedState::begin_fetch`].
///
/// The generation ties the request to the feed it was issued for, so a
/// response arriving after a reset can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Merged {
        page: u32,
        added: usize,
        duplicates: usize,
        has_more: bool,
    },
    Failed {
        page: u32,
        error: String,
    },
    /// Response for a request that is no longer current; nothing changed.
    Stale { page: u32 },
}

/// Accumulated catalog feed plus pagination bookkeeping.
///
/// The cursor is the next page to request. It starts at 1 and moves forward
/// by one only when the fetch for that page succeeds, so a failed page is
/// requested again on the next trigger.
#[derive(Debug, Clone)]
pub struct FeedState {
    products: Vec<Product>,
    known_ids: HashSet<String>,
    cursor: u32,
    has_more: bool,
    in_flight: Option<PageRequest>,
    generation: u64,
    trigger: Option<u64>,
    last_error: Option<String>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            known_ids: HashSet::new(),
            cursor: 1,
            has_more: true,
            in_flight: None,
            generation: 0,
            trigger: None,
            last_error: None,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<PageRequest> {
        self.in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_product_id(&self) -> Option<&str> {
        self.products.last().map(|p| p.id.as_str())
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.known_ids.contains(product_id)
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Fetching
        } else if !self.has_more {
            Phase::Exhausted
        } else {
            Phase::Idle
        }
    }

    /// Drops everything accumulated and starts a new generation.
    pub fn reset(&mut self) {
        self.products.clear();
        self.known_ids.clear();
        self.cursor = 1;
        self.has_more = true;
        self.in_flight = None;
        self.last_error = None;
        self.generation += 1;
    }

    /// Resets only when `trigger` differs from the last value seen.
    ///
    /// Returns `true` if the feed was reset.
    pub fn reset_on<T: Hash + ?Sized>(&mut self, trigger: &T) -> bool {
        let mut hasher = DefaultHasher::new();
        trigger.hash(&mut hasher);
        let fingerprint = hasher.finish();

        if self.trigger == Some(fingerprint) {
            return false;
        }
        self.trigger = Some(fingerprint);
        self.reset();
        true
    }

    /// Marks a fetch for the current cursor as in flight.
    ///
    /// Returns `None` while another fetch is outstanding or once the feed is
    /// exhausted.
    pub fn begin_fetch(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() || !self.has_more {
            return None;
        }

        let request = PageRequest {
            page: self.cursor,
            generation: self.generation,
        };
        self.in_flight = Some(request);
        Some(request)
    }

    /// Applies the result of `request`.
    pub fn complete<E: Display>(
        &mut self,
        request: PageRequest,
        result: Result<PageResult, E>,
    ) -> FetchOutcome {
        if request.generation != self.generation || self.in_flight != Some(request) {
            tracing::debug!(
                "Discarding stale page {} (generation {}, current {})",
                request.page,
                request.generation,
                self.generation
            );
            return FetchOutcome::Stale { page: request.page };
        }

        self.in_flight = None;

        match result {
            Ok(page) => {
                let has_more = page.has_more();
                let (added, duplicates) = self.merge(page.products);

                self.has_more = has_more;
                self.cursor = request.page + 1;
                self.last_error = None;

                tracing::info!(
                    "Merged page {}/{}: {} new, {} duplicate",
                    page.current_page,
                    page.total_pages,
                    added,
                    duplicates
                );

                FetchOutcome::Merged {
                    page: request.page,
                    added,
                    duplicates,
                    has_more,
                }
            }
            Err(err) => {
                let error = err.to_string();
                tracing::warn!("Failed to fetch page {}: {}", request.page, error);
                self.last_error = Some(error.clone());

                FetchOutcome::Failed {
                    page: request.page,
                    error,
                }
            }
        }
    }

    fn merge(&mut self, incoming: Vec<Product>) -> (usize, usize) {
        let mut added = 0;
        let mut duplicates = 0;

        for product in incoming {
            if self.known_ids.insert(product.id.clone()) {
                self.products.push(product);
                added += 1;
            } else {
                duplicates += 1;
            }
        }

        (added, duplicates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products(range: std::ops::Range<usize>) -> Vec<Product> {
        range
            .map(|i| Product::new(format!("p{}", i), format!("Product {}", i), 10.0))
            .collect()
    }

    fn page(items: Vec<Product>, current_page: u32, total_pages: u32) -> PageResult {
        PageResult {
            products: items,
            current_page,
            total_pages,
        }
    }

    fn fetch_ok(state: &mut FeedState, result: PageResult) -> FetchOutcome {
        let request = state.begin_fetch().expect("fetch should start");
        state.complete::<String>(request, Ok(result))
    }

    #[test]
    fn test_initial_state() {
        let state = FeedState::new();
        assert!(state.is_empty());
        assert_eq!(state.cursor(), 1);
        assert!(state.has_more());
        assert!(!state.is_loading());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_first_page_of_three() {
        let mut state = FeedState::new();
        let outcome = fetch_ok(&mut state, page(products(0..12), 1, 3));

        assert_eq!(
            outcome,
            FetchOutcome::Merged {
                page: 1,
                added: 12,
                duplicates: 0,
                has_more: true
            }
        );
        assert_eq!(state.len(), 12);
        assert!(state.has_more());
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn test_last_page_exhausts_feed() {
        let mut state = FeedState::new();
        fetch_ok(&mut state, page(products(0..12), 1, 3));
        fetch_ok(&mut state, page(products(12..24), 2, 3));
        fetch_ok(&mut state, page(products(24..28), 3, 3));

        assert_eq!(state.len(), 28);
        assert!(!state.has_more());
        assert_eq!(state.phase(), Phase::Exhausted);
        assert_eq!(state.begin_fetch(), None);
    }

    #[test]
    fn test_overlapping_pages_are_deduplicated() {
        let mut state = FeedState::new();
        fetch_ok(&mut state, page(products(0..12), 1, 2));
        let outcome = fetch_ok(&mut state, page(products(10..22), 2, 2));

        assert_eq!(
            outcome,
            FetchOutcome::Merged {
                page: 2,
                added: 10,
                duplicates: 2,
                has_more: false
            }
        );
        assert_eq!(state.len(), 22);

        let unique: HashSet<&str> = state.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(unique.len(), state.len());
    }

    #[test]
    fn test_duplicates_within_one_page() {
        let mut state = FeedState::new();
        let mut items = products(0..3);
        items.push(Product::new("p1", "Again", 1.0));
        fetch_ok(&mut state, page(items, 1, 1));

        assert_eq!(state.len(), 3);
        assert_eq!(state.products()[1].title, "Product 1");
    }

    #[test]
    fn test_arrival_order_is_preserved() {
        let mut state = FeedState::new();
        fetch_ok(&mut state, page(products(0..2), 1, 2));
        fetch_ok(&mut state, page(products(2..4), 2, 2));

        let ids: Vec<&str> = state.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p0", "p1", "p2", "p3"]);
        assert_eq!(state.last_product_id(), Some("p3"));
    }

    #[test]
    fn test_failed_page_keeps_state_and_cursor() {
        let mut state = FeedState::new();
        fetch_ok(&mut state, page(products(0..12), 1, 3));

        let request = state.begin_fetch().unwrap();
        assert_eq!(request.page, 2);
        let outcome = state.complete(request, Err("connection reset"));

        assert_eq!(
            outcome,
            FetchOutcome::Failed {
                page: 2,
                error: "connection reset".into()
            }
        );
        assert_eq!(state.len(), 12);
        assert_eq!(state.cursor(), 2);
        assert!(state.has_more());
        assert!(!state.is_loading());
        assert_eq!(state.last_error(), Some("connection reset"));

        // The retry asks for the same page, never page 3.
        let retry = state.begin_fetch().unwrap();
        assert_eq!(retry.page, 2);
    }

    #[test]
    fn test_success_clears_last_error() {
        let mut state = FeedState::new();
        let request = state.begin_fetch().unwrap();
        state.complete(request, Err("timeout"));
        assert!(state.last_error().is_some());

        fetch_ok(&mut state, page(products(0..1), 1, 2));
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_only_one_fetch_in_flight() {
        let mut state = FeedState::new();
        let first = state.begin_fetch();
        assert!(first.is_some());
        assert_eq!(state.phase(), Phase::Fetching);

        for _ in 0..5 {
            assert_eq!(state.begin_fetch(), None);
        }
        assert_eq!(state.in_flight(), first);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = FeedState::new();
        fetch_ok(&mut state, page(products(0..12), 1, 1));
        state.reset();

        assert!(state.is_empty());
        assert_eq!(state.cursor(), 1);
        assert!(state.has_more());
        assert!(!state.contains("p0"));
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_reset_on_only_reacts_to_changed_trigger() {
        let mut state = FeedState::new();
        assert!(state.reset_on("all"));
        fetch_ok(&mut state, page(products(0..3), 1, 2));

        assert!(!state.reset_on("all"));
        assert_eq!(state.len(), 3);

        assert!(state.reset_on("ebooks"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_response_after_reset_is_stale() {
        let mut state = FeedState::new();
        let request = state.begin_fetch().unwrap();
        state.reset();

        let outcome = state.complete::<String>(request, Ok(page(products(0..12), 1, 3)));
        assert_eq!(outcome, FetchOutcome::Stale { page: 1 });
        assert!(state.is_empty());
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_unknown_request_does_not_clear_in_flight() {
        let mut state = FeedState::new();
        let current = state.begin_fetch().unwrap();
        let bogus = PageRequest {
            page: 7,
            generation: current.generation,
        };

        let outcome = state.complete::<String>(bogus, Ok(page(products(0..1), 7, 9)));
        assert_eq!(outcome, FetchOutcome::Stale { page: 7 });
        assert!(state.is_loading());
    }

    #[test]
    fn test_has_more_tracks_latest_page() {
        let mut state = FeedState::new();
        fetch_ok(&mut state, page(products(0..1), 1, 2));
        assert!(state.has_more());
        fetch_ok(&mut state, page(products(1..2), 2, 2));
        assert!(!state.has_more());
    }

    #[test]
    fn test_empty_catalog_is_exhausted_after_first_page() {
        let mut state = FeedState::new();
        fetch_ok(&mut state, page(Vec::new(), 1, 0));
        assert!(state.is_empty());
        assert_eq!(state.phase(), Phase::Exhausted);
    }
}

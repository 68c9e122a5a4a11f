//! Debounced, paginated address search
//!
//! Every accepted query opens a session. A session owns one cancellation
//! token and one id; starting a new session cancels the old token, and every
//! state write is checked against the current id inside the watch channel so
//! a late response from a dead session is dropped.

use crate::config::Config;
use crate::constants::search;
use crate::geo::GeocodingClient;
use crate::model::SearchResult;
use crate::notice::Notifier;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Search tunables
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub page_size: u32,
    pub min_query_chars: usize,
    pub max_query_chars: usize,
    pub prefetch_threshold: usize,
}

impl SearchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.search.debounce_ms),
            page_size: config.search.page_size,
            min_query_chars: config.search.min_query_chars,
            max_query_chars: config.search.max_query_chars,
            prefetch_threshold: config.search.prefetch_threshold,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(search::DEBOUNCE_MS),
            page_size: search::PAGE_SIZE,
            min_query_chars: search::MIN_QUERY_CHARS,
            max_query_chars: search::MAX_QUERY_CHARS,
            prefetch_threshold: search::PREFETCH_THRESHOLD,
        }
    }
}

/// Observable search state
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    /// Normalized query of the live session; empty when idle
    pub query: String,
    /// Next page to request (1-based)
    pub page: u32,
    pub is_end: bool,
    pub is_loading: bool,
    pub results: Vec<SearchResult>,
    /// Whether the result panel should be shown
    pub visible: bool,
    session: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            is_end: false,
            is_loading: false,
            results: Vec::new(),
            visible: false,
            session: 0,
        }
    }
}

/// Apply `update` only if `session` is still the live one
fn apply_if_current(
    state: &watch::Sender<SearchState>,
    session: u64,
    update: impl FnOnce(&mut SearchState),
) -> bool {
    state.send_if_modified(|s| {
        if s.session != session {
            return false;
        }
        update(s);
        true
    })
}

/// Drives address search for one input field
pub struct SearchController<G> {
    geocoder: Arc<G>,
    settings: SearchSettings,
    state: Arc<watch::Sender<SearchState>>,
    notifier: Notifier,
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl<G> SearchController<G>
where
    G: GeocodingClient + 'static,
{
    pub fn new(geocoder: Arc<G>, settings: SearchSettings, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            geocoder,
            settings,
            state: Arc::new(state),
            notifier,
            token: CancellationToken::new(),
            tasks: Vec::new(),
        }
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Handle new input text
    ///
    /// Input shorter than the minimum clears everything and sends nothing.
    /// Otherwise the previous session is cancelled and a new search is
    /// scheduled after the debounce period.
    pub fn on_query_changed(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.settings.min_query_chars {
            self.cancel();
            return;
        }

        let query: String = trimmed.chars().take(self.settings.max_query_chars).collect();
        let token = self.renew_token();
        let mut session = 0;
        self.state.send_modify(|s| {
            s.session += 1;
            session = s.session;
            s.query = query.clone();
            s.page = 1;
            s.is_end = false;
            s.is_loading = false;
        });

        tracing::debug!(query = %query, session, "Search scheduled");

        let geocoder = Arc::clone(&self.geocoder);
        let state = Arc::clone(&self.state);
        let notifier = self.notifier.clone();
        let debounce = self.settings.debounce;
        let page_size = self.settings.page_size;

        self.track(tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(debounce) => {}
            }

            if !apply_if_current(&state, session, |s| s.is_loading = true) {
                return;
            }

            tracing::debug!(query = %query, "Dispatching address search");
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                outcome = geocoder.search_by_address(&query, 1, page_size) => outcome,
            };

            match outcome {
                Ok(page) => {
                    apply_if_current(&state, session, |s| {
                        s.is_loading = false;
                        s.is_end = page.is_end || page.documents.is_empty();
                        if page.documents.is_empty() {
                            s.results.clear();
                            s.visible = false;
                        } else {
                            s.results = page.documents;
                            s.page = 2;
                            s.visible = true;
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(query = %query, "Address search failed: {}", e);
                    // Whatever is displayed belongs to an older query
                    let current = apply_if_current(&state, session, |s| {
                        s.is_loading = false;
                        s.results.clear();
                        s.visible = false;
                    });
                    if current {
                        notifier.error(e.user_message());
                    }
                }
            }
        }));
    }

    /// Request the next page of the live session
    ///
    /// Returns false without touching anything while a page is loading, after
    /// the last page, or when there is no first page to continue from.
    pub fn load_next_page(&mut self) -> bool {
        let mut request = None;
        self.state.send_if_modified(|s| {
            if s.is_loading || s.is_end || s.query.trim().is_empty() || s.page <= 1 {
                return false;
            }
            s.is_loading = true;
            request = Some((s.session, s.query.clone(), s.page));
            true
        });

        let Some((session, query, page)) = request else {
            return false;
        };

        tracing::debug!(query = %query, page, "Loading next page");

        let geocoder = Arc::clone(&self.geocoder);
        let state = Arc::clone(&self.state);
        let notifier = self.notifier.clone();
        let token = self.token.clone();
        let page_size = self.settings.page_size;

        self.track(tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                outcome = geocoder.search_by_address(&query, page, page_size) => outcome,
            };

            match outcome {
                Ok(next) => {
                    apply_if_current(&state, session, |s| {
                        s.is_loading = false;
                        s.is_end = next.is_end || next.documents.is_empty();
                        s.results.extend(next.documents);
                        s.page = page + 1;
                    });
                }
                Err(e) => {
                    tracing::warn!(query = %query, page, "Next page failed: {}", e);
                    if apply_if_current(&state, session, |s| s.is_loading = false) {
                        notifier.error(e.user_message());
                    }
                }
            }
        }));
        true
    }

    /// Scroll position update from the result list
    ///
    /// Loads the next page once scrolling has stopped within the prefetch
    /// threshold of the last row.
    pub fn on_scrolled(&mut self, last_visible_index: usize, scrolling: bool) -> bool {
        if scrolling {
            return false;
        }
        let len = self.state.borrow().results.len();
        if len == 0 || last_visible_index.saturating_add(self.settings.prefetch_threshold) < len {
            return false;
        }
        self.load_next_page()
    }

    /// Cancel the live session and hide the results
    pub fn cancel(&mut self) {
        self.renew_token();
        self.state.send_modify(|s| {
            let session = s.session + 1;
            *s = SearchState {
                session,
                ..SearchState::default()
            };
        });
    }

    /// Wait for every spawned task to finish
    pub async fn settled(&mut self) {
        for handle in self.tasks.drain(..) {
            if let Err(e) = handle.await {
                tracing::warn!("Search task failed: {}", e);
            }
        }
    }

    fn renew_token(&mut self) -> CancellationToken {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.token.clone()
    }

    fn track(&mut self, handle: JoinHandle<()>) {
        self.tasks.retain(|h| !h.is_finished());
        self.tasks.push(handle);
    }
}

impl<G> Drop for SearchController<G> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use crate::testing::{documents, MockGeocoder};
    use std::collections::HashSet;

    fn controller(geocoder: &MockGeocoder) -> (SearchController<MockGeocoder>, Notifier) {
        let notifier = Notifier::default();
        let controller = SearchController::new(
            Arc::new(geocoder.clone()),
            SearchSettings::default(),
            notifier.clone(),
        );
        (controller, notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_queries_never_hit_the_network() {
        let geocoder = MockGeocoder::new().with_page("서울", 1, documents("서울", 3), true);
        let (mut controller, _) = controller(&geocoder);

        controller.on_query_changed("서울");
        controller.settled().await;
        assert!(controller.state().visible);

        for text in ["", " ", "서", "  a  "] {
            controller.on_query_changed(text);
            controller.settled().await;
            let state = controller.state();
            assert!(state.results.is_empty());
            assert!(!state.visible);
        }
        assert_eq!(geocoder.search_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_dispatches_only_last_query() {
        let geocoder = MockGeocoder::new().with_page("서울시청", 1, documents("시청", 2), true);
        let (mut controller, _) = controller(&geocoder);

        for text in ["서울", "서울시", "서울시청"] {
            controller.on_query_changed(text);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        controller.settled().await;

        let calls = geocoder.search_calls();
        assert_eq!(calls, vec![("서울시청".to_string(), 1, 30)]);
        assert_eq!(controller.state().results.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_sent_before_debounce_elapses() {
        let geocoder = MockGeocoder::new();
        let (mut controller, _) = controller(&geocoder);

        controller.on_query_changed("부산");
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(geocoder.search_calls().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.settled().await;
        assert_eq!(geocoder.search_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_never_overwrites_newer_query() {
        let geocoder = MockGeocoder::new()
            .with_page("부산", 1, documents("부산", 5), false)
            .with_delay("부산", Duration::from_secs(2))
            .with_page("서울", 1, documents("서울", 3), true);
        let (mut controller, _) = controller(&geocoder);

        controller.on_query_changed("부산");
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(controller.state().is_loading);

        controller.on_query_changed("서울");
        controller.settled().await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        let state = controller.state();
        assert_eq!(state.query, "서울");
        assert_eq!(state.results.len(), 3);
        assert!(state.results.iter().all(|r| r.address_name.starts_with("서울")));
        assert!(state.is_end);
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seoul_pagination_scenario() {
        let geocoder = MockGeocoder::new()
            .with_page("서울", 1, documents("서울 1p", 30), false)
            .with_page("서울", 2, documents("서울 2p", 30), false);
        let (mut controller, _) = controller(&geocoder);

        controller.on_query_changed("서울");
        controller.settled().await;

        let state = controller.state();
        assert_eq!(state.results.len(), 30);
        assert!(!state.is_end);
        assert_eq!(state.page, 2);

        assert!(controller.load_next_page());
        controller.settled().await;

        let state = controller.state();
        assert_eq!(state.results.len(), 60);
        assert_eq!(state.page, 3);
        let names: HashSet<_> = state.results.iter().map(|r| r.address_name.clone()).collect();
        assert_eq!(names.len(), 60);
        assert_eq!(
            geocoder.search_calls(),
            vec![("서울".to_string(), 1, 30), ("서울".to_string(), 2, 30)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_page_is_noop_while_loading() {
        let geocoder = MockGeocoder::new()
            .with_page("서울", 1, documents("a", 30), false)
            .with_page("서울", 2, documents("b", 30), false)
            .with_delay("서울", Duration::from_millis(50));
        let (mut controller, _) = controller(&geocoder);

        controller.on_query_changed("서울");
        controller.settled().await;

        assert!(controller.load_next_page());
        let before = controller.state();
        assert!(before.is_loading);

        assert!(!controller.load_next_page());
        assert_eq!(controller.state(), before);

        controller.settled().await;
        assert_eq!(geocoder.search_calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_page_is_noop_at_end() {
        let geocoder = MockGeocoder::new().with_page("서울", 1, documents("a", 10), true);
        let (mut controller, _) = controller(&geocoder);

        controller.on_query_changed("서울");
        controller.settled().await;
        let before = controller.state();
        assert!(before.is_end);

        assert!(!controller.load_next_page());
        controller.settled().await;
        assert_eq!(controller.state(), before);
        assert_eq!(geocoder.search_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_page_is_noop_without_query() {
        let geocoder = MockGeocoder::new();
        let (mut controller, _) = controller(&geocoder);

        assert!(!controller.load_next_page());
        assert!(geocoder.search_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_hides_panel() {
        let geocoder = MockGeocoder::new();
        let (mut controller, _) = controller(&geocoder);

        controller.on_query_changed("없는주소");
        controller.settled().await;

        let state = controller.state();
        assert!(!state.visible);
        assert!(state.results.is_empty());
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_publishes_notice_and_clears_loading() {
        let geocoder = MockGeocoder::new().failing_page("서울", 1);
        let (mut controller, notifier) = controller(&geocoder);
        let mut notices = notifier.subscribe();

        controller.on_query_changed("서울");
        controller.settled().await;

        assert!(!controller.state().is_loading);
        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, crate::constants::messages::NETWORK_ERROR);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_page_can_be_retried() {
        let geocoder = MockGeocoder::new()
            .with_page("서울", 1, documents("a", 30), false)
            .failing_page("서울", 2);
        let (mut controller, notifier) = controller(&geocoder);
        let mut notices = notifier.subscribe();

        controller.on_query_changed("서울");
        controller.settled().await;
        controller.load_next_page();
        controller.settled().await;

        let state = controller.state();
        assert_eq!(state.results.len(), 30);
        assert_eq!(state.page, 2);
        assert!(!state.is_loading);
        assert!(notices.recv().await.is_ok());

        assert!(controller.load_next_page());
        controller.settled().await;
        assert_eq!(geocoder.search_calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_query_is_truncated() {
        let geocoder = MockGeocoder::new();
        let (mut controller, _) = controller(&geocoder);

        let long = "가".repeat(45);
        controller.on_query_changed(&format!("  {}  ", long));
        controller.settled().await;

        let calls = geocoder.search_calls();
        assert_eq!(calls[0].0.chars().count(), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_in_flight_response() {
        let geocoder = MockGeocoder::new()
            .with_page("서울", 1, documents("a", 5), false)
            .with_delay("서울", Duration::from_secs(1));
        let (mut controller, _) = controller(&geocoder);

        controller.on_query_changed("서울");
        tokio::time::sleep(Duration::from_millis(400)).await;
        controller.cancel();
        controller.settled().await;

        assert_eq!(controller.state(), SearchState {
            session: controller.state().session,
            ..SearchState::default()
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_scrolling_near_end_loads_more() {
        let geocoder = MockGeocoder::new()
            .with_page("서울", 1, documents("a", 30), false)
            .with_page("서울", 2, documents("b", 10), true);
        let (mut controller, _) = controller(&geocoder);

        controller.on_query_changed("서울");
        controller.settled().await;

        assert!(!controller.on_scrolled(10, false));
        assert!(!controller.on_scrolled(29, true));
        assert!(controller.on_scrolled(25, false));
        controller.settled().await;

        let state = controller.state();
        assert_eq!(state.results.len(), 40);
        assert!(state.is_end);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_index_past_end_does_not_overflow() {
        let geocoder = MockGeocoder::new()
            .with_page("서울", 1, documents("a", 30), false)
            .with_page("서울", 2, documents("b", 5), true);
        let (mut controller, _) = controller(&geocoder);

        controller.on_query_changed("서울");
        controller.settled().await;

        assert!(controller.on_scrolled(usize::MAX, false));
        controller.settled().await;
        assert_eq!(controller.state().results.len(), 35);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_results() {
        let geocoder = MockGeocoder::new().with_page("서울", 1, documents("a", 1), true);
        let (mut controller, _) = controller(&geocoder);
        let rx = controller.subscribe();

        controller.on_query_changed("서울");
        controller.settled().await;

        assert_eq!(rx.borrow().results.len(), 1);
    }
}

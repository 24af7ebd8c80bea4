use std::time::{Duration, Instant};

use tracing::{debug, warn};
use vert_core::{Article, HeadlinesProvider, PageQuery, Result};

use crate::coalesce::ScrollCoalescer;
use crate::store::{ArticleStore, DedupPolicy};

/// Minimum swipe travel, in pixels, before a gesture counts as navigation.
pub const SWIPE_THRESHOLD: f64 = 50.0;

/// Prefetch once the active index is within this many items of the end.
pub const PREFETCH_MARGIN: usize = 2;

/// Imperative scroll the presenter must perform after discrete navigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub target_offset: f64,
    pub smooth: bool,
}

/// Navigation keys the controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKey {
    ArrowUp,
    ArrowDown,
    Space,
    Char(char),
}

/// Reconciles scroll positions, swipe gestures, and key presses into one
/// authoritative active index over a growing article sequence, and decides
/// when to request more articles.
///
/// All mutation happens on the owner's single event-handling context; an
/// in-flight fetch never delays navigation.
pub struct FeedController {
    store: ArticleStore,
    scroll: ScrollCoalescer,
    viewport_height: f64,
    fetch_in_flight: bool,
    next_page: u32,
    chat_open: bool,
    query: PageQuery,
}

impl FeedController {
    pub fn new(viewport_height: f64, query: PageQuery) -> Self {
        Self {
            store: ArticleStore::default(),
            scroll: ScrollCoalescer::default(),
            viewport_height: viewport_height.max(1.0),
            fetch_in_flight: false,
            next_page: query.page,
            chat_open: true,
            query,
        }
    }

    pub fn with_dedup(mut self, policy: DedupPolicy) -> Self {
        self.store = ArticleStore::new(policy);
        self
    }

    pub fn with_scroll_window(mut self, window: Duration) -> Self {
        self.scroll = ScrollCoalescer::new(window);
        self
    }

    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    pub fn active_index(&self) -> Option<usize> {
        self.store.active_index()
    }

    pub fn active_article(&self) -> Option<&Article> {
        self.store.active_article()
    }

    pub fn chat_open(&self) -> bool {
        self.chat_open
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.fetch_in_flight
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// The presenter's viewport changed size (e.g. terminal resize). Scroll
    /// targets and scroll inversion both use the new height from here on.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(1.0);
    }

    /// Record a raw scroll position. Positions are coalesced: only the most
    /// recent one within the window is acted upon, via [`poll_scroll`].
    ///
    /// [`poll_scroll`]: FeedController::poll_scroll
    pub fn on_scroll(&mut self, offset: f64, now: Instant) {
        self.scroll.push(offset, now);
    }

    /// Flush the coalesced scroll position and re-derive the active index
    /// from it. Returns the newly adopted index, if it changed.
    pub fn poll_scroll(&mut self, now: Instant) -> Option<usize> {
        let offset = self.scroll.poll(now)?;
        let current = self.store.active_index()?;

        let candidate = (offset / self.viewport_height).round();
        if !candidate.is_finite() || candidate < 0.0 {
            return None;
        }
        let candidate = candidate as usize;
        if candidate == current || candidate >= self.store.len() {
            return None;
        }
        self.store.set_active(candidate);
        debug!("scroll adopted index {}", candidate);
        Some(candidate)
    }

    /// A completed touch gesture. Swipes shorter than [`SWIPE_THRESHOLD`]
    /// are ignored; upward swipes advance, downward swipes go back.
    pub fn on_swipe(&mut self, start_y: f64, end_y: f64) -> Option<ScrollCommand> {
        let delta = start_y - end_y;
        if delta.abs() <= SWIPE_THRESHOLD {
            return None;
        }
        if delta > 0.0 {
            self.go_next()
        } else {
            self.go_previous()
        }
    }

    /// A key press. `typing` must be true while focus is inside a text-entry
    /// control; every key is ignored then, otherwise each keystroke while
    /// composing a chat message would also navigate the feed.
    pub fn on_key(&mut self, key: FeedKey, typing: bool) -> Option<ScrollCommand> {
        if typing {
            return None;
        }
        match key {
            FeedKey::ArrowUp => self.go_previous(),
            FeedKey::ArrowDown | FeedKey::Space => self.go_next(),
            FeedKey::Char('c') | FeedKey::Char('C') => {
                self.chat_open = !self.chat_open;
                None
            }
            FeedKey::Char(_) => None,
        }
    }

    /// Step back one article. No-op at index 0; never wraps.
    pub fn go_previous(&mut self) -> Option<ScrollCommand> {
        let current = self.store.active_index()?;
        if current == 0 {
            return None;
        }
        self.store.set_active(current - 1);
        Some(self.scroll_command(current - 1))
    }

    /// Step forward one article. No-op at the last index; never wraps and
    /// never fetches — growing the store is the proximity check's job, so a
    /// fetch also fires on passive scrolling.
    pub fn go_next(&mut self) -> Option<ScrollCommand> {
        let current = self.store.active_index()?;
        if current + 1 >= self.store.len() {
            return None;
        }
        self.store.set_active(current + 1);
        Some(self.scroll_command(current + 1))
    }

    fn scroll_command(&self, index: usize) -> ScrollCommand {
        // Same formula the scroll inversion uses, so the passive handler
        // re-derives the index this command was issued for.
        ScrollCommand {
            target_offset: index as f64 * self.viewport_height,
            smooth: true,
        }
    }

    /// Whether the proximity check warrants growing the store right now.
    pub fn needs_fetch(&self) -> bool {
        if self.fetch_in_flight {
            return false;
        }
        match self.store.active_index() {
            None => true,
            Some(active) => active + PREFETCH_MARGIN >= self.store.len(),
        }
    }

    /// Claim the in-flight slot and return the cursor to fetch, or `None`
    /// when no fetch is warranted. At most one fetch is outstanding at a
    /// time.
    pub fn begin_prefetch(&mut self) -> Option<PageQuery> {
        if !self.needs_fetch() {
            return None;
        }
        self.fetch_in_flight = true;
        Some(self.query.for_page(self.next_page))
    }

    /// Deliver the outcome of the fetch started by [`begin_prefetch`]. The
    /// in-flight slot is released unconditionally so a later proximity check
    /// can retry; a failure leaves the store untouched. Returns how many
    /// articles were added.
    ///
    /// [`begin_prefetch`]: FeedController::begin_prefetch
    pub fn complete_prefetch(&mut self, result: Result<Vec<Article>>) -> usize {
        self.fetch_in_flight = false;
        match result {
            Ok(batch) => {
                let fetched = batch.len();
                let added = self.store.append(batch);
                if fetched > 0 {
                    self.next_page += 1;
                }
                debug!("prefetch appended {} articles", added);
                added
            }
            Err(e) => {
                warn!("headlines fetch failed: {}", e);
                0
            }
        }
    }

    /// Run one proximity-gated fetch against the provider. Convenience over
    /// [`begin_prefetch`]/[`complete_prefetch`] for owners that are happy to
    /// await inline.
    ///
    /// [`begin_prefetch`]: FeedController::begin_prefetch
    /// [`complete_prefetch`]: FeedController::complete_prefetch
    pub async fn prefetch(&mut self, provider: &dyn HeadlinesProvider) -> usize {
        let Some(query) = self.begin_prefetch() else {
            return 0;
        };
        let result = provider.fetch_page(&query).await;
        self.complete_prefetch(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vert_core::ArticleSource;

    const VIEWPORT: f64 = 800.0;

    fn article(url: &str) -> Article {
        Article {
            url: url.to_string(),
            title: format!("Article at {}", url),
            description: "A description.".to_string(),
            content: None,
            image_url: Some("https://example.com/img.jpg".to_string()),
            published_at: Utc::now(),
            source: ArticleSource {
                id: None,
                name: "test".to_string(),
            },
            author: None,
        }
    }

    fn controller_with(urls: &[&str]) -> FeedController {
        let mut controller = FeedController::new(VIEWPORT, PageQuery::default());
        controller.complete_prefetch(Ok(urls.iter().map(|u| article(u)).collect()));
        controller
    }

    fn flush(controller: &mut FeedController, offset: f64) -> Option<usize> {
        let base = Instant::now();
        controller.on_scroll(offset, base);
        controller.poll_scroll(base + Duration::from_millis(150))
    }

    #[test]
    fn empty_store_performs_no_navigation() {
        let mut controller = FeedController::new(VIEWPORT, PageQuery::default());
        assert_eq!(controller.active_index(), None);
        assert_eq!(controller.go_next(), None);
        assert_eq!(controller.go_previous(), None);
        assert_eq!(controller.on_swipe(100.0, 0.0), None);
        assert_eq!(flush(&mut controller, 3.0 * VIEWPORT), None);
    }

    #[test]
    fn go_next_stops_at_last_index() {
        // store = [A, B, C], two steps forward land on 2, a third is a no-op
        let mut controller = controller_with(&["a", "b", "c"]);
        assert!(controller.go_next().is_some());
        assert!(controller.go_next().is_some());
        assert_eq!(controller.active_index(), Some(2));
        assert_eq!(controller.go_next(), None);
        assert_eq!(controller.active_index(), Some(2));
    }

    #[test]
    fn go_previous_stops_at_zero() {
        let mut controller = controller_with(&["a", "b"]);
        assert_eq!(controller.go_previous(), None);
        assert_eq!(controller.active_index(), Some(0));

        controller.go_next();
        assert!(controller.go_previous().is_some());
        assert_eq!(controller.active_index(), Some(0));
        assert_eq!(controller.go_previous(), None);
    }

    #[test]
    fn single_item_store_is_pinned() {
        let mut controller = controller_with(&["only"]);
        assert_eq!(controller.go_next(), None);
        assert_eq!(controller.go_previous(), None);
        // upward swipe with no next item
        assert_eq!(controller.on_swipe(100.0, 0.0), None);
        assert_eq!(controller.active_index(), Some(0));
    }

    #[test]
    fn swipe_below_threshold_is_ignored() {
        let mut controller = controller_with(&["a", "b"]);
        assert_eq!(controller.on_swipe(120.0, 80.0), None);
        assert_eq!(controller.active_index(), Some(0));

        let cmd = controller.on_swipe(200.0, 100.0).unwrap();
        assert_eq!(controller.active_index(), Some(1));
        assert_eq!(cmd.target_offset, VIEWPORT);
    }

    #[test]
    fn downward_swipe_goes_back() {
        let mut controller = controller_with(&["a", "b"]);
        controller.go_next();
        assert!(controller.on_swipe(0.0, 200.0).is_some());
        assert_eq!(controller.active_index(), Some(0));
    }

    #[test]
    fn keys_are_ignored_while_typing() {
        let mut controller = controller_with(&["a", "b"]);
        assert_eq!(controller.on_key(FeedKey::ArrowDown, true), None);
        assert_eq!(controller.on_key(FeedKey::Space, true), None);
        assert_eq!(controller.active_index(), Some(0));
        let chat_before = controller.chat_open();
        controller.on_key(FeedKey::Char('c'), true);
        assert_eq!(controller.chat_open(), chat_before);
    }

    #[test]
    fn keys_navigate_and_toggle_chat() {
        let mut controller = controller_with(&["a", "b", "c"]);
        assert!(controller.on_key(FeedKey::ArrowDown, false).is_some());
        assert!(controller.on_key(FeedKey::Space, false).is_some());
        assert_eq!(controller.active_index(), Some(2));
        assert!(controller.on_key(FeedKey::ArrowUp, false).is_some());
        assert_eq!(controller.active_index(), Some(1));

        let open = controller.chat_open();
        assert_eq!(controller.on_key(FeedKey::Char('C'), false), None);
        assert_eq!(controller.chat_open(), !open);
        controller.on_key(FeedKey::Char('c'), false);
        assert_eq!(controller.chat_open(), open);

        assert_eq!(controller.on_key(FeedKey::Char('x'), false), None);
    }

    #[test]
    fn scroll_rederives_index_from_offset() {
        let mut controller = controller_with(&["a", "b", "c", "d"]);
        assert_eq!(flush(&mut controller, 2.2 * VIEWPORT), Some(2));
        assert_eq!(controller.active_index(), Some(2));
        // same index again: no change reported
        assert_eq!(flush(&mut controller, 2.4 * VIEWPORT), None);
    }

    #[test]
    fn scroll_beyond_bounds_is_ignored() {
        let mut controller = controller_with(&["a", "b"]);
        assert_eq!(flush(&mut controller, 7.0 * VIEWPORT), None);
        assert_eq!(flush(&mut controller, -2.0 * VIEWPORT), None);
        assert_eq!(controller.active_index(), Some(0));
    }

    #[test]
    fn burst_of_scrolls_applies_only_the_last() {
        let mut controller = controller_with(&["a", "b", "c", "d"]);
        let base = Instant::now();
        controller.on_scroll(3.0 * VIEWPORT, base);
        controller.on_scroll(1.0 * VIEWPORT, base + Duration::from_millis(30));
        assert_eq!(controller.poll_scroll(base + Duration::from_millis(60)), None);
        assert_eq!(
            controller.poll_scroll(base + Duration::from_millis(200)),
            Some(1)
        );
        assert_eq!(controller.active_index(), Some(1));
    }

    #[test]
    fn programmatic_scroll_agrees_with_inversion() {
        // the echo of a go_next scroll command must not move the index again
        let mut controller = controller_with(&["a", "b", "c"]);
        let cmd = controller.go_next().unwrap();
        assert_eq!(flush(&mut controller, cmd.target_offset), None);
        assert_eq!(controller.active_index(), Some(1));
    }

    #[test]
    fn prefetch_waits_until_near_end() {
        let mut controller = controller_with(&["a", "b", "c", "d", "e"]);
        assert!(!controller.needs_fetch());
        assert_eq!(controller.begin_prefetch(), None);

        controller.go_next();
        controller.go_next();
        controller.go_next(); // index 3 of 5: within two of the end
        assert!(controller.needs_fetch());
    }

    #[test]
    fn only_one_fetch_outstanding() {
        let mut controller = FeedController::new(VIEWPORT, PageQuery::default());
        let first = controller.begin_prefetch();
        assert!(first.is_some());
        assert!(controller.fetch_in_flight());
        assert_eq!(controller.begin_prefetch(), None);

        controller.complete_prefetch(Ok(vec![article("a")]));
        assert!(!controller.fetch_in_flight());
    }

    #[test]
    fn failed_fetch_leaves_store_unchanged_and_retryable() {
        let mut controller = controller_with(&["a", "b"]);
        controller.go_next();
        let before: Vec<String> = controller
            .store()
            .items()
            .iter()
            .map(|a| a.url.clone())
            .collect();

        let query = controller.begin_prefetch().unwrap();
        let added =
            controller.complete_prefetch(Err(vert_core::Error::Headlines("down".to_string())));
        assert_eq!(added, 0);
        assert!(!controller.fetch_in_flight());
        let after: Vec<String> = controller
            .store()
            .items()
            .iter()
            .map(|a| a.url.clone())
            .collect();
        assert_eq!(before, after);

        // next qualifying check retries the same page
        let retry = controller.begin_prefetch().unwrap();
        assert_eq!(retry.page, query.page);
    }

    #[test]
    fn successful_fetch_appends_and_advances_page() {
        let mut controller = FeedController::new(VIEWPORT, PageQuery::default());
        let query = controller.begin_prefetch().unwrap();
        assert_eq!(query.page, 1);
        let added = controller.complete_prefetch(Ok(vec![
            article("a"),
            article("b"),
            article("c"),
        ]));
        assert_eq!(added, 3);
        assert_eq!(controller.store().len(), 3);
        assert_eq!(controller.active_index(), Some(0));

        let query = controller.begin_prefetch().unwrap();
        assert_eq!(query.page, 2);
    }

    #[test]
    fn empty_page_does_not_advance_cursor() {
        let mut controller = FeedController::new(VIEWPORT, PageQuery::default());
        controller.begin_prefetch();
        controller.complete_prefetch(Ok(vec![]));
        assert_eq!(controller.begin_prefetch().unwrap().page, 1);
    }

    #[test]
    fn resize_rescales_scroll_targets() {
        let mut controller = controller_with(&["a", "b"]);
        controller.set_viewport_height(400.0);
        let cmd = controller.go_next().unwrap();
        assert_eq!(cmd.target_offset, 400.0);
    }
}

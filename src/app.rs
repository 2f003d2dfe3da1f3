use crate::article::Article;
use crate::browser::ArticleBrowser;
use crate::config::Config;
use crate::hit::HitMap;
use crate::keybindings::KeybindingRegistry;
use crate::motion::{Motion, MorphKind, READY_DELAY};
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use ratatui::layout::Rect;
use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Events from background tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The mount delay elapsed; entry motion may start.
    Ready,
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub browser: ArticleBrowser,

    // Header
    pub title: String,
    pub subtitle: String,
    pub show_search: bool,

    // Theme
    /// Current theme variant (for cycling).
    pub theme_variant: ThemeVariant,
    /// Active style map for all UI rendering.
    pub theme: StyleMap,

    /// Keybinding registry with config overrides applied.
    pub keybindings: KeybindingRegistry,

    pub motion: Motion,

    // Grid
    /// Index into the current grid cards of the keyboard-focused card.
    pub focused_card: usize,
    /// Card under the mouse pointer.
    pub hovered: Option<String>,
    /// First visible grid row. Adjusted by the renderer to keep focus visible.
    pub grid_scroll_row: usize,
    /// Column count of the last rendered grid.
    pub grid_columns: usize,

    // Search
    /// Keystrokes edit the query while true.
    pub search_mode: bool,

    // Detail overlay
    pub detail_scroll: usize,
    /// Inner height of the overlay in the last frame.
    pub detail_visible_lines: usize,
    /// Wrapped line count of the overlay content in the last frame.
    pub detail_content_lines: usize,

    // Layout from the last frame
    pub hit_map: HitMap,
    /// Where each card was drawn, keyed by article id. Source rect of the
    /// expand morph.
    pub card_rects: HashMap<String, Rect>,
    /// Where the detail overlay sits when fully open.
    pub overlay_area: Rect,

    /// Skip frame renders when nothing changed
    pub needs_redraw: bool,

    /// Status message and when it was set.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Whether the help overlay is currently displayed.
    pub show_help: bool,
    /// Scroll offset in the help screen for long keybinding lists.
    pub help_scroll_offset: usize,
    /// Largest help scroll offset in the last frame.
    pub help_max_scroll: usize,

    /// One-shot mount timer that opens the ready gate.
    ///
    /// Aborted on drop so it never fires into a torn-down app.
    pub ready_handle: Option<tokio::task::JoinHandle<()>>,
}

impl App {
    pub fn new(config: &Config, articles: Vec<Article>) -> Self {
        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!("{}", warning);
        }

        let theme_variant = config.theme_variant();

        Self {
            browser: ArticleBrowser::new(articles),
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            show_search: config.show_search,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            motion: Motion::new(config.motion()),
            focused_card: 0,
            hovered: None,
            grid_scroll_row: 0,
            grid_columns: 1,
            search_mode: false,
            detail_scroll: 0,
            detail_visible_lines: 0,
            detail_content_lines: 0,
            hit_map: HitMap::new(),
            card_rects: HashMap::new(),
            overlay_area: Rect::default(),
            needs_redraw: true,
            status_message: None,
            show_help: false,
            help_scroll_offset: 0,
            help_max_scroll: 0,
            ready_handle: None,
        }
    }

    /// Mount: open the ready gate now, or after `READY_DELAY` when animating.
    pub fn start(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        if !self.motion.should_animate() {
            self.browser.mark_ready();
            return;
        }

        if let Some(handle) = self.ready_handle.take() {
            handle.abort();
        }

        let tx = event_tx.clone();
        self.ready_handle = Some(tokio::spawn(async move {
            tokio::time::sleep(READY_DELAY).await;
            if let Err(e) = tx.send(AppEvent::Ready).await {
                tracing::debug!(error = %e, "Ready event dropped (receiver closed)");
            }
        }));
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Ready => {
                self.ready_handle = None;
                self.browser.mark_ready();
            }
        }
        self.needs_redraw = true;
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant (Dark → Light → Dark).
    ///
    /// Returns the name of the new theme for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ------------------------------------------------------------------------
    // Grid focus
    // ------------------------------------------------------------------------

    pub fn grid_len(&self) -> usize {
        self.browser.grid_cards().len()
    }

    /// Id of the keyboard-focused card.
    pub fn focused_id(&self) -> Option<String> {
        self.browser
            .grid_cards()
            .get(self.focused_card)
            .map(|card| card.article.id.clone())
    }

    /// Keep focus on a card after the grid shrinks.
    pub fn clamp_focus(&mut self) {
        let len = self.grid_len();
        if len == 0 {
            self.focused_card = 0;
        } else if self.focused_card >= len {
            self.focused_card = len - 1;
        }
    }

    pub fn nav_left(&mut self) {
        self.focused_card = self.focused_card.saturating_sub(1);
    }

    pub fn nav_right(&mut self) {
        if self.focused_card + 1 < self.grid_len() {
            self.focused_card += 1;
        }
    }

    pub fn nav_up(&mut self) {
        let cols = self.grid_columns.max(1);
        if self.focused_card >= cols {
            self.focused_card -= cols;
        }
    }

    pub fn nav_down(&mut self) {
        let cols = self.grid_columns.max(1);
        if self.focused_card + cols < self.grid_len() {
            self.focused_card += cols;
        }
    }

    /// Set hover from a pointer position. Returns true if it changed.
    pub fn set_hovered(&mut self, id: Option<String>) -> bool {
        if self.hovered == id {
            return false;
        }
        self.hovered = id;
        true
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Open the detail overlay for `id`, morphing from its card when the
    /// card was on screen in the last frame.
    pub fn open_article(&mut self, id: &str) {
        let from = self.card_rects.get(id).copied();
        self.browser.select(id);
        self.search_mode = false;
        self.detail_scroll = 0;
        self.hovered = None;

        if let Some(from) = from {
            if !self.overlay_area.is_empty() {
                self.motion.begin_expand(id, from, self.overlay_area);
            }
        }
        tracing::debug!(id, "Opened article");
        self.needs_redraw = true;
    }

    /// Close the detail overlay; the card morphs back into its grid slot.
    pub fn close_article(&mut self) {
        let from = match self.motion.morph() {
            Some(m) if m.kind == MorphKind::Expand => m.current(),
            _ => self.overlay_area,
        };
        let Some(id) = self.browser.dismiss() else {
            return;
        };

        if !from.is_empty() {
            self.motion.begin_collapse(&id, from);
        }
        self.detail_scroll = 0;

        // Return keyboard focus to the card that was open
        if let Some(index) = self
            .browser
            .grid_cards()
            .iter()
            .position(|card| card.article.id == id)
        {
            self.focused_card = index;
        }
        self.clamp_focus();
        tracing::debug!(id = %id, "Closed article");
        self.needs_redraw = true;
    }

    /// Toggle the bookmark on `id` without touching selection.
    pub fn toggle_bookmark(&mut self, id: &str) {
        if self.browser.toggle_bookmark(id) {
            self.set_status("Bookmarked");
        } else {
            self.set_status("Bookmark removed");
        }
    }

    // ------------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------------

    pub fn enter_search(&mut self) {
        if self.show_search {
            self.search_mode = true;
            self.needs_redraw = true;
        }
    }

    pub fn leave_search(&mut self) {
        self.search_mode = false;
        self.needs_redraw = true;
    }

    /// Append to the query, refusing input past the length cap.
    pub fn push_search_char(&mut self, c: char) {
        if self.browser.search_query().chars().count() >= MAX_SEARCH_QUERY_LENGTH {
            self.set_status(format!(
                "Search query too long (max {} chars)",
                MAX_SEARCH_QUERY_LENGTH
            ));
            return;
        }
        self.browser.push_search_char(c);
        self.on_query_changed();
    }

    pub fn pop_search_char(&mut self) {
        self.browser.pop_search_char();
        self.on_query_changed();
    }

    pub fn clear_search(&mut self) {
        self.browser.set_search_query("");
        self.on_query_changed();
    }

    fn on_query_changed(&mut self) {
        self.grid_scroll_row = 0;
        self.clamp_focus();
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------------
    // Detail scrolling
    // ------------------------------------------------------------------------

    fn max_detail_scroll(&self) -> usize {
        self.detail_content_lines
            .saturating_sub(self.detail_visible_lines)
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.detail_scroll = self.detail_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.detail_scroll = self
            .detail_scroll
            .saturating_add(lines)
            .min(self.max_detail_scroll());
    }

    /// Scroll the help sheet, staying within what the last frame showed.
    pub fn scroll_help_down(&mut self) {
        self.help_scroll_offset = (self.help_scroll_offset + 1).min(self.help_max_scroll);
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll_offset = self.help_scroll_offset.saturating_sub(1);
    }

    /// One page of overlay content, never less than a line.
    pub fn page_lines(&self) -> usize {
        (self.detail_visible_lines / 2).max(1)
    }

    // ------------------------------------------------------------------------
    // Frame tick
    // ------------------------------------------------------------------------

    /// Whether the loop should keep ticking frames.
    pub fn is_animating(&self) -> bool {
        self.motion.is_active(self.browser.is_ready())
    }

    /// Advance motion by `dt`. Returns true if a redraw is needed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let cards = self.grid_len();
        self.motion.advance(dt, self.browser.is_ready(), cards)
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort the mount timer on drop so no ready event outlives the app.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.ready_handle.take() {
            handle.abort();
            tracing::debug!("Aborted ready timer on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::default_articles;
    use tokio::time;

    fn test_app() -> App {
        App::new(&Config::default(), default_articles())
    }

    fn still_app() -> App {
        let config = Config {
            enable_animations: false,
            ..Config::default()
        };
        App::new(&config, default_articles())
    }

    // Status message expiry with time control
    #[tokio::test(start_paused = true)]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        app.set_status("Test message");
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_not_expired_before_3_seconds() {
        let mut app = test_app();
        app.set_status("Test");

        time::advance(Duration::from_millis(2999)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_some());
    }

    // Ready gate
    #[tokio::test(start_paused = true)]
    async fn test_ready_timer_fires_after_delay() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut app = test_app();
        app.start(&tx);
        assert!(!app.browser.is_ready());
        assert!(app.ready_handle.is_some());

        let event = rx.recv().await.unwrap();
        assert_eq!(event, AppEvent::Ready);
        app.handle_event(event);
        assert!(app.browser.is_ready());
        assert!(app.ready_handle.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_timer_not_fired_before_delay() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut app = test_app();
        app.start(&tx);

        time::advance(READY_DELAY - Duration::from_millis(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_ready_timer() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut app = test_app();
        app.start(&tx);
        drop(app);
        drop(tx);

        time::advance(READY_DELAY * 2).await;
        // Channel closed with nothing sent
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_ready_immediately_without_animation() {
        let (tx, _rx) = mpsc::channel(4);
        let mut app = still_app();
        app.start(&tx);
        assert!(app.browser.is_ready());
        assert!(app.ready_handle.is_none());
        assert!(!app.is_animating());
    }

    // Focus
    #[test]
    fn test_grid_navigation_respects_columns() {
        let mut app = still_app();
        app.grid_columns = 3;

        app.nav_down();
        assert_eq!(app.focused_card, 3);
        app.nav_down(); // 6 is past the end
        assert_eq!(app.focused_card, 3);
        app.nav_right();
        app.nav_right();
        assert_eq!(app.focused_card, 5);
        app.nav_right();
        assert_eq!(app.focused_card, 5);
        app.nav_up();
        assert_eq!(app.focused_card, 2);
        app.nav_up();
        assert_eq!(app.focused_card, 2);
    }

    #[test]
    fn test_focus_clamped_when_query_narrows() {
        let mut app = still_app();
        app.focused_card = 5;
        for c in "tech".chars() {
            app.push_search_char(c);
        }
        assert_eq!(app.grid_len(), 1);
        assert_eq!(app.focused_card, 0);
        assert_eq!(app.focused_id().as_deref(), Some("1"));
    }

    #[test]
    fn test_search_length_cap() {
        let mut app = still_app();
        for _ in 0..MAX_SEARCH_QUERY_LENGTH {
            app.push_search_char('a');
        }
        assert!(app.status_message.is_none());
        app.push_search_char('a');
        assert_eq!(
            app.browser.search_query().chars().count(),
            MAX_SEARCH_QUERY_LENGTH
        );
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_enter_search_requires_search_box() {
        let config = Config {
            show_search: false,
            ..Config::default()
        };
        let mut app = App::new(&config, default_articles());
        app.enter_search();
        assert!(!app.search_mode);
    }

    // Selection
    #[test]
    fn test_open_and_close_restore_focus() {
        let mut app = still_app();
        app.open_article("3");
        assert_eq!(app.browser.selected_id(), Some("3"));
        assert_eq!(app.grid_len(), 5);

        app.close_article();
        assert_eq!(app.browser.selected_id(), None);
        assert_eq!(app.focused_id().as_deref(), Some("3"));
    }

    #[test]
    fn test_open_without_animation_starts_no_morph() {
        let mut app = still_app();
        app.card_rects.insert("3".into(), Rect::new(0, 0, 20, 10));
        app.overlay_area = Rect::new(5, 2, 70, 30);
        app.open_article("3");
        assert!(app.motion.morph().is_none());
    }

    #[test]
    fn test_open_morphs_from_last_card_rect() {
        let mut app = test_app();
        app.card_rects.insert("3".into(), Rect::new(0, 10, 20, 10));
        app.overlay_area = Rect::new(5, 2, 70, 30);
        app.open_article("3");

        let morph = app.motion.morph().unwrap();
        assert_eq!(morph.kind, MorphKind::Expand);
        assert_eq!(morph.current(), Rect::new(0, 10, 20, 10));
        assert_eq!(morph.target(), Rect::new(5, 2, 70, 30));
    }

    #[test]
    fn test_close_starts_collapse() {
        let mut app = test_app();
        app.overlay_area = Rect::new(5, 2, 70, 30);
        app.open_article("3");
        app.close_article();

        let morph = app.motion.morph().unwrap();
        assert_eq!(morph.kind, MorphKind::Collapse);
        assert!(app.motion.card_in_flight("3"));
    }

    #[test]
    fn test_close_in_grid_is_noop() {
        let mut app = test_app();
        app.close_article();
        assert!(app.motion.morph().is_none());
    }

    #[test]
    fn test_toggle_bookmark_keeps_selection() {
        let mut app = still_app();
        app.toggle_bookmark("2");
        assert!(app.browser.is_bookmarked("2"));
        assert_eq!(app.browser.selected_id(), None);
        app.toggle_bookmark("2");
        assert!(!app.browser.is_bookmarked("2"));
    }

    #[test]
    fn test_detail_scroll_clamped() {
        let mut app = still_app();
        app.detail_content_lines = 30;
        app.detail_visible_lines = 10;
        app.scroll_down(100);
        assert_eq!(app.detail_scroll, 20);
        app.scroll_up(5);
        assert_eq!(app.detail_scroll, 15);
        app.scroll_up(100);
        assert_eq!(app.detail_scroll, 0);
    }

    #[test]
    fn test_cycle_theme() {
        let mut app = still_app();
        assert_eq!(app.cycle_theme(), "Light");
        assert_eq!(app.cycle_theme(), "Dark");
    }
}

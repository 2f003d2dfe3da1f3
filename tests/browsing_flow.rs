//! End-to-end browsing scenarios through the public API.
//!
//! Scenarios drive `App` with key and mouse events and draw frames into a
//! `TestBackend`, so clicks resolve against real layout.

use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use newsdeck::app::App;
use newsdeck::article::{default_articles, Article};
use newsdeck::browser::ArticleBrowser;
use newsdeck::config::Config;
use newsdeck::hit::HitTarget;
use newsdeck::ui::{handle_input, handle_mouse, render, Action};
use pretty_assertions::assert_eq;
use ratatui::{backend::TestBackend, Terminal};

fn still_app() -> App {
    let config = Config {
        enable_animations: false,
        ..Config::default()
    };
    let mut app = App::new(&config, default_articles());
    app.browser.mark_ready();
    app
}

fn draw(app: &mut App, terminal: &mut Terminal<TestBackend>) {
    terminal.draw(|f| render(f, app)).unwrap();
}

fn click(app: &mut App, column: u16, row: u16) {
    handle_mouse(
        app,
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        },
    );
}

fn type_str(app: &mut App, text: &str) {
    for c in text.chars() {
        handle_input(app, KeyCode::Char(c), KeyModifiers::NONE);
    }
}

fn grid_ids(browser: &ArticleBrowser) -> Vec<String> {
    browser
        .grid_cards()
        .iter()
        .map(|card| card.article.id.clone())
        .collect()
}

// ============================================================================
// Browser scenarios
// ============================================================================

#[test]
fn test_search_tech_leaves_one_card() {
    let mut browser = ArticleBrowser::new(default_articles());
    browser.set_search_query("tech");
    assert_eq!(grid_ids(&browser), vec!["1"]);

    browser.set_search_query("");
    assert_eq!(grid_ids(&browser).len(), 6);
}

#[test]
fn test_select_and_dismiss_climate_article() {
    let mut browser = ArticleBrowser::new(default_articles());
    browser.select("3");

    let detail = browser.detail_view().unwrap();
    assert_eq!(detail.article.subcategory, "Climate Change");
    assert_eq!(detail.paragraphs.len(), 3);
    assert_eq!(grid_ids(&browser), vec!["1", "2", "4", "5", "6"]);

    assert_eq!(browser.dismiss().as_deref(), Some("3"));
    assert_eq!(grid_ids(&browser).len(), 6);
}

#[test]
fn test_bookmarks_survive_filtering() {
    let mut browser = ArticleBrowser::new(default_articles());
    browser.toggle_bookmark("5");
    browser.set_search_query("market");
    assert!(browser.grid_cards().iter().all(|card| !card.bookmarked));

    browser.set_search_query("");
    let space = browser
        .grid_cards()
        .into_iter()
        .find(|card| card.article.id == "5")
        .unwrap();
    assert!(space.bookmarked);
}

#[test]
fn test_article_without_content_shows_placeholder() {
    let article: Article = serde_json::from_str(
        r#"{
            "id": "x",
            "title": "Short Note",
            "category": "Misc",
            "subcategory": "Notes",
            "timeAgo": "now",
            "location": "Here",
            "image": "",
            "source": "Desk"
        }"#,
    )
    .unwrap();
    let mut browser = ArticleBrowser::new(vec![article]);
    browser.select("x");
    let detail = browser.detail_view().unwrap();
    assert_eq!(detail.paragraphs.len(), 1);
    assert!(!detail.paragraphs[0].is_empty());
}

// ============================================================================
// App scenarios
// ============================================================================

#[test]
fn test_click_bookmark_then_open_card() {
    let mut app = still_app();
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    draw(&mut app, &mut terminal);

    let bookmark = app
        .hit_map
        .rect_of(&HitTarget::Bookmark("2".into()))
        .unwrap();
    click(&mut app, bookmark.x, bookmark.y);
    assert!(app.browser.is_bookmarked("2"));
    assert_eq!(app.browser.selected_id(), None);

    draw(&mut app, &mut terminal);
    let card = app.card_rects["2"];
    click(&mut app, card.x + 1, card.y + 6);
    assert_eq!(app.browser.selected_id(), Some("2"));

    draw(&mut app, &mut terminal);
    assert!(!app.card_rects.contains_key("2"));

    handle_input(&mut app, KeyCode::Esc, KeyModifiers::NONE);
    assert_eq!(app.browser.selected_id(), None);
    assert!(app.browser.is_bookmarked("2"));
}

#[test]
fn test_search_then_open_only_match() {
    let mut app = still_app();
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    draw(&mut app, &mut terminal);

    let search = app.hit_map.rect_of(&HitTarget::SearchBox).unwrap();
    click(&mut app, search.x + 2, search.y + 1);
    assert!(app.search_mode);

    type_str(&mut app, "space");
    handle_input(&mut app, KeyCode::Enter, KeyModifiers::NONE);
    assert!(!app.search_mode);
    assert_eq!(app.browser.filtered_len(), 1);

    draw(&mut app, &mut terminal);
    assert_eq!(app.card_rects.len(), 1);

    handle_input(&mut app, KeyCode::Enter, KeyModifiers::NONE);
    assert_eq!(app.browser.selected_id(), Some("5"));
}

#[test]
fn test_quit_is_not_swallowed_outside_search() {
    let mut app = still_app();
    assert_eq!(
        handle_input(&mut app, KeyCode::Char('/'), KeyModifiers::NONE),
        Action::Continue
    );
    assert_eq!(
        handle_input(&mut app, KeyCode::Char('q'), KeyModifiers::NONE),
        Action::Continue
    );
    handle_input(&mut app, KeyCode::Esc, KeyModifiers::NONE);
    assert_eq!(
        handle_input(&mut app, KeyCode::Char('q'), KeyModifiers::NONE),
        Action::Quit
    );
}

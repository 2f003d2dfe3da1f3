//! Frame layout and draw order.
//!
//! Paint order is also hit-test order: header, grid, backdrop and overlay,
//! the card flying home, status bar, help. The hit map is rebuilt from
//! scratch every frame.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use super::{detail, grid, header, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 16;

/// Draw one frame and record its click targets.
pub fn render(f: &mut Frame, app: &mut App) {
    app.hit_map.clear();
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        app.card_rects.clear();
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header::height(app.show_search)),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    // Everything above the status bar
    let main = Rect {
        height: area.height - 1,
        ..area
    };
    app.overlay_area = detail::overlay_rect(main);

    header::render(f, app, chunks[0]);
    grid::render(f, app, chunks[1]);
    detail::render(f, app, main);
    grid::render_flying_card(f, app, main);
    status::render(f, app, chunks[2]);

    if app.show_help {
        help::render(f, app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::default_articles;
    use crate::config::Config;
    use crate::hit::HitTarget;
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

    fn draw(app: &mut App, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_too_small_terminal() {
        let mut app = still_app();
        let terminal = draw(&mut app, 30, 10);
        assert!(screen_text(&terminal).contains("Terminal too small"));
        assert!(app.hit_map.is_empty());
    }

    #[test]
    fn test_header_and_placeholder() {
        let mut app = still_app();
        let text = screen_text(&draw(&mut app, 120, 40));
        assert!(text.contains("Latest News"));
        assert!(text.contains("Stay informed with breaking stories"));
        assert!(text.contains("Search news..."));
    }

    #[test]
    fn test_search_box_hidden_when_disabled() {
        let mut app = still_app();
        app.show_search = false;
        let text = screen_text(&draw(&mut app, 120, 40));
        assert!(!text.contains("Search news..."));
        assert!(app.hit_map.rect_of(&HitTarget::SearchBox).is_none());
    }

    #[test]
    fn test_wide_terminal_shows_three_columns() {
        let mut app = still_app();
        draw(&mut app, 120, 40);
        assert_eq!(app.grid_columns, 3);

        let first = app.card_rects["1"];
        let second = app.card_rects["2"];
        let fourth = app.card_rects["4"];
        assert_eq!(first.y, second.y);
        assert!(second.x > first.x);
        assert_eq!(fourth.x, first.x);
        assert!(fourth.y > first.y);
    }

    #[test]
    fn test_every_visible_card_has_bookmark_above_it() {
        let mut app = still_app();
        draw(&mut app, 120, 40);
        for id in ["1", "2", "3", "4", "5", "6"] {
            let card = app.card_rects[id];
            let bookmark = app
                .hit_map
                .rect_of(&HitTarget::Bookmark(id.to_string()))
                .unwrap();
            assert_eq!(
                app.hit_map.target_at(bookmark.x, bookmark.y),
                Some(&HitTarget::Bookmark(id.to_string()))
            );
            assert_eq!(
                app.hit_map.target_at(card.x + 1, card.bottom() - 2),
                Some(&HitTarget::Card(id.to_string()))
            );
        }
    }

    #[test]
    fn test_detail_overlay_replaces_card() {
        let mut app = still_app();
        draw(&mut app, 120, 40);
        app.open_article("3");
        let text = screen_text(&draw(&mut app, 120, 40));

        assert!(!app.card_rects.contains_key("3"));
        assert!(text.contains("Climate Change"));
        assert!(text.contains("2 hours ago • Geneva"));
        assert!(text.contains("[x]"));
        assert!(text.contains("World leaders"));

        let overlay = app.overlay_area;
        assert_eq!(
            app.hit_map.target_at(overlay.x + 2, overlay.y + 2),
            Some(&HitTarget::Overlay)
        );
        assert_eq!(app.hit_map.target_at(0, 0), Some(&HitTarget::Backdrop));
    }

    #[test]
    fn test_status_bar_counts() {
        let mut app = still_app();
        app.toggle_bookmark("2");
        app.status_message = None;
        let text = screen_text(&draw(&mut app, 120, 40));
        assert!(text.contains("6 articles · 1 bookmarked"));
    }

    #[test]
    fn test_empty_result_message() {
        let mut app = still_app();
        app.browser.set_search_query("zzz");
        let text = screen_text(&draw(&mut app, 120, 40));
        assert!(text.contains("No articles match \"zzz\""));
        assert!(app.card_rects.is_empty());
    }

    #[test]
    fn test_help_overlay_lists_bindings() {
        let mut app = still_app();
        app.show_help = true;
        let text = screen_text(&draw(&mut app, 120, 40));
        assert!(text.contains("-- Grid --"));
        assert!(text.contains("Toggle bookmark"));
    }
}

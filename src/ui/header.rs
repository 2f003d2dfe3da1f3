//! Title, subtitle, and search box.

use crate::app::App;
use crate::hit::HitTarget;
use crate::util::display_width;
use ratatui::{
    layout::{Alignment, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

pub(super) const SEARCH_PLACEHOLDER: &str = "Search news...";

const SEARCH_PROMPT: &str = "/ ";
const MAX_SEARCH_WIDTH: u16 = 60;

/// Rows the header needs: title, subtitle, gap, and a bordered search box.
pub(super) fn height(show_search: bool) -> u16 {
    if show_search {
        6
    } else {
        3
    }
}

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let reveal = app.motion.header(app.browser.is_ready());
    if !reveal.is_visible() || area.height < 2 {
        return;
    }
    let offset = reveal.offset().min(area.height);
    let area = Rect {
        y: area.y + offset,
        height: area.height - offset,
        ..area
    };

    let text = vec![
        Line::from(Span::styled(app.title.clone(), app.theme.resolve("header_title"))),
        Line::from(Span::styled(
            app.subtitle.clone(),
            app.theme.resolve("header_subtitle"),
        )),
    ];
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center),
        Rect { height: 2, ..area },
    );

    if !app.show_search || area.height < height(true) {
        return;
    }

    let width = MAX_SEARCH_WIDTH.min(area.width.saturating_sub(4));
    let search = Rect::new(area.x + (area.width - width) / 2, area.y + 3, width, 3);
    render_search_box(f, app, search);
    app.hit_map.push(search, HitTarget::SearchBox);
}

fn render_search_box(f: &mut Frame, app: &App, area: Rect) {
    let border = if app.search_mode {
        app.theme.resolve("search_box_focused")
    } else {
        app.theme.resolve("search_box")
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width <= SEARCH_PROMPT.len() as u16 {
        return;
    }

    let query = app.browser.search_query();
    let room = inner.width as usize - SEARCH_PROMPT.len();
    let line = if query.is_empty() && !app.search_mode {
        Line::from(vec![
            Span::styled(SEARCH_PROMPT, app.theme.resolve("search_placeholder")),
            Span::styled(SEARCH_PLACEHOLDER, app.theme.resolve("search_placeholder")),
        ])
    } else {
        Line::from(vec![
            Span::styled(SEARCH_PROMPT, border),
            Span::raw(visible_tail(query, room.saturating_sub(1)).to_string()),
        ])
    };
    f.render_widget(Paragraph::new(line), inner);

    if app.search_mode {
        let typed = display_width(visible_tail(query, room.saturating_sub(1))) as u16;
        f.set_cursor_position(Position::new(
            inner.x + SEARCH_PROMPT.len() as u16 + typed,
            inner.y,
        ));
    }
}

/// The end of `query` that fits in `width` columns, so the caret stays in view.
fn visible_tail(query: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = query.len();
    for (idx, c) in query.char_indices().rev() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &query[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_height() {
        assert_eq!(height(true), 6);
        assert_eq!(height(false), 3);
    }

    #[test]
    fn test_visible_tail_keeps_end_of_query() {
        assert_eq!(visible_tail("climate", 20), "climate");
        assert_eq!(visible_tail("a very long search query", 10), "arch query");
        assert_eq!(visible_tail("世界", 3), "界");
    }
}

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar: hints or the transient message on the left,
/// article and bookmark counts on the right.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    // Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    let style = app.theme.resolve("status_bar");

    // Use Cow to avoid allocations for static strings and borrowed status messages
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.show_help {
        Cow::Borrowed("[j/k]scroll [?/Esc]close")
    } else if app.search_mode {
        Cow::Borrowed("Type to search | [Esc/Enter]done [Ctrl+u]clear")
    } else if app.browser.selected_id().is_some() {
        Cow::Borrowed("[Esc/b]close [j/k]scroll [Ctrl+d/u]page [q]uit")
    } else {
        Cow::Borrowed("[hjkl]move [Enter]open [b]ookmark [/]search [T]heme [?]help [q]uit")
    };

    let counts = format!(
        " {} articles · {} bookmarked ",
        app.browser.filtered_len(),
        app.browser.bookmark_count()
    );
    let counts_width = (counts.chars().count() as u16).min(area.width / 2);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(counts_width)])
        .split(area);

    f.render_widget(Paragraph::new(Line::from(text)).style(style), chunks[0]);
    f.render_widget(Paragraph::new(Line::from(counts)).style(style), chunks[1]);
}

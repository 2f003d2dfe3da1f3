//! Keybinding cheat sheet.
//!
//! Drawn over the overlay area with one line per action; every key bound to
//! that action in a context is listed together, so config overrides show up
//! as they are.

use crate::app::App;
use crate::keybindings::{Action, Context};
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const SECTIONS: [(Context, &str); 4] = [
    (Context::Global, "Anywhere"),
    (Context::Grid, "Grid"),
    (Context::Search, "Search box"),
    (Context::Detail, "Open article"),
];

const KEY_COLUMN: usize = 22;

/// Keys joined per action, in registry order.
fn sections(app: &App) -> Vec<(&'static str, Vec<(String, &'static str)>)> {
    let bindings = app.keybindings.all_bindings();
    SECTIONS
        .iter()
        .filter_map(|(ctx, label)| {
            let mut entries: Vec<(Action, Vec<String>, &'static str)> = Vec::new();
            for (_, key, action, description) in bindings.iter().filter(|b| b.0 == *ctx) {
                match entries.iter_mut().find(|(a, _, _)| a == action) {
                    Some((_, keys, _)) => keys.push(key.clone()),
                    None => entries.push((*action, vec![key.clone()], *description)),
                }
            }
            if entries.is_empty() {
                return None;
            }
            let rows = entries
                .into_iter()
                .map(|(_, keys, description)| (keys.join(", "), description))
                .collect();
            Some((*label, rows))
        })
        .collect()
}

pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = if app.overlay_area.is_empty() {
        f.area()
    } else {
        app.overlay_area
    };
    if area.width < 24 || area.height < 6 {
        return;
    }

    let heading = app.theme.resolve("help_heading");
    let body = app.theme.resolve("help_body");

    let mut lines: Vec<Line> = Vec::new();
    for (label, rows) in sections(app) {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(format!("-- {} --", label), heading)));
        for (keys, description) in rows {
            let keys = truncate_to_width(&keys, KEY_COLUMN - 3);
            let pad = KEY_COLUMN.saturating_sub(2 + display_width(&keys));
            lines.push(Line::from(vec![
                Span::styled(format!("  {}{}", keys, " ".repeat(pad)), heading),
                Span::styled(description, body),
            ]));
        }
    }

    let visible = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(visible);
    app.help_max_scroll = max_scroll;
    app.help_scroll_offset = app.help_scroll_offset.min(max_scroll);
    let scroll = app.help_scroll_offset;

    let title = if max_scroll > 0 {
        format!(" Keys {}/{} (j/k, Esc) ", scroll + 1, max_scroll + 1)
    } else {
        " Keys (Esc to close) ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.resolve("detail_border"))
        .title(title);

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(body)
            .scroll((scroll.min(u16::MAX as usize) as u16, 0)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::default_articles;
    use crate::config::Config;
    use std::collections::HashMap;

    #[test]
    fn test_keys_for_one_action_are_merged() {
        let app = App::new(&Config::default(), default_articles());
        let all = sections(&app);
        let grid = &all.iter().find(|(label, _)| *label == "Grid").unwrap().1;

        let bookmark: Vec<_> = grid
            .iter()
            .filter(|(_, description)| *description == "Toggle bookmark")
            .collect();
        assert_eq!(bookmark.len(), 1);
        assert!(bookmark[0].0.contains("Space"));
        assert!(bookmark[0].0.contains('b'));
    }

    #[test]
    fn test_overrides_appear_in_sheet() {
        let mut bindings = HashMap::new();
        bindings.insert("toggle_bookmark".to_string(), "m".to_string());
        let config = Config {
            keybindings: bindings,
            ..Config::default()
        };
        let app = App::new(&config, default_articles());
        let all = sections(&app);
        let grid = &all.iter().find(|(label, _)| *label == "Grid").unwrap().1;
        let (keys, _) = grid
            .iter()
            .find(|(_, description)| *description == "Toggle bookmark")
            .unwrap();
        assert_eq!(keys, "m");
    }

    #[test]
    fn test_every_context_has_a_section() {
        let app = App::new(&Config::default(), default_articles());
        let labels: Vec<_> = sections(&app).into_iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["Anywhere", "Grid", "Search box", "Open article"]);
    }
}

//! Responsive card grid.
//!
//! One column below 80 cells, two below 120, three from there on. Rows are
//! `CARD_HEIGHT` tall and scroll to keep the focused card visible. Cards
//! reveal in order once the ready gate opens; a card morphing back from the
//! detail overlay is skipped here and drawn last by `render_flying_card`.

use crate::app::App;
use crate::hit::HitTarget;
use crate::motion::MorphKind;
use ratatui::{
    layout::{Alignment, Rect},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use super::card::{self, CARD_HEIGHT};

/// Columns between adjacent cards.
const COLUMN_GAP: u16 = 1;

pub(super) fn columns_for_width(width: u16) -> usize {
    match width {
        0..=79 => 1,
        80..=119 => 2,
        _ => 3,
    }
}

/// Whole card rows that fit in `area`, at least one.
fn visible_rows(area: Rect) -> usize {
    (area.height / CARD_HEIGHT).max(1) as usize
}

/// Slot for card `index`, or `None` when its row is scrolled out of view.
pub(super) fn slot_rect(area: Rect, columns: usize, index: usize, scroll_row: usize) -> Option<Rect> {
    let columns = columns.max(1);
    let row = index / columns;
    let col = (index % columns) as u16;
    if row < scroll_row || row - scroll_row >= visible_rows(area) {
        return None;
    }

    let cols = columns as u16;
    let card_width = area.width.saturating_sub(COLUMN_GAP * (cols - 1)) / cols;
    let y = area.y + (row - scroll_row) as u16 * CARD_HEIGHT;
    let slot = Rect::new(
        area.x + col * (card_width + COLUMN_GAP),
        y,
        card_width,
        CARD_HEIGHT.min(area.bottom().saturating_sub(y)),
    );
    (!slot.is_empty()).then_some(slot)
}

/// First visible row that keeps `focused_row` on screen.
fn scroll_for_focus(current: usize, focused_row: usize, rows_visible: usize, total_rows: usize) -> usize {
    let mut scroll = current;
    if focused_row < scroll {
        scroll = focused_row;
    } else if focused_row >= scroll + rows_visible {
        scroll = focused_row + 1 - rows_visible;
    }
    scroll.min(total_rows.saturating_sub(rows_visible))
}

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    app.card_rects.clear();
    if area.width < 1 || area.height < 1 {
        return;
    }

    let columns = columns_for_width(area.width);
    app.grid_columns = columns;

    let ready = app.browser.is_ready();
    let animate = app.motion.should_animate();
    let detail_open = app.browser.selected_id().is_some();
    let cards = app.browser.grid_cards();

    if cards.is_empty() {
        if !detail_open {
            let query = app.browser.search_query();
            let msg = if query.is_empty() {
                "No articles".to_string()
            } else {
                format!("No articles match \"{}\"", query)
            };
            let row = Rect {
                y: area.y + area.height / 2,
                height: 1,
                ..area
            };
            f.render_widget(
                Paragraph::new(Line::from(msg))
                    .style(app.theme.resolve("card_meta"))
                    .alignment(Alignment::Center),
                row,
            );
        }
        collapse_target(app, None);
        return;
    }

    let total_rows = cards.len().div_ceil(columns);
    app.grid_scroll_row = scroll_for_focus(
        app.grid_scroll_row,
        app.focused_card / columns,
        visible_rows(area),
        total_rows,
    );

    let mut in_flight_slot = None;
    for (i, card) in cards.iter().enumerate() {
        let id = &card.article.id;
        let Some(slot) = slot_rect(area, columns, i, app.grid_scroll_row) else {
            continue;
        };
        if app.motion.card_in_flight(id) {
            in_flight_slot = Some(slot);
            continue;
        }

        let reveal = app.motion.card(i, ready);
        if !reveal.is_visible() {
            continue;
        }

        let hovered = app.hovered.as_deref() == Some(id.as_str());
        let focused = !detail_open && !app.search_mode && i == app.focused_card;

        let mut rect = slot;
        rect.y += reveal.offset();
        // Lift the hovered card one row
        if hovered && animate && rect.y > area.y {
            rect.y -= 1;
        }
        let rect = rect.intersection(area);
        if rect.height < 3 {
            continue;
        }

        let bookmark = card::render(f, &app.theme, card, rect, hovered || focused);
        app.card_rects.insert(id.clone(), rect);
        app.hit_map.push(rect, HitTarget::Card(id.clone()));
        if let Some(bookmark) = bookmark {
            app.hit_map.push(bookmark, HitTarget::Bookmark(id.clone()));
        }
    }

    collapse_target(app, in_flight_slot);
}

/// Point a running collapse at the slot its card occupies this frame, or
/// drop the morph when that card is not on screen.
fn collapse_target(app: &mut App, slot: Option<Rect>) {
    let collapsing = app
        .motion
        .morph()
        .is_some_and(|m| m.kind == MorphKind::Collapse);
    if !collapsing {
        return;
    }
    match slot {
        Some(slot) => {
            if let Some(morph) = app.motion.morph_mut() {
                morph.retarget(slot);
            }
        }
        None => {
            tracing::debug!("Collapse target not visible, snapping");
            app.motion.cancel_morph();
        }
    }
}

/// Draw the card shrinking back from the overlay, above everything else.
pub(super) fn render_flying_card(f: &mut Frame, app: &App, area: Rect) {
    let Some(morph) = app.motion.morph() else {
        return;
    };
    if morph.kind != MorphKind::Collapse {
        return;
    }

    let rect = morph.current().intersection(area);
    if rect.height < 3 || rect.width < 5 {
        return;
    }
    let cards = app.browser.grid_cards();
    if let Some(card) = cards.iter().find(|c| c.article.id == morph.id) {
        card::render(f, &app.theme, card, rect, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_by_width() {
        assert_eq!(columns_for_width(60), 1);
        assert_eq!(columns_for_width(79), 1);
        assert_eq!(columns_for_width(80), 2);
        assert_eq!(columns_for_width(119), 2);
        assert_eq!(columns_for_width(120), 3);
        assert_eq!(columns_for_width(300), 3);
    }

    #[test]
    fn test_slot_positions_three_columns() {
        let area = Rect::new(0, 6, 122, 30);
        // (122 - 2) / 3 = 40 wide
        assert_eq!(slot_rect(area, 3, 0, 0), Some(Rect::new(0, 6, 40, 10)));
        assert_eq!(slot_rect(area, 3, 2, 0), Some(Rect::new(82, 6, 40, 10)));
        assert_eq!(slot_rect(area, 3, 4, 0), Some(Rect::new(41, 16, 40, 10)));
    }

    #[test]
    fn test_slots_outside_view_are_none() {
        let area = Rect::new(0, 0, 60, 20);
        // Two rows of one column fit
        assert!(slot_rect(area, 1, 1, 0).is_some());
        assert!(slot_rect(area, 1, 2, 0).is_none());
        assert!(slot_rect(area, 1, 0, 1).is_none());
        assert_eq!(slot_rect(area, 1, 2, 1), Some(Rect::new(0, 10, 60, 10)));
    }

    #[test]
    fn test_scroll_follows_focus() {
        assert_eq!(scroll_for_focus(0, 0, 2, 6), 0);
        assert_eq!(scroll_for_focus(0, 3, 2, 6), 2);
        assert_eq!(scroll_for_focus(4, 1, 2, 6), 1);
        // Never scroll past the last full page
        assert_eq!(scroll_for_focus(5, 5, 2, 6), 4);
        assert_eq!(scroll_for_focus(3, 0, 2, 1), 0);
    }
}

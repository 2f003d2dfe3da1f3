//! Input handling for the TUI.
//!
//! Keys are dispatched by mode: help overlay, search box, detail overlay,
//! then the grid. Mouse clicks go to the topmost region in the last frame's
//! hit map and nowhere else.

use crate::app::App;
use crate::hit::HitTarget;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::Action;

/// Lines moved per mouse wheel notch in the detail overlay.
const WHEEL_LINES: usize = 3;

/// Main key dispatch function.
pub fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    // Help overlay captures all keys when visible
    if app.show_help {
        return handle_help_input(app, code);
    }

    if app.search_mode {
        return handle_search_input(app, code, modifiers);
    }

    if app.browser.selected_id().is_some() {
        handle_detail_input(app, code, modifiers)
    } else {
        handle_grid_input(app, code, modifiers)
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_help_down();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_help_up();
        }
        _ => {}
    }
    Action::Continue
}

/// Global actions shared by the grid and detail contexts.
fn handle_global(app: &mut App, action: KbAction) -> Action {
    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::ShowHelp => app.show_help = true,
        _ => {}
    }
    Action::Continue
}

fn handle_grid_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Grid)
    else {
        return Action::Continue;
    };

    match action {
        KbAction::NavUp => app.nav_up(),
        KbAction::NavDown => app.nav_down(),
        KbAction::NavLeft => app.nav_left(),
        KbAction::NavRight => app.nav_right(),
        KbAction::Open => {
            if let Some(id) = app.focused_id() {
                app.open_article(&id);
            }
        }
        KbAction::ToggleBookmark => {
            if let Some(id) = app.focused_id() {
                app.toggle_bookmark(&id);
            }
        }
        KbAction::FocusSearch => app.enter_search(),
        KbAction::ClearSearch => {
            if !app.browser.search_query().is_empty() {
                app.clear_search();
                app.set_status("Search cleared");
            }
        }
        other => return handle_global(app, other),
    }
    Action::Continue
}

fn handle_detail_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Detail)
    else {
        return Action::Continue;
    };

    match action {
        KbAction::Dismiss => app.close_article(),
        KbAction::ScrollDown => app.scroll_down(1),
        KbAction::ScrollUp => app.scroll_up(1),
        KbAction::PageDown => app.scroll_down(app.page_lines()),
        KbAction::PageUp => app.scroll_up(app.page_lines()),
        other => return handle_global(app, other),
    }
    Action::Continue
}

/// Handle input while the search box has focus.
///
/// Only search-context bindings apply; every other printable key edits the
/// query, so 'q' types a q instead of quitting.
fn handle_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app
        .keybindings
        .action_in_context(code, modifiers, KbContext::Search)
    {
        Some(KbAction::LeaveSearch) => app.leave_search(),
        Some(KbAction::ClearSearch) => app.clear_search(),
        _ => match code {
            KeyCode::Char(c)
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                app.push_search_char(c);
            }
            KeyCode::Backspace => app.pop_search_char(),
            _ => {}
        },
    }
    Action::Continue
}

/// Mouse dispatch: clicks, hover, and wheel.
pub fn handle_mouse(app: &mut App, event: MouseEvent) -> Action {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            click(app, event.column, event.row);
            app.needs_redraw = true;
        }
        MouseEventKind::Moved => {
            let hovered = match app.hit_map.target_at(event.column, event.row) {
                Some(HitTarget::Card(id)) | Some(HitTarget::Bookmark(id)) => Some(id.clone()),
                _ => None,
            };
            if app.set_hovered(hovered) {
                app.needs_redraw = true;
            }
        }
        MouseEventKind::ScrollDown => {
            if app.browser.selected_id().is_some() {
                app.scroll_down(WHEEL_LINES);
            } else if !app.show_help {
                app.nav_down();
            }
            app.needs_redraw = true;
        }
        MouseEventKind::ScrollUp => {
            if app.browser.selected_id().is_some() {
                app.scroll_up(WHEEL_LINES);
            } else if !app.show_help {
                app.nav_up();
            }
            app.needs_redraw = true;
        }
        _ => {}
    }
    Action::Continue
}

/// Deliver a click to the topmost target only.
fn click(app: &mut App, column: u16, row: u16) {
    if app.show_help {
        app.show_help = false;
        app.help_scroll_offset = 0;
        return;
    }

    let target = app.hit_map.target_at(column, row).cloned();
    if app.search_mode && target != Some(HitTarget::SearchBox) {
        app.leave_search();
    }

    match target {
        Some(HitTarget::Close) | Some(HitTarget::Backdrop) => app.close_article(),
        Some(HitTarget::Bookmark(id)) => app.toggle_bookmark(&id),
        Some(HitTarget::Card(id)) => {
            if let Some(index) = app
                .browser
                .grid_cards()
                .iter()
                .position(|card| card.article.id == id)
            {
                app.focused_card = index;
            }
            app.open_article(&id);
        }
        Some(HitTarget::SearchBox) => app.enter_search(),
        Some(HitTarget::Overlay) | None => {}
    }
}

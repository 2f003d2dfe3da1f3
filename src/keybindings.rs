//! Key bindings for the grid, the search box, and the detail overlay.
//!
//! Grid and detail lookups fall back to Global bindings. The search box
//! has no fallback, so printable keys reach the query.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavUp,
    NavDown,
    NavLeft,
    NavRight,
    Open,
    ToggleBookmark,
    FocusSearch,
    LeaveSearch,
    ClearSearch,
    Dismiss,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Label shown in the help sheet.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavUp => "Move to card above",
            Self::NavDown => "Move to card below",
            Self::NavLeft => "Move to previous card",
            Self::NavRight => "Move to next card",
            Self::Open => "Open article",
            Self::ToggleBookmark => "Toggle bookmark",
            Self::FocusSearch => "Search articles",
            Self::LeaveSearch => "Leave search box",
            Self::ClearSearch => "Clear search",
            Self::Dismiss => "Close article",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Which set of bindings is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Grid,
    Search,
    Detail,
}

// ============================================================================
// Key Specification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Form used as a lookup key. Terminals report Shift alongside
    /// shifted characters (`T` arrives as `Char('T')` + SHIFT), so Shift is
    /// dropped for character keys; the character already carries it.
    pub fn normalized(self) -> Self {
        match self.code {
            KeyCode::Char(_) => {
                Self::new(self.code, self.modifiers.difference(KeyModifiers::SHIFT))
            }
            _ => self,
        }
    }
}

/// Names accepted in config, first entry per code is the display form.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("Enter", KeyCode::Enter),
    ("Return", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Escape", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("Backspace", KeyCode::Backspace),
    ("Space", KeyCode::Char(' ')),
];

const MODIFIER_PREFIXES: [(&str, KeyModifiers); 2] = [
    ("ctrl+", KeyModifiers::CONTROL),
    ("alt+", KeyModifiers::ALT),
];

/// Parse a config key string such as `"j"`, `"Space"`, `"F5"`, or `"Ctrl+d"`.
///
/// Modifier prefixes are case-insensitive and may be stacked
/// (`"Ctrl+Alt+x"`). Shift is expressed by the character itself.
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let mut rest = s.trim();
    let mut modifiers = KeyModifiers::NONE;

    'prefixes: loop {
        for (prefix, modifier) in MODIFIER_PREFIXES {
            if rest.len() > prefix.len()
                && rest.is_char_boundary(prefix.len())
                && rest[..prefix.len()].eq_ignore_ascii_case(prefix)
            {
                modifiers |= modifier;
                rest = &rest[prefix.len()..];
                continue 'prefixes;
            }
        }
        break;
    }

    let code = parse_key_code(rest)?;
    // Named keys never take modifiers in bindings
    if !modifiers.is_empty() && !matches!(code, KeyCode::Char(c) if c != ' ') {
        return None;
    }
    Some(KeySpec::new(code, modifiers))
}

fn parse_key_code(s: &str) -> Option<KeyCode> {
    if let Some((_, code)) = NAMED_KEYS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
    {
        return Some(*code);
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => return Some(KeyCode::Char(c)),
        (Some('F' | 'f'), Some(_)) => {}
        _ => return None,
    }
    match s[1..].parse::<u8>() {
        Ok(n @ 1..=12) => Some(KeyCode::F(n)),
        _ => None,
    }
}

/// Display form of a key for the help sheet and status hints.
fn format_key(key: &KeySpec) -> String {
    let mut out = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        out.push_str("Ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        out.push_str("Alt+");
    }
    match key.code {
        KeyCode::F(n) => out.push_str(&format!("F{}", n)),
        code => match NAMED_KEYS.iter().find(|(_, c)| *c == code) {
            Some((name, _)) => out.push_str(name),
            None => match code {
                KeyCode::Char(c) => out.push(c),
                _ => out.push('?'),
            },
        },
    }
    out
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Built-in bindings. Context bindings shadow Global ones for the same key.
const DEFAULT_BINDINGS: &[(Context, KeySpec, Action)] = &[
    (Context::Global, KeySpec::ch('q'), Action::Quit),
    (Context::Global, KeySpec::ch('?'), Action::ShowHelp),
    (Context::Global, KeySpec::ch('T'), Action::CycleTheme),
    (Context::Grid, KeySpec::ch('k'), Action::NavUp),
    (Context::Grid, KeySpec::plain(KeyCode::Up), Action::NavUp),
    (Context::Grid, KeySpec::ch('j'), Action::NavDown),
    (Context::Grid, KeySpec::plain(KeyCode::Down), Action::NavDown),
    (Context::Grid, KeySpec::ch('h'), Action::NavLeft),
    (Context::Grid, KeySpec::plain(KeyCode::Left), Action::NavLeft),
    (Context::Grid, KeySpec::ch('l'), Action::NavRight),
    (Context::Grid, KeySpec::plain(KeyCode::Right), Action::NavRight),
    (Context::Grid, KeySpec::plain(KeyCode::Enter), Action::Open),
    (Context::Grid, KeySpec::ch('b'), Action::ToggleBookmark),
    (Context::Grid, KeySpec::ch(' '), Action::ToggleBookmark),
    (Context::Grid, KeySpec::ch('/'), Action::FocusSearch),
    (Context::Grid, KeySpec::plain(KeyCode::Esc), Action::ClearSearch),
    (Context::Search, KeySpec::plain(KeyCode::Esc), Action::LeaveSearch),
    (Context::Search, KeySpec::plain(KeyCode::Enter), Action::LeaveSearch),
    (Context::Search, KeySpec::plain(KeyCode::Tab), Action::LeaveSearch),
    (Context::Search, KeySpec::ctrl('u'), Action::ClearSearch),
    (Context::Detail, KeySpec::plain(KeyCode::Esc), Action::Dismiss),
    (Context::Detail, KeySpec::ch('b'), Action::Dismiss),
    (Context::Detail, KeySpec::ch('x'), Action::Dismiss),
    (Context::Detail, KeySpec::plain(KeyCode::Backspace), Action::Dismiss),
    (Context::Detail, KeySpec::ch('j'), Action::ScrollDown),
    (Context::Detail, KeySpec::plain(KeyCode::Down), Action::ScrollDown),
    (Context::Detail, KeySpec::ch('k'), Action::ScrollUp),
    (Context::Detail, KeySpec::plain(KeyCode::Up), Action::ScrollUp),
    (Context::Detail, KeySpec::ctrl('d'), Action::PageDown),
    (Context::Detail, KeySpec::ch(' '), Action::PageDown),
    (Context::Detail, KeySpec::ctrl('u'), Action::PageUp),
];

/// Key bindings per context, with config overrides applied on top.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// Insertion order, kept for the help sheet.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::with_capacity(DEFAULT_BINDINGS.len()),
            bindings: Vec::with_capacity(DEFAULT_BINDINGS.len()),
        };
        for &(context, key, action) in DEFAULT_BINDINGS {
            registry.bind(context, key, action);
        }
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        let key = key.normalized();
        if let Some(previous) = self.lookup.insert((context, key), action) {
            self.bindings
                .retain(|&(c, k, a)| !(c == context && k == key && a == previous));
        }
        self.bindings.push((context, key, action));
    }

    /// Apply `action name -> key string` overrides from config.
    ///
    /// The new key replaces every default key of the action, in each context
    /// the action was bound in. Bad entries are skipped and reported in the
    /// returned warnings.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        // Sorted so that conflicting overrides resolve the same way every run
        let mut entries: Vec<_> = overrides.iter().collect();
        entries.sort();

        for (name, key_str) in entries {
            let Some(action) = parse_action_name(name) else {
                warnings.push(format!("Unknown action '{}' in keybindings, skipped", name));
                continue;
            };
            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for '{}', keeping default",
                    key_str, name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for &(c, _, a) in &self.bindings {
                if a == action && !contexts.contains(&c) {
                    contexts.push(c);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|&(_, _, a)| a != action);
            for context in contexts {
                self.bind(context, key, action);
            }

            tracing::info!(action = %name, key = %key_str, "Keybinding override applied");
        }

        warnings
    }

    /// Action bound to a key in `context`, else in Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        self.action_in_context(code, modifiers, context)
            .or_else(|| self.action_in_context(code, modifiers, Context::Global))
    }

    /// Action bound to a key in `context` alone.
    pub fn action_in_context(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        self.lookup
            .get(&(context, KeySpec::new(code, modifiers).normalized()))
            .copied()
    }

    /// `(context, key label, action, description)` for every binding.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|&(context, key, action)| (context, format_key(&key), action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Config names for actions. Underscores are optional.
const ACTION_NAMES: &[(&str, Action)] = &[
    ("quit", Action::Quit),
    ("nav_up", Action::NavUp),
    ("up", Action::NavUp),
    ("nav_down", Action::NavDown),
    ("down", Action::NavDown),
    ("nav_left", Action::NavLeft),
    ("left", Action::NavLeft),
    ("nav_right", Action::NavRight),
    ("right", Action::NavRight),
    ("open", Action::Open),
    ("toggle_bookmark", Action::ToggleBookmark),
    ("bookmark", Action::ToggleBookmark),
    ("focus_search", Action::FocusSearch),
    ("search", Action::FocusSearch),
    ("leave_search", Action::LeaveSearch),
    ("clear_search", Action::ClearSearch),
    ("dismiss", Action::Dismiss),
    ("close", Action::Dismiss),
    ("scroll_down", Action::ScrollDown),
    ("scroll_up", Action::ScrollUp),
    ("page_down", Action::PageDown),
    ("page_up", Action::PageUp),
    ("cycle_theme", Action::CycleTheme),
    ("theme", Action::CycleTheme),
    ("show_help", Action::ShowHelp),
    ("help", Action::ShowHelp),
];

fn parse_action_name(name: &str) -> Option<Action> {
    let wanted = name.trim().to_lowercase().replace(['-', '_'], "");
    ACTION_NAMES
        .iter()
        .find(|(n, _)| n.replace('_', "") == wanted)
        .map(|&(_, action)| action)
}

// ============================================================================
// Tests
// ============================================================================

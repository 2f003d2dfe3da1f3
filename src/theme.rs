//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles. Article gradient
//! tokens (`from-blue-500/20`) are mapped to terminal colors by
//! `GradientTint`.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Header --
    pub header_title: Style,
    pub header_subtitle: Style,
    pub search_box: Style,
    pub search_box_focused: Style,
    pub search_placeholder: Style,

    // -- Cards --
    pub card_border: Style,
    pub card_border_focused: Style,
    pub card_title: Style,
    pub card_meta: Style,
    pub card_image: Style,
    pub category_badge: Style,
    pub trending_badge: Style,
    pub bookmark_on: Style,
    pub bookmark_off: Style,
    pub time_label: Style,

    // -- Detail overlay --
    pub detail_border: Style,
    pub detail_title: Style,
    pub detail_metadata: Style,
    pub detail_body: Style,
    pub subcategory_badge: Style,
    pub close_control: Style,
    pub backdrop: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub help_heading: Style,
    pub help_body: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            header_subtitle: Style::default().fg(Color::Gray),
            search_box: Style::default().fg(Color::DarkGray),
            search_box_focused: Style::default().fg(Color::Cyan),
            search_placeholder: Style::default().fg(Color::DarkGray),

            card_border: Style::default().fg(Color::DarkGray),
            card_border_focused: Style::default().fg(Color::Cyan),
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_meta: Style::default().fg(Color::Gray),
            card_image: Style::default().fg(Color::DarkGray).bg(Color::Black),
            category_badge: Style::default().fg(Color::White).bg(Color::DarkGray),
            trending_badge: Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            bookmark_on: Style::default().fg(Color::Yellow),
            bookmark_off: Style::default().fg(Color::Gray),
            time_label: Style::default().fg(Color::White),

            detail_border: Style::default().fg(Color::Cyan),
            detail_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            detail_metadata: Style::default().fg(Color::DarkGray),
            detail_body: Style::default().fg(Color::Gray),
            subcategory_badge: Style::default().fg(Color::Cyan),
            close_control: Style::default().fg(Color::White).bg(Color::DarkGray),
            backdrop: Style::default().bg(Color::Black).add_modifier(Modifier::DIM),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            help_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            help_body: Style::default(),
        }
    }

    fn light() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            header_subtitle: Style::default().fg(Color::DarkGray),
            search_box: Style::default().fg(Color::Gray),
            search_box_focused: Style::default().fg(Color::Blue),
            search_placeholder: Style::default().fg(Color::Gray),

            card_border: Style::default().fg(Color::Gray),
            card_border_focused: Style::default().fg(Color::Blue),
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_meta: Style::default().fg(Color::DarkGray),
            card_image: Style::default().fg(Color::DarkGray).bg(Color::White),
            category_badge: Style::default().fg(Color::Black).bg(Color::Gray),
            trending_badge: Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            bookmark_on: Style::default().fg(Color::Magenta),
            bookmark_off: Style::default().fg(Color::DarkGray),
            time_label: Style::default().fg(Color::Black),

            detail_border: Style::default().fg(Color::Blue),
            detail_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            detail_metadata: Style::default().fg(Color::DarkGray),
            detail_body: Style::default().fg(Color::Black),
            subcategory_badge: Style::default().fg(Color::Blue),
            close_control: Style::default().fg(Color::Black).bg(Color::Gray),
            backdrop: Style::default().bg(Color::White).add_modifier(Modifier::DIM),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            help_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            help_body: Style::default().fg(Color::Black),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 25] = [
    "header_title",
    "header_subtitle",
    "search_box",
    "search_box_focused",
    "search_placeholder",
    "card_border",
    "card_border_focused",
    "card_title",
    "card_meta",
    "card_image",
    "category_badge",
    "trending_badge",
    "bookmark_on",
    "bookmark_off",
    "time_label",
    "detail_border",
    "detail_title",
    "detail_metadata",
    "detail_body",
    "subcategory_badge",
    "close_control",
    "backdrop",
    "status_bar",
    "help_heading",
    "help_body",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 25] = [
            p.header_title,
            p.header_subtitle,
            p.search_box,
            p.search_box_focused,
            p.search_placeholder,
            p.card_border,
            p.card_border_focused,
            p.card_title,
            p.card_meta,
            p.card_image,
            p.category_badge,
            p.trending_badge,
            p.bookmark_on,
            p.bookmark_off,
            p.time_label,
            p.detail_border,
            p.detail_title,
            p.detail_metadata,
            p.detail_body,
            p.subcategory_badge,
            p.close_control,
            p.backdrop,
            p.status_bar,
            p.help_heading,
            p.help_body,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Gradient Tint
// ============================================================================

/// Two-stop tint painted over a card's image panel, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientTint {
    pub from: Color,
    pub to: Color,
}

impl GradientTint {
    /// Map a `[from, to]` token pair to terminal colors.
    ///
    /// Returns `None` when either token names an unknown color.
    pub fn from_tokens(tokens: &[String; 2]) -> Option<Self> {
        let from = token_color(&tokens[0]);
        let to = token_color(&tokens[1]);
        match (from, to) {
            (Some(from), Some(to)) => Some(Self { from, to }),
            _ => {
                tracing::debug!(tokens = ?tokens, "Unrecognized gradient tokens, skipping tint");
                None
            }
        }
    }

    /// Tint for row `row` of a panel `height` rows tall, counted from the top.
    ///
    /// Bottom third takes `from`, middle third `to`, top third is untinted.
    pub fn row_color(&self, row: u16, height: u16) -> Option<Color> {
        if height == 0 || row >= height {
            return None;
        }
        let from_bottom = height - 1 - row;
        let third = (height as f32 / 3.0).max(1.0);
        let band = (from_bottom as f32 / third) as u16;
        match band {
            0 => Some(self.from),
            1 => Some(self.to),
            _ => None,
        }
    }
}

/// `from-blue-500/20` → `Color::Blue`. Shade and opacity are ignored.
fn token_color(token: &str) -> Option<Color> {
    let name = token
        .trim()
        .strip_prefix("from-")
        .or_else(|| token.trim().strip_prefix("via-"))
        .or_else(|| token.trim().strip_prefix("to-"))?;
    let name = name.split('-').next()?;
    let color = match name {
        "red" | "rose" => Color::Red,
        "orange" | "amber" => Color::LightRed,
        "yellow" => Color::Yellow,
        "green" | "lime" => Color::Green,
        "emerald" => Color::LightGreen,
        "teal" | "cyan" => Color::Cyan,
        "sky" => Color::LightCyan,
        "blue" => Color::Blue,
        "indigo" => Color::LightBlue,
        "purple" | "violet" | "fuchsia" => Color::Magenta,
        "pink" => Color::LightMagenta,
        "gray" | "slate" | "zinc" | "neutral" | "stone" => Color::Gray,
        _ => return None,
    };
    Some(color)
}

// ============================================================================
// Tests
// ============================================================================

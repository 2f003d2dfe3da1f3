//! Article card widget.
//!
//! ```text
//! ┌──────────────────────────┐
//! │ Trending              ☆  │  image panel, tinted bottom-up
//! │      images.example      │
//! │                          │
//! │ 2 hours ago              │
//! │ Technology  San Francisco│
//! │ Breaking: Major Tech     │  title, two lines max
//! │ Company Announces...     │
//! │ Tech Daily               │
//! └──────────────────────────┘
//! ```

use crate::article::Article;
use crate::browser::GridCard;
use crate::theme::{GradientTint, StyleMap};
use crate::util::{clamp_lines, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Outer height of a card, borders included.
pub(super) const CARD_HEIGHT: u16 = 10;

/// Rows of the image panel inside the border.
const IMAGE_ROWS: u16 = 4;

/// Width of the clickable bookmark toggle.
const BOOKMARK_WIDTH: u16 = 3;

/// Draw `card` into `area`. Returns the bookmark toggle's rect, if drawn.
pub(super) fn render(
    f: &mut Frame,
    theme: &StyleMap,
    card: &GridCard<'_>,
    area: Rect,
    highlighted: bool,
) -> Option<Rect> {
    let border_style = if highlighted {
        theme.resolve("card_border_focused")
    } else {
        theme.resolve("card_border")
    };

    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < BOOKMARK_WIDTH + 1 || inner.height < 1 {
        return None;
    }

    let article = card.article;
    let image = Rect {
        height: IMAGE_ROWS.min(inner.height),
        ..inner
    };
    render_image_panel(f, theme, article, image);

    if article.is_trending() {
        let badge = Span::styled(" Trending ", theme.resolve("trending_badge"));
        f.render_widget(Paragraph::new(Line::from(badge)), Rect { height: 1, ..image });
    }

    let bookmark = Rect::new(image.right() - BOOKMARK_WIDTH, image.y, BOOKMARK_WIDTH, 1);
    let (glyph, style) = if card.bookmarked {
        (" ★ ", theme.resolve("bookmark_on"))
    } else {
        (" ☆ ", theme.resolve("bookmark_off"))
    };
    f.render_widget(Paragraph::new(Span::styled(glyph, style)), bookmark);

    if image.height >= 2 {
        let label = format!(" {} ", article.time_ago);
        let row = Rect {
            y: image.bottom() - 1,
            height: 1,
            ..image
        };
        f.render_widget(
            Paragraph::new(Span::styled(
                truncate_to_width(&label, row.width as usize).into_owned(),
                theme.resolve("time_label"),
            )),
            row,
        );
    }

    let body = Rect {
        y: image.bottom(),
        height: inner.height - image.height,
        ..inner
    };
    if body.height > 0 {
        f.render_widget(Paragraph::new(body_lines(theme, article, body.width)), body);
    }

    Some(bookmark)
}

/// Category row, clamped title, and source.
fn body_lines(theme: &StyleMap, article: &Article, width: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    let badge = format!(" {} ", article.category);
    let location_width = width.saturating_sub(badge.chars().count() + 1);

    let mut lines = vec![Line::from(vec![
        Span::styled(badge, theme.resolve("category_badge")),
        Span::raw(" "),
        Span::styled(
            truncate_to_width(&article.location, location_width).into_owned(),
            theme.resolve("card_meta"),
        ),
    ])];

    let title_style = theme.resolve("card_title");
    lines.extend(
        clamp_lines(&article.title, width, 2)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, title_style))),
    );

    lines.push(Line::from(Span::styled(
        truncate_to_width(&article.source, width).into_owned(),
        theme.resolve("card_meta"),
    )));
    lines
}

/// Tinted panel standing in for the article image.
fn render_image_panel(f: &mut Frame, theme: &StyleMap, article: &Article, area: Rect) {
    let base = theme.resolve("card_image");
    f.buffer_mut().set_style(area, base);

    if let Some(tint) = article
        .gradient_colors
        .as_ref()
        .and_then(GradientTint::from_tokens)
    {
        for row in 0..area.height {
            if let Some(color) = tint.row_color(row, area.height) {
                let line = Rect {
                    y: area.y + row,
                    height: 1,
                    ..area
                };
                f.buffer_mut().set_style(line, Style::default().bg(color));
            }
        }
    }

    if area.height >= 3 {
        let label = image_label(&article.image);
        let middle = Rect {
            y: area.y + area.height / 2 - 1,
            height: 1,
            ..area
        };
        f.render_widget(
            Paragraph::new(Span::styled(
                truncate_to_width(&label, middle.width as usize).into_owned(),
                Style::default().add_modifier(Modifier::DIM),
            ))
            .alignment(Alignment::Center),
            middle,
        );
    }
}

/// Placeholder text for an image reference: its host, or a notice when the
/// reference cannot be parsed.
pub(super) fn image_label(uri: &str) -> String {
    match url::Url::parse(uri) {
        Ok(url) => match url.host_str() {
            Some(host) => host.to_string(),
            None => format!("{} image", url.scheme()),
        },
        Err(e) => {
            tracing::debug!(uri, error = %e, "Unparseable image reference");
            "image unavailable".to_string()
        }
    }
}

//! Detail overlay: backdrop, expanded article, and dismiss control.

use crate::app::App;
use crate::browser::DetailView;
use crate::hit::HitTarget;
use crate::motion::MorphKind;
use crate::theme::StyleMap;
use crate::util::wrap_to_width;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Widest the overlay gets, borders included.
const MAX_OVERLAY_WIDTH: u16 = 100;

const CLOSE_LABEL: &str = "[x]";

/// Resting rect of the overlay. The inset grows with the surface.
pub(super) fn overlay_rect(area: Rect) -> Rect {
    let (margin_x, margin_y) = match area.width {
        0..=79 => (2, 1),
        80..=119 => (6, 2),
        _ => (12, 3),
    };
    let width = area
        .width
        .saturating_sub(margin_x * 2)
        .min(MAX_OVERLAY_WIDTH);
    let height = area.height.saturating_sub(margin_y * 2);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + margin_y.min(area.height),
        width,
        height,
    )
}

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let backdrop = app.theme.resolve("backdrop");

    if app.browser.selected_id().is_none() {
        if app.motion.backdrop_lingers() {
            f.buffer_mut().set_style(area, backdrop);
        }
        return;
    }

    f.buffer_mut().set_style(area, backdrop);
    app.hit_map.push(area, HitTarget::Backdrop);

    let frame_rect = match app.motion.morph() {
        Some(m) if m.kind == MorphKind::Expand => m.current().intersection(area),
        _ => app.overlay_area,
    };
    app.hit_map.push(frame_rect, HitTarget::Overlay);
    if frame_rect.width < 3 || frame_rect.height < 3 {
        return;
    }

    f.render_widget(Clear, frame_rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.resolve("detail_border"));
    let inner = block.inner(frame_rect);
    f.render_widget(block, frame_rect);

    let close_width = CLOSE_LABEL.len() as u16;
    if app.motion.close_control_visible() && frame_rect.width >= close_width + 4 {
        let close = Rect::new(frame_rect.right() - close_width - 2, frame_rect.y, close_width, 1);
        f.render_widget(
            Paragraph::new(Span::styled(CLOSE_LABEL, app.theme.resolve("close_control"))),
            close,
        );
        app.hit_map.push(close, HitTarget::Close);
    }

    let full = app.motion.detail_content_visible();
    let lines = match app.browser.detail_view() {
        Some(view) => detail_lines(&view, &app.theme, inner.width as usize, full),
        None => return,
    };

    app.detail_content_lines = lines.len();
    app.detail_visible_lines = inner.height as usize;
    let max_scroll = app
        .detail_content_lines
        .saturating_sub(app.detail_visible_lines);
    app.detail_scroll = app.detail_scroll.min(max_scroll);

    // ratatui scroll is u16
    let scroll = app.detail_scroll.min(u16::MAX as usize) as u16;
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

/// Overlay content wrapped to `width`. Paragraphs are left out while the
/// overlay is still growing.
fn detail_lines(
    view: &DetailView<'_>,
    theme: &StyleMap,
    width: usize,
    with_body: bool,
) -> Vec<Line<'static>> {
    let article = view.article;
    let metadata = theme.resolve("detail_metadata");

    let mut badges = vec![
        Span::styled(format!(" {} ", article.category), theme.resolve("category_badge")),
        Span::raw(" "),
        Span::styled(article.subcategory.clone(), theme.resolve("subcategory_badge")),
    ];
    if view.bookmarked {
        badges.push(Span::styled("  ★", theme.resolve("bookmark_on")));
    }

    let mut lines = vec![
        Line::from(badges),
        Line::from(Span::styled(
            format!("{} • {}", article.time_ago, article.location),
            metadata,
        )),
        Line::default(),
    ];

    let title = theme.resolve("detail_title");
    lines.extend(
        wrap_to_width(&article.title, width)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, title))),
    );
    lines.push(Line::from(Span::styled(
        format!("{} • {}", article.source, article.time_ago),
        metadata,
    )));

    if with_body {
        let body = theme.resolve("detail_body");
        for paragraph in &view.paragraphs {
            lines.push(Line::default());
            lines.extend(
                wrap_to_width(paragraph, width)
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, body))),
            );
        }
    }
    lines
}

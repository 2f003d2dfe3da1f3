//! Click targets recorded while drawing a frame.
//!
//! Regions are pushed in paint order; a point resolves to the region painted
//! last, and only to that one. A bookmark toggle painted over its card
//! therefore swallows the click instead of also opening the card.
use ratatui::layout::{Position, Rect};

/// What sits under a pointer position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    SearchBox,
    Card(String),
    Bookmark(String),
    /// Dimmed area around the detail overlay.
    Backdrop,
    /// Detail overlay body. Swallows clicks.
    Overlay,
    Close,
}

#[derive(Debug, Default, Clone)]
pub struct HitMap {
    regions: Vec<(Rect, HitTarget)>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Record `target` as painted over `area`. Empty areas are ignored.
    pub fn push(&mut self, area: Rect, target: HitTarget) {
        if area.is_empty() {
            return;
        }
        self.regions.push((area, target));
    }

    /// Topmost target at (`column`, `row`).
    pub fn target_at(&self, column: u16, row: u16) -> Option<&HitTarget> {
        let pos = Position::new(column, row);
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, target)| target)
    }

    /// Area of the most recently painted region for `target`.
    pub fn rect_of(&self, target: &HitTarget) -> Option<Rect> {
        self.regions
            .iter()
            .rev()
            .find(|(_, t)| t == target)
            .map(|(area, _)| *area)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

//! Motion layer: entry reveal, shared-element morphs, and their springs.
//!
//! Nothing in here affects browser data. When animation is disabled (by
//! configuration or a reduced-motion preference) every query answers as if
//! all motion had already settled, and morphs are never started.
//!
//! Time is passed in explicitly as a `Duration` step so the loop's frame
//! tick drives everything and tests can step deterministically.
use ratatui::layout::Rect;
use std::time::Duration;

/// Delay between mount and opening the ready gate.
pub const READY_DELAY: Duration = Duration::from_millis(100);

/// Header starts revealing this long after the gate opens.
pub const HEADER_DELAY: Duration = Duration::from_millis(200);

/// First card starts revealing this long after the gate opens.
pub const CARDS_DELAY: Duration = Duration::from_millis(500);

/// Gap between consecutive card reveals.
pub const STAGGER: Duration = Duration::from_millis(100);

/// Rows a card travels while sliding into place.
pub const CARD_SLIDE_ROWS: f32 = 2.0;

/// Rows the header travels while dropping into place.
pub const HEADER_SLIDE_ROWS: f32 = 1.0;

/// Largest integration step; longer frames are subdivided.
const MAX_STEP: Duration = Duration::from_micros(8_333);

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionSettings {
    pub enable_animations: bool,
    pub reduce_motion: bool,
}

impl MotionSettings {
    pub fn should_animate(self) -> bool {
        self.enable_animations && !self.reduce_motion
    }
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            enable_animations: true,
            reduce_motion: false,
        }
    }
}

// ============================================================================
// Spring
// ============================================================================

/// Damped spring pulling a scalar from 0 toward 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

pub const HEADER_SPRING: Spring = Spring {
    stiffness: 400.0,
    damping: 28.0,
    mass: 1.0,
};

pub const CARD_SPRING: Spring = Spring {
    stiffness: 300.0,
    damping: 28.0,
    mass: 1.0,
};

pub const LAYOUT_SPRING: Spring = Spring {
    stiffness: 400.0,
    damping: 32.0,
    mass: 1.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpringState {
    pub value: f32,
    pub velocity: f32,
    pub settled: bool,
}

impl SpringState {
    pub fn settled() -> Self {
        Self {
            value: 1.0,
            velocity: 0.0,
            settled: true,
        }
    }
}

impl Spring {
    const REST_DISTANCE: f32 = 0.005;
    const REST_VELOCITY: f32 = 0.01;

    /// Advance `state` by `dt` with semi-implicit Euler integration.
    pub fn step(&self, state: &mut SpringState, dt: Duration) {
        if state.settled {
            return;
        }

        let mut remaining = dt;
        while !remaining.is_zero() {
            let h = remaining.min(MAX_STEP);
            remaining -= h;
            let h = h.as_secs_f32();

            let displacement = state.value - 1.0;
            let force = -self.stiffness * displacement - self.damping * state.velocity;
            state.velocity += force / self.mass * h;
            state.value += state.velocity * h;

            if (state.value - 1.0).abs() < Self::REST_DISTANCE
                && state.velocity.abs() < Self::REST_VELOCITY
            {
                *state = SpringState::settled();
                return;
            }
        }
    }
}

// ============================================================================
// Entry Reveal
// ============================================================================

/// How a revealing element should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    /// Not drawn yet.
    Hidden,
    /// Drawn this many rows below its resting position.
    Offset(u16),
}

impl Reveal {
    fn from_progress(state: &SpringState, started: bool, slide_rows: f32) -> Self {
        if !started {
            return Reveal::Hidden;
        }
        let rows = ((1.0 - state.value) * slide_rows).round().max(0.0);
        Reveal::Offset(rows as u16)
    }

    pub fn is_visible(self) -> bool {
        !matches!(self, Reveal::Hidden)
    }

    pub fn offset(self) -> u16 {
        match self {
            Reveal::Hidden => 0,
            Reveal::Offset(rows) => rows,
        }
    }
}

/// Staggered header + card reveal after the ready gate opens.
#[derive(Debug, Clone, Default)]
struct EntryMotion {
    elapsed: Duration,
    header: SpringState,
    cards: Vec<SpringState>,
    finished: bool,
}

impl EntryMotion {
    fn card_start(index: usize) -> Duration {
        CARDS_DELAY + STAGGER * index as u32
    }

    fn advance(&mut self, dt: Duration, card_count: usize) {
        if self.finished {
            return;
        }
        if self.cards.len() < card_count {
            self.cards.resize(card_count, SpringState::default());
        }

        let before = self.elapsed;
        self.elapsed += dt;

        step_delayed(&HEADER_SPRING, &mut self.header, HEADER_DELAY, before, self.elapsed);
        for (i, card) in self.cards.iter_mut().enumerate().take(card_count) {
            step_delayed(&CARD_SPRING, card, Self::card_start(i), before, self.elapsed);
        }

        self.finished =
            self.header.settled && self.cards.iter().take(card_count).all(|c| c.settled);
        if self.finished {
            tracing::debug!(elapsed_ms = self.elapsed.as_millis() as u64, "Entry motion finished");
        }
    }

    fn header(&self) -> Reveal {
        if self.finished {
            return Reveal::Offset(0);
        }
        Reveal::from_progress(&self.header, self.elapsed >= HEADER_DELAY, HEADER_SLIDE_ROWS)
    }

    fn card(&self, index: usize) -> Reveal {
        if self.finished {
            return Reveal::Offset(0);
        }
        let started = self.elapsed >= Self::card_start(index);
        match self.cards.get(index) {
            Some(state) => Reveal::from_progress(state, started, CARD_SLIDE_ROWS),
            None if started => Reveal::Offset(CARD_SLIDE_ROWS as u16),
            None => Reveal::Hidden,
        }
    }
}

/// Step `state` only for the part of `[before, now)` after `delay`.
fn step_delayed(
    spring: &Spring,
    state: &mut SpringState,
    delay: Duration,
    before: Duration,
    now: Duration,
) {
    if now <= delay {
        return;
    }
    let active = now - before.max(delay);
    spring.step(state, active);
}

// ============================================================================
// Shared-Element Morph
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphKind {
    /// Card grows into the detail overlay.
    Expand,
    /// Detail overlay shrinks back into its card slot.
    Collapse,
}

/// Rectangle interpolation between a card slot and the overlay, keyed by
/// article id.
#[derive(Debug, Clone)]
pub struct Morph {
    pub id: String,
    pub kind: MorphKind,
    from: Rect,
    to: Rect,
    spring: SpringState,
}

impl Morph {
    pub fn new(id: impl Into<String>, kind: MorphKind, from: Rect, to: Rect) -> Self {
        Self {
            id: id.into(),
            kind,
            from,
            to,
            spring: SpringState::default(),
        }
    }

    /// Move the destination; the next `current` interpolates toward it.
    pub fn retarget(&mut self, to: Rect) {
        self.to = to;
    }

    pub fn target(&self) -> Rect {
        self.to
    }

    pub fn progress(&self) -> f32 {
        self.spring.value
    }

    pub fn is_settled(&self) -> bool {
        self.spring.settled
    }

    fn advance(&mut self, dt: Duration) {
        LAYOUT_SPRING.step(&mut self.spring, dt);
    }

    /// The interpolated rectangle for this frame.
    ///
    /// May overshoot the target slightly; callers clip to the frame.
    pub fn current(&self) -> Rect {
        lerp_rect(self.from, self.to, self.spring.value)
    }
}

fn lerp(a: u16, b: u16, t: f32) -> u16 {
    let v = a as f32 + (b as f32 - a as f32) * t;
    v.round().clamp(0.0, u16::MAX as f32) as u16
}

/// Linear interpolation between two rectangles, at least 1x1.
pub fn lerp_rect(from: Rect, to: Rect, t: f32) -> Rect {
    Rect {
        x: lerp(from.x, to.x, t),
        y: lerp(from.y, to.y, t),
        width: lerp(from.width, to.width, t).max(1),
        height: lerp(from.height, to.height, t).max(1),
    }
}

// ============================================================================
// Motion State
// ============================================================================

/// All in-flight motion for one browser instance.
#[derive(Debug, Clone)]
pub struct Motion {
    settings: MotionSettings,
    entry: EntryMotion,
    morph: Option<Morph>,
}

impl Motion {
    pub fn new(settings: MotionSettings) -> Self {
        Self {
            settings,
            entry: EntryMotion::default(),
            morph: None,
        }
    }

    pub fn should_animate(&self) -> bool {
        self.settings.should_animate()
    }

    /// True while anything still needs frames.
    pub fn is_active(&self, ready: bool) -> bool {
        if !self.should_animate() {
            return false;
        }
        (ready && !self.entry.finished) || self.morph.is_some()
    }

    /// Step every running animation by `dt`. Returns true if anything moved.
    pub fn advance(&mut self, dt: Duration, ready: bool, card_count: usize) -> bool {
        if !self.is_active(ready) {
            return false;
        }

        if ready {
            self.entry.advance(dt, card_count);
        }

        if let Some(morph) = self.morph.as_mut() {
            morph.advance(dt);
            if morph.is_settled() {
                tracing::debug!(id = %morph.id, kind = ?morph.kind, "Morph settled");
                self.morph = None;
            }
        }
        true
    }

    pub fn header(&self, ready: bool) -> Reveal {
        if !self.should_animate() {
            return Reveal::Offset(0);
        }
        if !ready {
            return Reveal::Hidden;
        }
        self.entry.header()
    }

    pub fn card(&self, index: usize, ready: bool) -> Reveal {
        if !self.should_animate() {
            return Reveal::Offset(0);
        }
        if !ready {
            return Reveal::Hidden;
        }
        self.entry.card(index)
    }

    /// Start growing card `id` from `from` into the overlay at `to`.
    pub fn begin_expand(&mut self, id: &str, from: Rect, to: Rect) {
        if !self.should_animate() {
            return;
        }
        self.morph = Some(Morph::new(id, MorphKind::Expand, from, to));
    }

    /// Start shrinking the overlay at `from` back toward the card slot.
    ///
    /// The slot is unknown until the grid is laid out again, so the morph
    /// starts targeting `from` and the renderer retargets it.
    pub fn begin_collapse(&mut self, id: &str, from: Rect) {
        if !self.should_animate() {
            return;
        }
        self.morph = Some(Morph::new(id, MorphKind::Collapse, from, from));
    }

    pub fn morph(&self) -> Option<&Morph> {
        self.morph.as_ref()
    }

    pub fn morph_mut(&mut self) -> Option<&mut Morph> {
        self.morph.as_mut()
    }

    pub fn cancel_morph(&mut self) {
        self.morph = None;
    }

    /// Whether the grid should skip drawing card `id` this frame.
    pub fn card_in_flight(&self, id: &str) -> bool {
        self.morph
            .as_ref()
            .is_some_and(|m| m.kind == MorphKind::Collapse && m.id == id)
    }

    /// Whether the overlay's dismiss control is drawn.
    pub fn close_control_visible(&self) -> bool {
        match &self.morph {
            Some(m) if m.kind == MorphKind::Expand => m.progress() >= 0.5,
            _ => true,
        }
    }

    /// Whether the overlay's paragraphs are drawn.
    pub fn detail_content_visible(&self) -> bool {
        !matches!(&self.morph, Some(m) if m.kind == MorphKind::Expand)
    }

    /// Whether the backdrop is drawn while no article is selected.
    pub fn backdrop_lingers(&self) -> bool {
        matches!(&self.morph, Some(m) if m.kind == MorphKind::Collapse && m.progress() < 0.5)
    }
}

// ============================================================================
// Tests
// ============================================================================

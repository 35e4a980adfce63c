//! Endless carousel: index bookkeeping for a circular strip of slots.
//!
//! The strip is the backing sequence with the last `visible` items copied in
//! front (lead pad) and the first `visible` items copied behind (trail pad).
//! The cursor only ever moves one animated step at a time; once an animation
//! that ended inside a pad has finished, the cursor is silently moved by one
//! core length to the slot showing the same item (the correction), which is
//! the only update that must be painted without animation.
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_VISIBLE: usize = 6;
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_millis(5000);
pub const TRANSITION: Duration = Duration::from_millis(500);
/// Pointer travel that counts as a flick regardless of the drag threshold.
pub const FLICK_PX: f32 = 50.0;

/// Slots shown for a viewport width, following the usual sm/md/lg/xl breakpoints.
pub fn visible_for_width(viewport_width: f32) -> usize {
    match viewport_width {
        w if w < 640.0 => 2,
        w if w < 768.0 => 3,
        w if w < 1024.0 => 4,
        w if w < 1280.0 => 5,
        _ => DEFAULT_VISIBLE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Animating,
    Correcting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    LeadPad,
    Core,
    TrailPad,
}

/// What the host paints: translate the strip by `-offset_percent`% of the
/// viewport plus `drag_offset_px`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub index: usize,
    pub offset_percent: f32,
    pub drag_offset_px: f32,
    pub animate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveChanged {
    /// Position in the backing items.
    pub item_index: usize,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start_x: f32,
    last_x: f32,
    offset: f32,
}

#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
    visible: usize,
    // Strip slots as indices into `items`.
    strip: Vec<usize>,
    core_len: usize,
    index: usize,
    phase: Phase,
    transition_enabled: bool,
    paused: bool,
    drag: Option<Drag>,
    next_tick: Option<Instant>,
}

impl<T> Carousel<T> {
    pub fn new(items: Vec<T>, visible: usize, now: Instant) -> Self {
        let mut carousel = Self {
            items,
            visible: visible.max(1),
            strip: Vec::new(),
            core_len: 0,
            index: 0,
            phase: Phase::Idle,
            transition_enabled: false,
            paused: false,
            drag: None,
            next_tick: None,
        };
        carousel.rebuild(now);
        carousel
    }

    pub fn set_items(&mut self, items: Vec<T>, now: Instant) {
        self.items = items;
        self.rebuild(now);
    }

    pub fn set_visible_count(&mut self, visible: usize, now: Instant) {
        let visible = visible.max(1);
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        self.rebuild(now);
    }

    pub fn resize(&mut self, viewport_width: f32, now: Instant) {
        self.set_visible_count(visible_for_width(viewport_width), now);
    }

    fn rebuild(&mut self, now: Instant) {
        self.strip.clear();
        self.drag = None;
        self.phase = Phase::Idle;
        self.transition_enabled = false;
        let len = self.items.len();
        if len == 0 {
            self.core_len = 0;
            self.index = 0;
            self.next_tick = None;
            return;
        }
        // Short lists are repeated so the loop never shows fewer frames than slots.
        let repeats = self.visible.div_ceil(len).max(1);
        let core: Vec<usize> = (0..len).cycle().take(len * repeats).collect();
        self.core_len = core.len();
        self.strip
            .extend_from_slice(&core[self.core_len - self.visible..]);
        self.strip.extend_from_slice(&core);
        self.strip.extend_from_slice(&core[..self.visible]);
        self.index = self.visible;
        self.arm_autoplay(now);
        debug!(
            "Carousel rebuilt: {} items, {} visible, strip of {}",
            len,
            self.visible,
            self.strip.len()
        );
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn region(&self) -> Region {
        self.region_of(self.index)
    }

    fn region_of(&self, index: usize) -> Region {
        if index < self.visible {
            Region::LeadPad
        } else if index >= self.visible + self.core_len {
            Region::TrailPad
        } else {
            Region::Core
        }
    }

    // Furthest cursor position that still fills every visible slot.
    fn max_index(&self) -> usize {
        self.core_len + self.visible
    }

    /// Slots of the strip in paint order.
    pub fn slots(&self) -> impl Iterator<Item = &T> + '_ {
        self.strip.iter().map(move |&i| &self.items[i])
    }

    pub fn active_index(&self) -> Option<usize> {
        self.strip.get(self.index).copied()
    }

    pub fn active(&self) -> Option<&T> {
        self.active_index().map(|i| &self.items[i])
    }

    pub fn frame(&self) -> Option<Frame> {
        if self.is_empty() {
            return None;
        }
        Some(Frame {
            index: self.index,
            offset_percent: self.index as f32 * 100.0 / self.visible as f32,
            drag_offset_px: self.drag.map(|d| d.offset).unwrap_or(0.0),
            animate: self.transition_enabled && self.drag.is_none(),
        })
    }

    pub fn next_tick_at(&self) -> Option<Instant> {
        self.next_tick
    }

    fn arm_autoplay(&mut self, now: Instant) {
        self.next_tick = if self.is_empty() || self.paused || self.drag.is_some() {
            None
        } else {
            Some(now + AUTOPLAY_INTERVAL)
        };
    }

    /// Fires the autoplay step when due. Returns whether it fired.
    pub fn poll_autoplay(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_tick else {
            return false;
        };
        if now < due {
            return false;
        }
        self.next_tick = Some(due + AUTOPLAY_INTERVAL);
        self.step(1);
        true
    }

    pub fn next(&mut self) -> bool {
        self.step(1)
    }

    pub fn prev(&mut self) -> bool {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> bool {
        if self.is_empty() {
            return false;
        }
        let target = self.index as isize + delta;
        if target < 0 || target as usize > self.max_index() {
            debug!("Carousel step to {} ignored", target);
            return false;
        }
        self.move_to(target as usize);
        true
    }

    /// Animates directly to a slot of the strip (e.g. a clicked card).
    pub fn select_slot(&mut self, slot: usize) -> bool {
        if self.is_empty() {
            return false;
        }
        let slot = slot.min(self.max_index());
        if slot == self.index {
            return false;
        }
        self.move_to(slot);
        true
    }

    fn move_to(&mut self, index: usize) {
        self.index = index;
        self.transition_enabled = true;
        self.phase = Phase::Animating;
    }

    /// The host's transition finished. Corrects the cursor out of a pad if
    /// needed and reports the settled item.
    pub fn transition_end(&mut self) -> Option<ActiveChanged> {
        if self.phase != Phase::Animating {
            return None;
        }
        match self.region() {
            Region::Core => self.phase = Phase::Idle,
            Region::LeadPad => self.correct(self.index + self.core_len),
            Region::TrailPad => self.correct(self.index - self.core_len),
        }
        self.active_index()
            .map(|item_index| ActiveChanged { item_index })
    }

    fn correct(&mut self, index: usize) {
        debug!("Carousel wrap correction {} -> {}", self.index, index);
        self.index = index;
        self.transition_enabled = false;
        self.phase = Phase::Correcting;
    }

    /// The un-animated correction frame has been painted.
    pub fn correction_painted(&mut self) {
        if self.phase == Phase::Correcting {
            self.phase = Phase::Idle;
        }
    }

    pub fn pointer_enter(&mut self) {
        self.paused = true;
        self.next_tick = None;
    }

    /// Leaving the carousel resumes autoplay and ends any drag in progress.
    pub fn pointer_leave(&mut self, viewport_width: f32, now: Instant) -> bool {
        self.paused = false;
        let committed = self.drag_end(viewport_width, now);
        self.arm_autoplay(now);
        committed
    }

    pub fn drag_start(&mut self, x: f32) {
        if self.is_empty() {
            return;
        }
        self.drag = Some(Drag {
            start_x: x,
            last_x: x,
            offset: 0.0,
        });
        self.transition_enabled = false;
        self.next_tick = None;
    }

    pub fn drag_move(&mut self, x: f32) {
        if let Some(drag) = self.drag.as_mut() {
            drag.offset += x - drag.last_x;
            drag.last_x = x;
        }
    }

    /// Commits at most one step: backwards for a rightward drag, forwards
    /// for a leftward one. Returns whether a step was committed.
    pub fn drag_end(&mut self, viewport_width: f32, now: Instant) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.transition_enabled = true;
        let threshold = viewport_width / self.visible as f32 / 3.0;
        let velocity = drag.last_x - drag.start_x;
        let committed = if drag.offset.abs() > threshold || velocity.abs() > FLICK_PX {
            if drag.offset > 0.0 || velocity > FLICK_PX {
                self.step(-1)
            } else {
                self.step(1)
            }
        } else {
            false
        };
        self.arm_autoplay(now);
        committed
    }
}

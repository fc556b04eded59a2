//! Drag interaction: bounded card dragging with elastic snap-back.
//!
//! Per card:
//!
//! ```text
//! Idle --start--> Dragging --end--> SnappingBack --settled--> Idle
//!                     ^                   |
//!                     +------start--------+
//! ```
//!
//! While dragging, pointer deltas accumulate into the offset, which is
//! rescaled onto a circle of radius R whenever it would leave it. On
//! release the logical offset drops to zero at once; the visible return is
//! an animation owned by the renderer. A settle timer slightly longer than
//! the animation requests one last redraw so connectors end up on the
//! resting position even if no frame observed the animation's tail.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use glam::Vec2;

use super::easing::Easing;
use super::renderer::{OffsetAnimation, Renderer};
use super::scheduler::RedrawRequester;
use super::timers::{TimerHandle, TimerQueue};
use crate::entities::CardItem;

pub const DRAG_RADIUS: f32 = 120.0;
pub const SNAP_BACK_MS: u64 = 900;
/// Snap-back duration plus a small slack.
pub const SETTLE_REDRAW_MS: u64 = 920;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    SnappingBack,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub offset: Vec2,
    pub phase: DragPhase,
}

/// Rescale `offset` onto the circle of `radius` if it lies outside.
pub fn clamp_offset(offset: Vec2, radius: f32) -> Vec2 {
    let d = offset.length();
    if d > radius && d > 0.0 {
        offset / d * radius
    } else {
        offset
    }
}

impl DragState {
    /// Enter `Dragging`. Returns false if already dragging.
    pub fn begin(&mut self) -> bool {
        if self.phase == DragPhase::Dragging {
            return false;
        }
        self.phase = DragPhase::Dragging;
        true
    }

    /// Add a pointer delta; returns the clamped offset, or `None` when not dragging.
    pub fn accumulate(&mut self, delta: Vec2, radius: f32) -> Option<Vec2> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        self.offset = clamp_offset(self.offset + delta, radius);
        Some(self.offset)
    }

    /// Leave `Dragging` for `SnappingBack`, resetting the offset.
    /// Returns the offset the card was released at.
    pub fn release(&mut self) -> Option<Vec2> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        let released = self.offset;
        self.offset = Vec2::ZERO;
        self.phase = DragPhase::SnappingBack;
        Some(released)
    }

    /// Finish snap-back. Returns false if the card was not snapping back.
    pub fn settle(&mut self) -> bool {
        if self.phase != DragPhase::SnappingBack {
            return false;
        }
        self.phase = DragPhase::Idle;
        true
    }
}

#[derive(Debug)]
pub struct DragController {
    radius: f32,
    snap_back: Duration,
    settle_delay: Duration,
    redraw: RedrawRequester,
    settle: TimerQueue<usize>,
    settle_handles: HashMap<usize, TimerHandle>,
}

impl DragController {
    pub fn new(redraw: RedrawRequester) -> Self {
        Self {
            radius: DRAG_RADIUS,
            snap_back: Duration::from_millis(SNAP_BACK_MS),
            settle_delay: Duration::from_millis(SETTLE_REDRAW_MS),
            redraw,
            settle: TimerQueue::new(),
            settle_handles: HashMap::new(),
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_timing(mut self, snap_back: Duration, settle_delay: Duration) -> Self {
        self.snap_back = snap_back;
        self.settle_delay = settle_delay;
        self
    }

    fn cancel_settle(&mut self, index: usize) {
        if let Some(handle) = self.settle_handles.remove(&index) {
            self.settle.cancel(handle);
        }
    }

    pub fn start(&mut self, item: &mut CardItem, renderer: &mut dyn Renderer) {
        let was_snapping = item.drag.phase == DragPhase::SnappingBack;
        if !item.drag.begin() {
            log::trace!("Drag: item {} already dragging", item.index);
            return;
        }
        if was_snapping {
            // Grabbed mid-animation: stop the animation at the logical offset.
            self.cancel_settle(item.index);
            renderer.apply_offset(item.index, item.drag.offset);
        }
        renderer.set_will_change(item.index, true);
        log::debug!("Drag: item {} start", item.index);
    }

    /// Apply a pointer delta. Returns the clamped offset.
    pub fn drag_by(&mut self, item: &mut CardItem, delta: Vec2, renderer: &mut dyn Renderer) -> Option<Vec2> {
        let offset = item.drag.accumulate(delta, self.radius)?;
        renderer.apply_offset(item.index, offset);
        self.redraw.request_redraw();
        Some(offset)
    }

    pub fn end(&mut self, item: &mut CardItem, now: Instant, renderer: &mut dyn Renderer) {
        let Some(released) = item.drag.release() else {
            return;
        };

        self.cancel_settle(item.index);
        renderer.animate_offset(
            item.index,
            OffsetAnimation {
                from: released,
                to: Vec2::ZERO,
                duration: self.snap_back,
                easing: Easing::snap_back(),
            },
            true,
        );
        let handle = self.settle.schedule(now, self.settle_delay, item.index);
        self.settle_handles.insert(item.index, handle);

        log::debug!(
            "Drag: item {} released at ({:.1}, {:.1}), snapping back",
            item.index,
            released.x,
            released.y
        );
    }

    /// Fire due settle timers. Returns how many cards settled.
    pub fn tick(&mut self, now: Instant, items: &mut [CardItem], renderer: &mut dyn Renderer) -> usize {
        let mut settled = 0;
        for index in self.settle.drain_due(now) {
            self.settle_handles.remove(&index);
            if let Some(item) = items.get_mut(index) {
                if item.drag.settle() {
                    renderer.set_will_change(index, false);
                    settled += 1;
                }
            }
            self.redraw.request_redraw();
        }
        settled
    }

    /// Drop every pending settle timer.
    pub fn clear(&mut self) {
        self.settle.clear();
        self.settle_handles.clear();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.settle.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::renderer::{RecordingRenderer, RenderCall};
    use crate::core::scheduler::RedrawScheduler;
    use crate::entities::{RenderTree, Tag, TimelineSection};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn items() -> Vec<CardItem> {
        let mut tree = RenderTree::new();
        let root = tree.create_with_id(Tag::Div, "root");
        tree.render_section(root, &TimelineSection::credentials()).1
    }

    #[test]
    fn test_clamp_rescales_to_radius() {
        let v = clamp_offset(Vec2::new(300.0, 400.0), 120.0);
        assert!((v.length() - 120.0).abs() < 1e-4);
        let dir = v.normalize();
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_clamp_leaves_inner_offset() {
        let v = Vec2::new(30.0, -40.0);
        assert_eq!(clamp_offset(v, 120.0), v);
        assert_eq!(clamp_offset(Vec2::ZERO, 120.0), Vec2::ZERO);
    }

    #[test]
    fn test_state_machine_cycle() {
        let mut s = DragState::default();
        assert_eq!(s.accumulate(Vec2::X, 120.0), None);
        assert!(s.begin());
        assert!(!s.begin());
        assert_eq!(s.accumulate(Vec2::new(10.0, 0.0), 120.0), Some(Vec2::new(10.0, 0.0)));
        assert_eq!(s.release(), Some(Vec2::new(10.0, 0.0)));
        assert_eq!(s.offset, Vec2::ZERO);
        assert_eq!(s.phase, DragPhase::SnappingBack);
        assert!(s.settle());
        assert_eq!(s.phase, DragPhase::Idle);
        assert!(!s.settle());
    }

    #[test]
    fn test_drag_accumulates_and_requests_redraw() {
        let scheduler = RedrawScheduler::new();
        let mut c = DragController::new(scheduler.requester());
        let mut r = RecordingRenderer::new();
        let mut items = items();

        c.start(&mut items[0], &mut r);
        for _ in 0..5 {
            c.drag_by(&mut items[0], Vec2::new(60.0, 80.0), &mut r);
        }
        // |(300, 400)| = 500 -> 120
        assert!((items[0].drag.offset.length() - 120.0).abs() < 1e-3);
        assert_eq!(r.offset(0), items[0].drag.offset);
        assert_eq!(scheduler.requests(), 5);
    }

    #[test]
    fn test_release_resets_logical_offset_and_settles() {
        let t0 = Instant::now();
        let scheduler = RedrawScheduler::new();
        let mut c = DragController::new(scheduler.requester());
        let mut r = RecordingRenderer::new();
        let mut items = items();

        c.start(&mut items[1], &mut r);
        c.drag_by(&mut items[1], Vec2::new(50.0, 0.0), &mut r);
        scheduler.run_frame(|| ());
        c.end(&mut items[1], t0, &mut r);

        assert_eq!(items[1].drag.offset, Vec2::ZERO);
        assert_eq!(items[1].drag.phase, DragPhase::SnappingBack);
        let anim = r.calls().iter().find_map(|call| match call {
            RenderCall::AnimateOffset(1, a, cancel) => Some((*a, *cancel)),
            _ => None,
        });
        let (anim, cancel) = anim.unwrap();
        assert!(cancel);
        assert_eq!(anim.from, Vec2::new(50.0, 0.0));
        assert_eq!(anim.to, Vec2::ZERO);
        assert_eq!(anim.duration, ms(SNAP_BACK_MS));

        assert_eq!(c.tick(t0 + ms(919), &mut items, &mut r), 0);
        assert!(!scheduler.is_pending());
        assert_eq!(c.tick(t0 + ms(920), &mut items, &mut r), 1);
        assert_eq!(items[1].drag.phase, DragPhase::Idle);
        assert!(scheduler.is_pending());

        let hints: Vec<RenderCall> = r
            .calls()
            .iter()
            .filter(|call| matches!(call, RenderCall::WillChange(..)))
            .cloned()
            .collect();
        assert_eq!(
            hints,
            [RenderCall::WillChange(1, true), RenderCall::WillChange(1, false)]
        );
    }

    #[test]
    fn test_second_release_replaces_pending_settle() {
        let t0 = Instant::now();
        let scheduler = RedrawScheduler::new();
        let mut c = DragController::new(scheduler.requester());
        let mut r = RecordingRenderer::new();
        let mut items = items();

        c.start(&mut items[0], &mut r);
        c.end(&mut items[0], t0, &mut r);
        // grabbed again mid snap-back
        r.clear_log();
        c.start(&mut items[0], &mut r);
        assert_eq!(items[0].drag.phase, DragPhase::Dragging);
        // the running animation is stopped at the logical offset
        assert_eq!(
            r.calls(),
            [
                RenderCall::ApplyOffset(0, Vec2::ZERO),
                RenderCall::WillChange(0, true),
            ]
        );
        c.drag_by(&mut items[0], Vec2::new(0.0, 20.0), &mut r);
        c.end(&mut items[0], t0 + ms(500), &mut r);

        // first settle timer was cancelled
        assert_eq!(c.tick(t0 + ms(920), &mut items, &mut r), 0);
        assert_eq!(items[0].drag.phase, DragPhase::SnappingBack);
        assert_eq!(c.tick(t0 + ms(1420), &mut items, &mut r), 1);
        assert_eq!(
            r.count(|call| matches!(call, RenderCall::AnimateOffset(0, _, true))),
            1
        );
    }

    #[test]
    fn test_independent_items() {
        let scheduler = RedrawScheduler::new();
        let mut c = DragController::new(scheduler.requester());
        let mut r = RecordingRenderer::new();
        let mut items = items();

        c.start(&mut items[0], &mut r);
        c.start(&mut items[3], &mut r);
        c.drag_by(&mut items[0], Vec2::new(10.0, 0.0), &mut r);
        c.drag_by(&mut items[3], Vec2::new(0.0, -30.0), &mut r);
        c.end(&mut items[0], Instant::now(), &mut r);

        assert_eq!(items[0].drag.phase, DragPhase::SnappingBack);
        assert_eq!(items[3].drag.phase, DragPhase::Dragging);
        assert_eq!(items[3].drag.offset, Vec2::new(0.0, -30.0));
    }

    #[test]
    fn test_move_without_start_ignored() {
        let scheduler = RedrawScheduler::new();
        let mut c = DragController::new(scheduler.requester());
        let mut r = RecordingRenderer::new();
        let mut items = items();

        assert_eq!(c.drag_by(&mut items[0], Vec2::X, &mut r), None);
        c.end(&mut items[0], Instant::now(), &mut r);
        assert!(r.calls().is_empty());
        assert_eq!(scheduler.requests(), 0);
    }
}

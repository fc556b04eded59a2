//! Renderer capability: everything the timeline asks of a display surface.
//!
//! The geometry engine and the state machines only talk to this trait, so
//! they run headless in tests (see [`RecordingRenderer`]) and against a real
//! surface in the egui host. Item arguments are display indices.

use std::collections::BTreeMap;
use std::time::Duration;

use glam::Vec2;

use super::easing::Easing;
use super::geometry::{ConnectorPath, ConnectorStyle};
use super::particles::{BurstId, Particle};
use crate::entities::ElementId;

/// Animated translation of a card's content element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetAnimation {
    pub from: Vec2,
    pub to: Vec2,
    pub duration: Duration,
    pub easing: Easing,
}

impl OffsetAnimation {
    /// Offset at `elapsed` into the animation.
    pub fn offset_at(&self, elapsed: Duration) -> Vec2 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from.lerp(self.to, self.easing.apply(t))
    }
}

pub trait Renderer {
    /// Remove every connector from the shared surface.
    fn clear_paths(&mut self);

    /// Draw the connector for `item`.
    fn set_path(&mut self, item: usize, path: &ConnectorPath, style: &ConnectorStyle);

    /// Translate the content element of `item`; replaces any running offset animation.
    fn apply_offset(&mut self, item: usize, offset: Vec2);

    /// Hint that the content element is about to be transformed continuously.
    fn set_will_change(&mut self, item: usize, active: bool);

    /// Animate the content element; with `cancel_previous` any in-flight
    /// animation on the same item is dropped first.
    fn animate_offset(&mut self, item: usize, animation: OffsetAnimation, cancel_previous: bool);

    /// Apply the persistent "revealed" emphasis.
    fn mark_revealed(&mut self, item: usize);

    /// Create an empty particle container anchored at `anchor`.
    fn begin_burst(&mut self, burst: BurstId, anchor: ElementId);

    /// Add one animated particle to `burst`.
    fn spawn_particle(&mut self, burst: BurstId, particle: &Particle);

    /// Remove a particle container and everything in it.
    fn remove_burst(&mut self, burst: BurstId);
}

/// One recorded renderer call.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCall {
    ClearPaths,
    SetPath(usize, ConnectorPath),
    ApplyOffset(usize, Vec2),
    WillChange(usize, bool),
    AnimateOffset(usize, OffsetAnimation, bool),
    MarkRevealed(usize),
    BeginBurst(BurstId, ElementId),
    SpawnParticle(BurstId),
    RemoveBurst(BurstId),
}

/// Headless renderer that keeps the surface state and a call log.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    paths: Vec<(usize, ConnectorPath)>,
    offsets: BTreeMap<usize, Vec2>,
    bursts: BTreeMap<BurstId, (ElementId, Vec<Particle>)>,
    calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connectors currently on the surface.
    pub fn paths(&self) -> &[(usize, ConnectorPath)] {
        &self.paths
    }

    /// Last applied offset (animation targets count as applied).
    pub fn offset(&self, item: usize) -> Vec2 {
        self.offsets.get(&item).copied().unwrap_or(Vec2::ZERO)
    }

    pub fn live_bursts(&self) -> usize {
        self.bursts.len()
    }

    pub fn burst_particles(&self, burst: BurstId) -> Option<&[Particle]> {
        self.bursts.get(&burst).map(|(_, p)| p.as_slice())
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    pub fn count(&self, pred: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear_log(&mut self) {
        self.calls.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn clear_paths(&mut self) {
        self.paths.clear();
        self.calls.push(RenderCall::ClearPaths);
    }

    fn set_path(&mut self, item: usize, path: &ConnectorPath, _style: &ConnectorStyle) {
        self.paths.push((item, *path));
        self.calls.push(RenderCall::SetPath(item, *path));
    }

    fn apply_offset(&mut self, item: usize, offset: Vec2) {
        self.offsets.insert(item, offset);
        self.calls.push(RenderCall::ApplyOffset(item, offset));
    }

    fn set_will_change(&mut self, item: usize, active: bool) {
        self.calls.push(RenderCall::WillChange(item, active));
    }

    fn animate_offset(&mut self, item: usize, animation: OffsetAnimation, cancel_previous: bool) {
        self.offsets.insert(item, animation.to);
        self.calls
            .push(RenderCall::AnimateOffset(item, animation, cancel_previous));
    }

    fn mark_revealed(&mut self, item: usize) {
        self.calls.push(RenderCall::MarkRevealed(item));
    }

    fn begin_burst(&mut self, burst: BurstId, anchor: ElementId) {
        self.bursts.insert(burst, (anchor, Vec::new()));
        self.calls.push(RenderCall::BeginBurst(burst, anchor));
    }

    fn spawn_particle(&mut self, burst: BurstId, particle: &Particle) {
        if let Some((_, particles)) = self.bursts.get_mut(&burst) {
            particles.push(*particle);
        }
        self.calls.push(RenderCall::SpawnParticle(burst));
    }

    fn remove_burst(&mut self, burst: BurstId) {
        self.bursts.remove(&burst);
        self.calls.push(RenderCall::RemoveBurst(burst));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_animation_endpoints() {
        let anim = OffsetAnimation {
            from: Vec2::new(80.0, -40.0),
            to: Vec2::ZERO,
            duration: Duration::from_millis(900),
            easing: Easing::snap_back(),
        };
        assert_eq!(anim.offset_at(Duration::ZERO), Vec2::new(80.0, -40.0));
        assert_eq!(anim.offset_at(Duration::from_millis(900)), Vec2::ZERO);
        assert_eq!(anim.offset_at(Duration::from_secs(5)), Vec2::ZERO);
    }

    #[test]
    fn test_recording_clear_then_set() {
        let mut r = RecordingRenderer::new();
        let path = ConnectorPath {
            start: Vec2::ZERO,
            end: Vec2::ONE,
            control_points: [Vec2::ZERO, Vec2::ONE],
        };
        r.set_path(0, &path, &ConnectorStyle::default());
        r.clear_paths();
        r.set_path(1, &path, &ConnectorStyle::default());
        assert_eq!(r.paths().len(), 1);
        assert_eq!(r.paths()[0].0, 1);
        assert_eq!(r.count(|c| matches!(c, RenderCall::ClearPaths)), 1);
    }
}

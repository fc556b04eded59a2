//! egui implementation of the engine's `Renderer`.
//!
//! Renderer calls only record state: the connector list, per-card offsets
//! and running offset animations, reveal times and live sparkle bursts.
//! The UI pass then paints from that state every frame, evaluating
//! animations against the frame time set by `set_now`.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, Painter, Pos2, Stroke};
use eframe::egui::epaint::CubicBezierShape;
use glam::Vec2;

use super::timeline_helpers::{LayoutSnapshot, fade, to_pos2};
use crate::core::geometry::{ConnectorPath, ConnectorStyle};
use crate::core::particles::{BurstId, Particle};
use crate::core::renderer::{OffsetAnimation, Renderer};
use crate::entities::ElementId;

const SPARK_COLOR: Color32 = Color32::from_rgb(152, 232, 205);

#[derive(Debug, Default)]
struct OffsetTrack {
    offset: Vec2,
    animation: Option<(OffsetAnimation, Instant)>,
}

#[derive(Debug)]
struct LiveBurst {
    anchor: ElementId,
    started: Instant,
    particles: Vec<Particle>,
}

#[derive(Debug)]
pub struct EguiRenderer {
    now: Instant,
    paths: Vec<(usize, ConnectorPath)>,
    style: ConnectorStyle,
    offsets: HashMap<usize, OffsetTrack>,
    will_change: HashSet<usize>,
    revealed: HashMap<usize, Instant>,
    bursts: HashMap<BurstId, LiveBurst>,
}

impl Default for EguiRenderer {
    fn default() -> Self {
        Self {
            now: Instant::now(),
            paths: Vec::new(),
            style: ConnectorStyle::default(),
            offsets: HashMap::new(),
            will_change: HashSet::new(),
            revealed: HashMap::new(),
            bursts: HashMap::new(),
        }
    }
}

impl EguiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame time used to evaluate animations.
    pub fn set_now(&mut self, now: Instant) {
        self.now = now;
        for track in self.offsets.values_mut() {
            if let Some((anim, started)) = track.animation {
                if now.saturating_duration_since(started) >= anim.duration {
                    track.offset = anim.to;
                    track.animation = None;
                }
            }
        }
    }

    /// Current visual offset of a card, animation included.
    pub fn visual_offset(&self, item: usize) -> Vec2 {
        let Some(track) = self.offsets.get(&item) else {
            return Vec2::ZERO;
        };
        match track.animation {
            Some((anim, started)) => anim.offset_at(self.now.saturating_duration_since(started)),
            None => track.offset,
        }
    }

    /// True while any card offset animation or sparkle is in flight.
    pub fn is_animating(&self) -> bool {
        !self.bursts.is_empty() || self.offsets.values().any(|t| t.animation.is_some())
    }

    pub fn is_lifted(&self, item: usize) -> bool {
        self.will_change.contains(&item)
    }

    /// Revealed-emphasis progress in [0, 1]; 0 while hidden.
    pub fn reveal_progress(&self, item: usize, fade: Duration) -> f32 {
        let Some(at) = self.revealed.get(&item) else {
            return 0.0;
        };
        if fade.is_zero() {
            return 1.0;
        }
        (self.now.saturating_duration_since(*at).as_secs_f32() / fade.as_secs_f32()).min(1.0)
    }

    pub(super) fn paint_connectors(&self, painter: &Painter, origin: Pos2) {
        let [r, g, b, a] = self.style.color;
        let stroke = Stroke::new(self.style.width, Color32::from_rgba_unmultiplied(r, g, b, a));
        let offset = origin.to_vec2();
        for (_, path) in &self.paths {
            let points = path.points().map(|p| to_pos2(p) + offset);
            painter.add(CubicBezierShape::from_points_stroke(
                points,
                false,
                Color32::TRANSPARENT,
                stroke,
            ));
        }
    }

    pub(super) fn paint_bursts(&self, painter: &Painter, layout: &LayoutSnapshot, spark_size: f32) {
        for burst in self.bursts.values() {
            let Some(center) = layout.center(burst.anchor) else {
                continue;
            };
            let elapsed = self.now.saturating_duration_since(burst.started);
            for particle in &burst.particles {
                let (translate, scale, opacity) = particle.state_at(elapsed);
                if opacity <= 0.0 {
                    continue;
                }
                painter.circle_filled(
                    center + egui::vec2(translate.x, translate.y),
                    spark_size * 0.5 * scale,
                    fade(SPARK_COLOR, opacity),
                );
            }
        }
    }
}

impl Renderer for EguiRenderer {
    fn clear_paths(&mut self) {
        self.paths.clear();
    }

    fn set_path(&mut self, item: usize, path: &ConnectorPath, style: &ConnectorStyle) {
        self.style = *style;
        self.paths.push((item, *path));
    }

    fn apply_offset(&mut self, item: usize, offset: Vec2) {
        let track = self.offsets.entry(item).or_default();
        track.offset = offset;
        track.animation = None;
    }

    fn set_will_change(&mut self, item: usize, active: bool) {
        if active {
            self.will_change.insert(item);
        } else {
            self.will_change.remove(&item);
        }
    }

    fn animate_offset(&mut self, item: usize, animation: OffsetAnimation, cancel_previous: bool) {
        let now = self.now;
        let track = self.offsets.entry(item).or_default();
        if !cancel_previous && track.animation.is_some() {
            return;
        }
        track.animation = Some((animation, now));
        track.offset = animation.to;
    }

    fn mark_revealed(&mut self, item: usize) {
        self.revealed.entry(item).or_insert(self.now);
    }

    fn begin_burst(&mut self, burst: BurstId, anchor: ElementId) {
        self.bursts.insert(
            burst,
            LiveBurst {
                anchor,
                started: self.now,
                particles: Vec::new(),
            },
        );
    }

    fn spawn_particle(&mut self, burst: BurstId, particle: &Particle) {
        if let Some(live) = self.bursts.get_mut(&burst) {
            live.particles.push(*particle);
        }
    }

    fn remove_burst(&mut self, burst: BurstId) {
        self.bursts.remove(&burst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::easing::Easing;

    #[test]
    fn test_snap_back_animation_replaces_offset() {
        let t0 = Instant::now();
        let mut r = EguiRenderer::new();
        r.set_now(t0);
        r.apply_offset(0, Vec2::new(100.0, 0.0));
        assert_eq!(r.visual_offset(0), Vec2::new(100.0, 0.0));

        r.animate_offset(
            0,
            OffsetAnimation {
                from: Vec2::new(100.0, 0.0),
                to: Vec2::ZERO,
                duration: Duration::from_millis(900),
                easing: Easing::snap_back(),
            },
            true,
        );
        assert!(r.is_animating());
        assert_eq!(r.visual_offset(0), Vec2::new(100.0, 0.0));

        r.set_now(t0 + Duration::from_millis(900));
        assert_eq!(r.visual_offset(0), Vec2::ZERO);
        assert!(!r.is_animating());
    }

    #[test]
    fn test_apply_offset_cancels_animation() {
        let t0 = Instant::now();
        let mut r = EguiRenderer::new();
        r.set_now(t0);
        r.animate_offset(
            1,
            OffsetAnimation {
                from: Vec2::new(0.0, 50.0),
                to: Vec2::ZERO,
                duration: Duration::from_millis(900),
                easing: Easing::Linear,
            },
            true,
        );
        r.apply_offset(1, Vec2::new(5.0, 5.0));
        r.set_now(t0 + Duration::from_millis(300));
        assert_eq!(r.visual_offset(1), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_reveal_progress() {
        let t0 = Instant::now();
        let mut r = EguiRenderer::new();
        r.set_now(t0);
        let fade = Duration::from_millis(400);
        assert_eq!(r.reveal_progress(0, fade), 0.0);
        r.mark_revealed(0);
        r.set_now(t0 + Duration::from_millis(200));
        assert!((r.reveal_progress(0, fade) - 0.5).abs() < 1e-3);
        r.set_now(t0 + Duration::from_secs(3));
        assert_eq!(r.reveal_progress(0, fade), 1.0);
    }
}

//! Sparkle bursts: short-lived radial particles anchored to a marker.
//!
//! One burst is `count` particles leaving the anchor center along evenly
//! spaced angles. Each particle gets its own radius, positional jitter and
//! duration, fades 1 -> 0 and scales 0.2 -> 0.8. The burst container is
//! removed after a fixed cleanup delay whether or not the particle
//! animations have finished.

use std::time::{Duration, Instant};

use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

use super::easing::Easing;
use super::renderer::Renderer;
use super::timers::TimerQueue;
use crate::entities::ElementId;

pub const PARTICLE_COUNT: usize = 8;
pub const CLEANUP_DELAY_MS: u64 = 1200;

const BASE_RADIUS: f32 = 18.0;
const RADIUS_JITTER: f32 = 8.0;
const POSITION_JITTER: f32 = 3.0;
const MIN_DURATION_MS: f32 = 700.0;
const DURATION_SPREAD_MS: f32 = 300.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BurstId(pub u64);

/// One animated particle. `target` is relative to the anchor center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub angle: f32,
    pub target: Vec2,
    pub duration: Duration,
    pub scale: (f32, f32),
    pub opacity: (f32, f32),
    pub easing: Easing,
}

impl Particle {
    /// Translation, scale and opacity at `elapsed`.
    pub fn state_at(&self, elapsed: Duration) -> (Vec2, f32, f32) {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        let e = self.easing.apply(t);
        let scale = self.scale.0 + (self.scale.1 - self.scale.0) * e;
        let opacity = self.opacity.0 + (self.opacity.1 - self.opacity.0) * e;
        (self.target * e, scale, opacity)
    }
}

pub struct ParticleEmitter {
    count: usize,
    cleanup_delay: Duration,
    reduced_motion: bool,
    rng: StdRng,
    next_id: u64,
    cleanup: TimerQueue<BurstId>,
}

impl std::fmt::Debug for ParticleEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleEmitter")
            .field("count", &self.count)
            .field("reduced_motion", &self.reduced_motion)
            .field("live", &self.cleanup.len())
            .finish()
    }
}

impl ParticleEmitter {
    pub fn with_rng(reduced_motion: bool, rng: StdRng) -> Self {
        Self {
            count: PARTICLE_COUNT,
            cleanup_delay: Duration::from_millis(CLEANUP_DELAY_MS),
            reduced_motion,
            rng,
            next_id: 0,
            cleanup: TimerQueue::new(),
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_cleanup_delay(mut self, delay: Duration) -> Self {
        self.cleanup_delay = delay;
        self
    }

    /// Generate the particles of one burst without rendering them.
    pub fn generate(&mut self) -> Vec<Particle> {
        let count = self.count.max(1);
        (0..self.count)
            .map(|i| {
                let angle = std::f32::consts::TAU * (i as f32 / count as f32);
                let radius = BASE_RADIUS + self.rng.gen_range(0.0..RADIUS_JITTER);
                let jitter = Vec2::new(
                    self.rng.gen_range(-POSITION_JITTER..POSITION_JITTER),
                    self.rng.gen_range(-POSITION_JITTER..POSITION_JITTER),
                );
                let duration_ms = MIN_DURATION_MS + self.rng.gen_range(0.0..DURATION_SPREAD_MS);
                Particle {
                    angle,
                    target: Vec2::from_angle(angle) * radius + jitter,
                    duration: Duration::from_micros((duration_ms * 1000.0) as u64),
                    scale: (0.2, 0.8),
                    opacity: (1.0, 0.0),
                    easing: Easing::sparkle(),
                }
            })
            .collect()
    }

    /// Spawn a burst at `anchor` and schedule its removal.
    ///
    /// Returns `None` under reduced motion.
    pub fn emit(&mut self, anchor: ElementId, now: Instant, renderer: &mut dyn Renderer) -> Option<BurstId> {
        if self.reduced_motion {
            log::trace!("ParticleEmitter: reduced motion, skipping burst at {:?}", anchor);
            return None;
        }

        let id = BurstId(self.next_id);
        self.next_id += 1;

        renderer.begin_burst(id, anchor);
        for particle in self.generate() {
            renderer.spawn_particle(id, &particle);
        }
        self.cleanup.schedule(now, self.cleanup_delay, id);
        log::trace!("ParticleEmitter: burst {:?} at {:?}", id, anchor);
        Some(id)
    }

    /// Remove bursts whose cleanup delay has elapsed. Returns how many.
    pub fn tick(&mut self, now: Instant, renderer: &mut dyn Renderer) -> usize {
        let due = self.cleanup.drain_due(now);
        for id in &due {
            renderer.remove_burst(*id);
        }
        due.len()
    }

    /// Remove every live burst immediately.
    pub fn clear(&mut self, renderer: &mut dyn Renderer) {
        for id in self.cleanup.drain_all() {
            renderer.remove_burst(id);
        }
    }

    pub fn live_bursts(&self) -> usize {
        self.cleanup.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.cleanup.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use crate::core::renderer::{RecordingRenderer, RenderCall};

    fn emitter(reduced: bool) -> ParticleEmitter {
        ParticleEmitter::with_rng(reduced, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_generate_eight_evenly_spaced() {
        let mut e = emitter(false);
        let particles = e.generate();
        assert_eq!(particles.len(), 8);
        for (i, p) in particles.iter().enumerate() {
            let expected = std::f32::consts::TAU * i as f32 / 8.0;
            assert!((p.angle - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_generate_jitter_bounds() {
        let mut e = emitter(false);
        for _ in 0..50 {
            for p in e.generate() {
                let base = Vec2::from_angle(p.angle);
                // radius in [18, 26) plus at most 3 units of jitter per axis
                let along = p.target.dot(base);
                assert!(along > BASE_RADIUS - 2.0 * POSITION_JITTER);
                assert!(along < BASE_RADIUS + RADIUS_JITTER + 2.0 * POSITION_JITTER);
                assert!((700..1000).contains(&p.duration.as_millis()));
                assert_eq!(p.scale, (0.2, 0.8));
                assert_eq!(p.opacity, (1.0, 0.0));
            }
        }
    }

    #[test]
    fn test_particle_state_endpoints() {
        let mut e = emitter(false);
        let p = e.generate()[0];
        let (pos, scale, opacity) = p.state_at(Duration::ZERO);
        assert_eq!(pos, Vec2::ZERO);
        assert!((scale - 0.2).abs() < 1e-6);
        assert!((opacity - 1.0).abs() < 1e-6);
        let (pos, scale, opacity) = p.state_at(Duration::from_secs(2));
        assert!((pos - p.target).length() < 1e-4);
        assert!((scale - 0.8).abs() < 1e-6);
        assert!(opacity.abs() < 1e-6);
    }

    #[test]
    fn test_emit_and_cleanup() {
        let t0 = Instant::now();
        let mut e = emitter(false);
        let mut r = RecordingRenderer::new();
        let id = e.emit(ElementId(3), t0, &mut r).unwrap();

        assert_eq!(r.live_bursts(), 1);
        assert_eq!(r.burst_particles(id).unwrap().len(), 8);
        assert_eq!(e.tick(t0 + Duration::from_millis(1199), &mut r), 0);
        assert_eq!(e.tick(t0 + Duration::from_millis(1200), &mut r), 1);
        assert_eq!(r.live_bursts(), 0);
        assert_eq!(e.live_bursts(), 0);
    }

    #[test]
    fn test_reduced_motion_skips() {
        let mut e = emitter(true);
        let mut r = RecordingRenderer::new();
        assert!(e.emit(ElementId(1), Instant::now(), &mut r).is_none());
        assert!(r.calls().is_empty());
    }

    #[test]
    fn test_clear_removes_live_bursts() {
        let t0 = Instant::now();
        let mut e = emitter(false);
        let mut r = RecordingRenderer::new();
        e.emit(ElementId(1), t0, &mut r);
        e.emit(ElementId(2), t0, &mut r);
        e.clear(&mut r);
        assert_eq!(r.live_bursts(), 0);
        assert_eq!(r.count(|c| matches!(c, RenderCall::RemoveBurst(_))), 2);
    }
}

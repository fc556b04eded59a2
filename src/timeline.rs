//! Timeline runtime: mounts a section and wires every component together.
//!
//! Data flow:
//! ```text
//! section ─render─> RenderTree + CardItems
//! scroll / drag-move / reveal / settle ──request──┐
//! resize ──debounce 120ms──request────────────────┤
//!                                                 v
//!                           RedrawScheduler (one pass per frame)
//!                                                 v
//!                     GeometryEngine ──clear + set_path──> Renderer
//! ```
//!
//! The host owns the event loop. It forwards events to the `on_*` methods,
//! calls [`Timeline::tick`] with the current time so timers can fire, and
//! calls [`Timeline::on_frame`] from its frame callback with live layout.

use std::time::{Duration, Instant};

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::TimelineConfig;
use crate::core::debounce::Debouncer;
use crate::core::drag::DragController;
use crate::core::geometry::{GeometryEngine, LayoutSource};
use crate::core::particles::ParticleEmitter;
use crate::core::renderer::Renderer;
use crate::core::reveal::{RevealController, RevealOutcome};
use crate::core::scheduler::{RedrawRequester, RedrawScheduler};
use crate::entities::{CardItem, RenderTree, TimelineSection, TimelineSkeleton};

#[derive(Debug)]
pub struct Timeline {
    config: TimelineConfig,
    skeleton: TimelineSkeleton,
    items: Vec<CardItem>,
    scheduler: RedrawScheduler,
    resize: Debouncer,
    geometry: GeometryEngine,
    reveal: RevealController,
    drag: DragController,
    particles: ParticleEmitter,
}

impl Timeline {
    /// Render `section` into the element whose id is `config.mount_id`.
    ///
    /// Returns `None`, doing nothing, when the mount point is absent.
    pub fn mount(tree: &mut RenderTree, section: &TimelineSection, config: TimelineConfig) -> Option<Self> {
        Self::mount_with_rng(tree, section, config, StdRng::from_entropy())
    }

    /// [`Timeline::mount`] with an explicit sparkle RNG.
    pub fn mount_with_rng(
        tree: &mut RenderTree,
        section: &TimelineSection,
        config: TimelineConfig,
        rng: StdRng,
    ) -> Option<Self> {
        let Some(container) = tree.element_by_id(&config.mount_id) else {
            log::debug!("Mount point '{}' not found, timeline not mounted", config.mount_id);
            return None;
        };

        let (skeleton, items) = tree.render_section(container, section);

        let scheduler = RedrawScheduler::new();
        let reveal = RevealController::new(config.reveal_threshold, config.reduced_motion, scheduler.requester());
        let drag = DragController::new(scheduler.requester())
            .with_radius(config.drag_radius)
            .with_timing(
                Duration::from_millis(config.snap_back_ms),
                Duration::from_millis(config.settle_redraw_ms),
            );
        let particles = ParticleEmitter::with_rng(config.reduced_motion, rng)
            .with_count(config.particle_count)
            .with_cleanup_delay(Duration::from_millis(config.particle_cleanup_ms));

        let timeline = Self {
            resize: Debouncer::new(config.resize_debounce_ms),
            geometry: GeometryEngine::new(config.control_factor),
            skeleton,
            items,
            scheduler,
            reveal,
            drag,
            particles,
            config,
        };

        log::info!(
            "Mounted timeline '{}' ({} cards, reduced motion: {})",
            section.title,
            timeline.items.len(),
            timeline.config.reduced_motion
        );

        // initial draw
        timeline.scheduler.request_redraw();
        Some(timeline)
    }

    /// Tear down: drop pending timers and sparkles, clear the surface and
    /// the container.
    pub fn unmount(mut self, tree: &mut RenderTree, renderer: &mut dyn Renderer) {
        self.resize.cancel();
        self.drag.clear();
        self.particles.clear(renderer);
        renderer.clear_paths();
        tree.clear_children(self.skeleton.container);
        log::debug!("Unmounted timeline from {:?}", self.skeleton.container);
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn skeleton(&self) -> &TimelineSkeleton {
        &self.skeleton
    }

    pub fn items(&self) -> &[CardItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&CardItem> {
        self.items.get(index)
    }

    /// Handle for external trigger sources.
    pub fn requester(&self) -> RedrawRequester {
        self.scheduler.requester()
    }

    pub fn request_redraw(&self) {
        self.scheduler.request_redraw();
    }

    pub fn on_scroll(&self) {
        self.scheduler.request_redraw();
    }

    pub fn on_resize(&mut self, now: Instant) {
        self.resize.schedule(now);
    }

    pub fn on_drag_start(&mut self, index: usize, renderer: &mut dyn Renderer) {
        if let Some(item) = self.items.get_mut(index) {
            self.drag.start(item, renderer);
        }
    }

    pub fn on_drag_move(&mut self, index: usize, delta: Vec2, renderer: &mut dyn Renderer) -> Option<Vec2> {
        let item = self.items.get_mut(index)?;
        self.drag.drag_by(item, delta, renderer)
    }

    pub fn on_drag_end(&mut self, index: usize, now: Instant, renderer: &mut dyn Renderer) {
        if let Some(item) = self.items.get_mut(index) {
            self.drag.end(item, now, renderer);
        }
    }

    /// Report the visible fraction of item `index`.
    pub fn on_visibility(
        &mut self,
        index: usize,
        ratio: f32,
        now: Instant,
        tree: &mut RenderTree,
        renderer: &mut dyn Renderer,
    ) -> RevealOutcome {
        let Some(item) = self.items.get_mut(index) else {
            return RevealOutcome::Unchanged;
        };
        self.reveal
            .observe(item, ratio, now, tree, &mut self.particles, renderer)
    }

    /// Fire due timers: resize debounce, snap-back settle, sparkle cleanup.
    pub fn tick(&mut self, now: Instant, renderer: &mut dyn Renderer) {
        if self.resize.tick(now) {
            self.scheduler.request_redraw();
        }
        self.drag.tick(now, &mut self.items, renderer);
        self.particles.tick(now, renderer);
    }

    /// True while a redraw is waiting for the next frame.
    pub fn wants_frame(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Earliest pending timer deadline, for hosts that sleep between frames.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.resize.deadline(),
            self.drag.next_deadline(),
            self.particles.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Frame callback: run at most one geometry pass if a redraw is pending.
    ///
    /// Returns the number of connectors drawn, or `None` if no pass ran.
    pub fn on_frame(&mut self, layout: &dyn LayoutSource, renderer: &mut dyn Renderer) -> Option<usize> {
        let geometry = &mut self.geometry;
        let items = &self.items;
        let container = self.skeleton.container;
        self.scheduler
            .run_frame(|| geometry.pass(layout, container, items, renderer))
    }

    pub fn geometry_passes(&self) -> u64 {
        self.geometry.passes()
    }

    pub fn live_bursts(&self) -> usize {
        self.particles.live_bursts()
    }
}

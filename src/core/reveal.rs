//! Reveal controller - one-way Hidden -> Revealed transition per card.
//!
//! The host reports each card's visible fraction (an intersection
//! observer, or [`intersection_ratio`] against the viewport). The first
//! report at or above the threshold reveals the card: the persistent
//! emphasis is applied, a sparkle burst is emitted on the marker and a
//! redraw is requested. Later reports, including leave/re-enter cycles,
//! change nothing.

use std::time::Instant;

use super::geometry::Rect;
use super::particles::ParticleEmitter;
use super::renderer::Renderer;
use super::scheduler::RedrawRequester;
use crate::entities::{CardItem, RenderTree};

/// Minimum visible fraction that reveals a card.
pub const REVEAL_THRESHOLD: f32 = 0.12;

/// Class added to a revealed list item.
pub const REVEALED_CLASS: &str = "in-view";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealState {
    #[default]
    Hidden,
    Revealed,
}

impl RevealState {
    pub fn is_revealed(&self) -> bool {
        matches!(self, RevealState::Revealed)
    }
}

/// What a visibility report did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Below threshold, or already revealed
    Unchanged,
    /// First reveal; `sparkled` is false under reduced motion
    Revealed { sparkled: bool },
}

/// Visible fraction of `element` inside `viewport`, in [0, 1].
///
/// A zero-area element counts as fully visible when it lies inside the
/// viewport and invisible otherwise.
pub fn intersection_ratio(element: Rect, viewport: Rect) -> f32 {
    let Some(overlap) = element.intersect(&viewport) else {
        return 0.0;
    };
    let area = element.area();
    if area <= 0.0 {
        return 1.0;
    }
    (overlap.area() / area).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct RevealController {
    threshold: f32,
    reduced_motion: bool,
    redraw: RedrawRequester,
}

impl RevealController {
    pub fn new(threshold: f32, reduced_motion: bool, redraw: RedrawRequester) -> Self {
        Self {
            threshold,
            reduced_motion,
            redraw,
        }
    }

    /// Handle a visibility report for `item`.
    pub fn observe(
        &self,
        item: &mut CardItem,
        ratio: f32,
        now: Instant,
        tree: &mut RenderTree,
        emitter: &mut ParticleEmitter,
        renderer: &mut dyn Renderer,
    ) -> RevealOutcome {
        if item.reveal.is_revealed() || ratio <= 0.0 || ratio < self.threshold {
            return RevealOutcome::Unchanged;
        }

        item.reveal = RevealState::Revealed;
        tree.add_class(item.element, REVEALED_CLASS);
        renderer.mark_revealed(item.index);

        let sparkled = !self.reduced_motion && emitter.emit(item.marker, now, renderer).is_some();
        self.redraw.request_redraw();

        log::debug!(
            "Reveal: item {} revealed at {:.0}% (sparkle: {})",
            item.index,
            ratio * 100.0,
            sparkled
        );
        RevealOutcome::Revealed { sparkled }
    }
}

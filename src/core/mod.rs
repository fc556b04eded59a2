//! Core engine modules - geometry, scheduling, reveal, drag, particles
//!
//! These modules form the timeline engine, independent of UI. Everything
//! visual goes through the `Renderer` trait.

pub mod debounce;
pub mod drag;
pub mod easing;
pub mod geometry;
pub mod particles;
pub mod renderer;
pub mod reveal;
pub mod scheduler;
pub mod timers;

// Re-exports for convenience
pub use debounce::Debouncer;
pub use drag::{DragController, DragPhase, DragState, clamp_offset};
pub use easing::Easing;
pub use geometry::{ConnectorPath, ConnectorStyle, GeometryEngine, LayoutSource, Rect};
pub use particles::{BurstId, Particle, ParticleEmitter};
pub use renderer::{OffsetAnimation, RecordingRenderer, RenderCall, Renderer};
pub use reveal::{RevealController, RevealOutcome, RevealState, intersection_ratio};
pub use scheduler::{RedrawRequester, RedrawScheduler};
pub use timers::{TimerHandle, TimerQueue};

//! Credentials timeline - scroll-driven interactive timeline library
//!
//! Re-exports all modules for use by the host binary.

// Core engine (geometry, scheduler, reveal, drag, particles)
pub mod core;

// App modules
pub mod cli;
pub mod config;
pub mod entities;
pub mod paths;
pub mod timeline;
pub mod widgets;

// Re-export commonly used types from core
pub use core::geometry::{ConnectorPath, GeometryEngine, LayoutSource, Rect};
pub use core::renderer::{RecordingRenderer, Renderer};
pub use core::scheduler::{RedrawRequester, RedrawScheduler};

// Re-export entities
pub use config::TimelineConfig;
pub use entities::{Card, CardItem, ElementId, RenderTree, TimelineSection};
pub use timeline::Timeline;

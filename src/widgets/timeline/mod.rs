//! Timeline widget - egui host for the credentials timeline
//!
//! Cards alternate around a vertical rope with bezier connectors

mod timeline;
mod timeline_helpers;
mod timeline_renderer;
mod timeline_ui;

pub use timeline::ViewConfig;
pub use timeline_renderer::EguiRenderer;
pub use timeline_ui::TimelineView;

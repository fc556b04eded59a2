//! UI Widgets - egui hosts for the timeline engine

pub mod timeline;

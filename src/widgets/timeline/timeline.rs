//! Timeline widget - view configuration.
//! Layout constants for the egui host; the engine itself is configured by
//! `crate::config::TimelineConfig`.

/// Configuration for the timeline view
#[derive(Clone, Debug)]
pub struct ViewConfig {
    pub row_height: f32,
    pub top_padding: f32,
    /// Gap between the rope and a card's facing edge
    pub gutter: f32,
    pub card_min_width: f32,
    pub card_max_width: f32,
    pub card_padding: f32,
    pub marker_radius: f32,
    pub spark_size: f32, // particle diameter at scale 1.0
    /// Fade-in of the revealed emphasis
    pub reveal_fade_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            row_height: 170.0,
            top_padding: 40.0,
            gutter: 56.0,
            card_min_width: 180.0,
            card_max_width: 420.0,
            card_padding: 12.0,
            marker_radius: 7.0,
            spark_size: 10.0,
            reveal_fade_ms: 450,
        }
    }
}

impl ViewConfig {
    pub fn content_height(&self, rows: usize) -> f32 {
        self.top_padding * 2.0 + self.row_height * rows as f32
    }
}

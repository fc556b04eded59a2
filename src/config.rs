//! Timeline configuration.
//!
//! Read once at startup and handed to the components that need it; the
//! reduced-motion preference in particular is passed explicitly to the
//! reveal controller and particle emitter instead of living in a global.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::debounce::RESIZE_DEBOUNCE_MS;
use crate::core::drag::{DRAG_RADIUS, SETTLE_REDRAW_MS, SNAP_BACK_MS};
use crate::core::geometry::CONTROL_FACTOR;
use crate::core::particles::{CLEANUP_DELAY_MS, PARTICLE_COUNT};
use crate::core::reveal::REVEAL_THRESHOLD;

/// Default id of the host mount point.
pub const MOUNT_ID: &str = "credentials-root";

/// Settings file name inside the config directory.
pub const CONFIG_FILE: &str = "credentials-timeline.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub mount_id: String,
    pub reveal_threshold: f32, // visible fraction, 0..1
    pub drag_radius: f32,
    pub snap_back_ms: u64,
    pub settle_redraw_ms: u64, // post-snap redraw, >= snap_back_ms
    pub resize_debounce_ms: u64,
    pub particle_count: usize,
    pub particle_cleanup_ms: u64,
    pub control_factor: f32,
    pub reduced_motion: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            mount_id: MOUNT_ID.to_string(),
            reveal_threshold: REVEAL_THRESHOLD,
            drag_radius: DRAG_RADIUS,
            snap_back_ms: SNAP_BACK_MS,
            settle_redraw_ms: SETTLE_REDRAW_MS,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            particle_count: PARTICLE_COUNT,
            particle_cleanup_ms: CLEANUP_DELAY_MS,
            control_factor: CONTROL_FACTOR,
            reduced_motion: false,
        }
    }
}

impl TimelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse timeline config")?;
        Ok(config.sanitized())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Load `path` if it exists, falling back to defaults on any problem.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config: {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Pull out-of-range values back into something usable.
    pub fn sanitized(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            log::warn!("reveal_threshold {} out of range, clamping", self.reveal_threshold);
            self.reveal_threshold = self.reveal_threshold.clamp(0.0, 1.0);
        }
        if !self.drag_radius.is_finite() || self.drag_radius < 0.0 {
            log::warn!("drag_radius {} invalid, using {}", self.drag_radius, DRAG_RADIUS);
            self.drag_radius = DRAG_RADIUS;
        }
        if self.settle_redraw_ms < self.snap_back_ms {
            log::warn!(
                "settle_redraw_ms {} shorter than snap_back_ms {}, raising",
                self.settle_redraw_ms,
                self.snap_back_ms
            );
            self.settle_redraw_ms = self.snap_back_ms;
        }
        self
    }
}

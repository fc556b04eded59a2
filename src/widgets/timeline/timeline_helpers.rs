//! Timeline UI helpers: row layout math, glam/egui conversions and the
//! per-frame layout snapshot handed to the geometry engine.
use std::collections::HashMap;

use eframe::egui::{self, Pos2};
use glam::Vec2;

use super::ViewConfig;
use crate::core::geometry::{LayoutSource, Rect};
use crate::core::reveal::intersection_ratio;
use crate::entities::ElementId;

#[inline]
pub(super) fn to_rect(r: egui::Rect) -> Rect {
    Rect::from_min_max(Vec2::new(r.min.x, r.min.y), Vec2::new(r.max.x, r.max.y))
}

#[inline]
pub(super) fn to_egui_rect(r: Rect) -> egui::Rect {
    egui::Rect::from_min_max(to_pos2(r.min), to_pos2(r.max))
}

#[inline]
pub(super) fn to_pos2(v: Vec2) -> Pos2 {
    Pos2::new(v.x, v.y)
}

#[inline]
pub(super) fn to_vec2(v: egui::Vec2) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Resting geometry of one row, before any drag offset.
#[derive(Clone, Copy, Debug)]
pub(super) struct RowGeom {
    pub row: Rect,
    pub marker: Rect,
    pub content: Rect,
    /// Content sits left of the rope
    pub left_side: bool,
}

/// Lay out `rows` cards alternating around a centered rope.
pub(super) fn compute_rows(container: Rect, rows: usize, config: &ViewConfig) -> Vec<RowGeom> {
    let mid_x = container.left() + container.width() / 2.0;
    let card_width = (container.width() / 2.0 - config.gutter)
        .clamp(config.card_min_width, config.card_max_width);
    let card_height = config.row_height - 2.0 * config.card_padding;

    (0..rows)
        .map(|i| {
            let top = container.top() + config.top_padding + i as f32 * config.row_height;
            let row = Rect::from_min_size(
                Vec2::new(container.left(), top),
                Vec2::new(container.width(), config.row_height),
            );
            let center_y = row.center().y;
            let marker = Rect::from_center_size(
                Vec2::new(mid_x, center_y),
                Vec2::splat(config.marker_radius * 2.0),
            );
            let left_side = i % 2 == 0;
            let x = if left_side {
                mid_x - config.gutter - card_width
            } else {
                mid_x + config.gutter
            };
            let content = Rect::from_min_size(
                Vec2::new(x, center_y - card_height / 2.0),
                Vec2::new(card_width, card_height),
            );
            RowGeom {
                row,
                marker,
                content,
                left_side,
            }
        })
        .collect()
}

impl RowGeom {
    /// Visible fraction of the list item; the same element that gets `in-view`.
    pub fn visibility(&self, viewport: Rect) -> f32 {
        intersection_ratio(self.row, viewport)
    }
}

/// Bounding boxes captured while laying out one frame.
#[derive(Debug, Default)]
pub(super) struct LayoutSnapshot {
    rects: HashMap<ElementId, Rect>,
}

impl LayoutSnapshot {
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    pub fn insert(&mut self, element: ElementId, rect: Rect) {
        self.rects.insert(element, rect);
    }

    pub fn center(&self, element: ElementId) -> Option<Pos2> {
        self.rects.get(&element).map(|r| to_pos2(r.center()))
    }
}

impl LayoutSource for LayoutSnapshot {
    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.rects.get(&element).copied()
    }
}

/// Scale a color's alpha by `factor` in [0, 1].
pub(super) fn fade(color: egui::Color32, factor: f32) -> egui::Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let a = (a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

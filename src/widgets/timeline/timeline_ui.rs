//! Timeline widget - egui host for the timeline runtime.
//!
//! Each frame: fire due timers, lay out rows inside a scroll area, feed
//! drag and visibility events to the runtime, run the (coalesced) geometry
//! pass against this frame's layout, then paint from renderer state.

use std::time::{Duration, Instant};

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, StrokeKind};
use glam::Vec2;

use super::ViewConfig;
use super::timeline_helpers::{LayoutSnapshot, compute_rows, fade, to_egui_rect, to_pos2, to_rect, to_vec2};
use super::timeline_renderer::EguiRenderer;
use crate::config::TimelineConfig;
use crate::core::geometry::Rect;
use crate::entities::{Card, RenderTree, Tag, TimelineSection};
use crate::timeline::Timeline;

const ROPE_COLOR: Color32 = Color32::from_rgba_premultiplied(60, 90, 80, 120);
const MARKER_COLOR: Color32 = Color32::from_rgb(152, 232, 205);
const CARD_FILL: Color32 = Color32::from_rgb(28, 34, 38);
const CARD_STROKE: Color32 = Color32::from_rgb(152, 232, 205);
const HEADING_COLOR: Color32 = Color32::from_rgb(235, 240, 238);
const DATE_COLOR: Color32 = Color32::from_rgb(152, 232, 205);
const BODY_COLOR: Color32 = Color32::from_rgb(180, 188, 186);
/// Card opacity before it has been revealed
const HIDDEN_ALPHA: f32 = 0.35;

pub struct TimelineView {
    config: TimelineConfig,
    view: ViewConfig,
    section: TimelineSection,
    tree: RenderTree,
    timeline: Option<Timeline>,
    renderer: EguiRenderer,
    snapshot: LayoutSnapshot,
    last_scroll: Option<f32>,
    last_size: Option<egui::Vec2>,
}

impl TimelineView {
    pub fn new(section: TimelineSection, config: TimelineConfig) -> Self {
        let mut view = Self {
            config,
            view: ViewConfig::default(),
            section,
            tree: RenderTree::new(),
            timeline: None,
            renderer: EguiRenderer::new(),
            snapshot: LayoutSnapshot::default(),
            last_scroll: None,
            last_size: None,
        };
        view.mount();
        view
    }

    fn mount(&mut self) {
        if self.tree.element_by_id(&self.config.mount_id).is_none() {
            self.tree.create_with_id(Tag::Div, &self.config.mount_id);
        }
        self.timeline = Timeline::mount(&mut self.tree, &self.section, self.config.clone());
    }

    pub fn section(&self) -> &TimelineSection {
        &self.section
    }

    /// Unmount the current section and mount `section` in its place.
    pub fn replace_section(&mut self, section: TimelineSection) {
        if let Some(timeline) = self.timeline.take() {
            timeline.unmount(&mut self.tree, &mut self.renderer);
        }
        self.renderer = EguiRenderer::new();
        self.snapshot.clear();
        self.last_scroll = None;
        self.section = section;
        self.mount();
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let now = Instant::now();
        self.renderer.set_now(now);

        let Some(timeline) = self.timeline.as_mut() else {
            ui.label("Nothing to show");
            return;
        };

        let size = ui.available_size();
        if self.last_size.is_some_and(|last| last != size) {
            timeline.on_resize(now);
        }
        self.last_size = Some(size);

        timeline.tick(now, &mut self.renderer);

        let view = &self.view;
        let tree = &mut self.tree;
        let renderer = &mut self.renderer;
        let snapshot = &mut self.snapshot;
        let cards = &self.section.cards;
        let fade_in = if self.config.reduced_motion {
            Duration::ZERO
        } else {
            Duration::from_millis(view.reveal_fade_ms)
        };

        let output = egui::ScrollArea::vertical()
            .id_salt("credentials_timeline_scroll")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                let height = view.content_height(timeline.items().len());
                let (container_rect, _) =
                    ui.allocate_exact_size(egui::vec2(ui.available_width(), height), Sense::hover());
                let container = to_rect(container_rect);
                let rows = compute_rows(container, timeline.items().len(), view);
                let viewport = to_rect(ui.clip_rect());

                snapshot.clear();
                snapshot.insert(timeline.skeleton().container, container);

                let base_id = ui.id();
                for (index, geom) in rows.iter().enumerate() {
                    let Some((marker, content)) = timeline.item(index).map(|it| (it.marker, it.content)) else {
                        continue;
                    };

                    let resting = geom.content.translate(renderer.visual_offset(index));
                    let response = ui.interact(
                        to_egui_rect(resting),
                        base_id.with(("timeline_card", index)),
                        Sense::drag(),
                    );
                    if response.drag_started() {
                        timeline.on_drag_start(index, renderer);
                    }
                    if response.dragged() {
                        let delta = to_vec2(response.drag_delta());
                        if delta != Vec2::ZERO {
                            timeline.on_drag_move(index, delta, renderer);
                        }
                    }
                    if response.drag_stopped() {
                        timeline.on_drag_end(index, now, renderer);
                    }
                    if response.hovered() || response.dragged() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
                    }

                    snapshot.insert(marker, geom.marker);
                    snapshot.insert(content, geom.content.translate(renderer.visual_offset(index)));

                    let ratio = geom.visibility(viewport);
                    timeline.on_visibility(index, ratio, now, tree, renderer);
                }

                // Connectors follow a card while it springs back
                if renderer.is_animating() {
                    timeline.request_redraw();
                }
                timeline.on_frame(&*snapshot, renderer);

                let painter = ui.painter();
                paint_rope(painter, container, view);
                renderer.paint_connectors(painter, container_rect.min);

                for (index, geom) in rows.iter().enumerate() {
                    let Some(card) = cards.get(index) else {
                        continue;
                    };
                    let progress = renderer.reveal_progress(index, fade_in);
                    let alpha = HIDDEN_ALPHA + (1.0 - HIDDEN_ALPHA) * progress;
                    let rect = geom.content.translate(renderer.visual_offset(index));

                    painter.circle_filled(to_pos2(geom.marker.center()), view.marker_radius, fade(MARKER_COLOR, alpha));
                    paint_card(painter, rect, card, alpha, progress, renderer.is_lifted(index), view);
                }

                renderer.paint_bursts(painter, snapshot, view.spark_size);
            });

        let offset = output.state.offset.y;
        if self.last_scroll.is_some_and(|last| last != offset) {
            timeline.on_scroll();
        }
        self.last_scroll = Some(offset);

        if timeline.wants_frame() || self.renderer.is_animating() {
            ui.ctx().request_repaint();
        } else if let Some(deadline) = timeline.next_deadline() {
            ui.ctx()
                .request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}

fn paint_rope(painter: &egui::Painter, container: Rect, view: &ViewConfig) {
    let x = container.left() + container.width() / 2.0;
    let top = container.top() + view.top_padding * 0.5;
    let bottom = container.bottom() - view.top_padding * 0.5;
    painter.line_segment(
        [egui::pos2(x, top), egui::pos2(x, bottom)],
        Stroke::new(2.0, ROPE_COLOR),
    );
}

fn paint_card(
    painter: &egui::Painter,
    rect: Rect,
    card: &Card,
    alpha: f32,
    emphasis: f32,
    lifted: bool,
    view: &ViewConfig,
) {
    let egui_rect = to_egui_rect(rect);
    let radius = 8.0;
    painter.rect_filled(egui_rect, radius, fade(CARD_FILL, alpha));

    let stroke_alpha = 0.15 + 0.45 * emphasis + if lifted { 0.4 } else { 0.0 };
    painter.rect_stroke(
        egui_rect,
        radius,
        Stroke::new(1.0, fade(CARD_STROKE, stroke_alpha)),
        StrokeKind::Inside,
    );

    let inner = egui_rect.shrink(view.card_padding);
    let mut cursor = inner.min;

    let date = painter.text(
        cursor,
        Align2::LEFT_TOP,
        &card.date,
        FontId::monospace(12.0),
        fade(DATE_COLOR, alpha),
    );
    cursor.y = date.max.y + 4.0;

    let heading = painter.layout(
        card.heading.clone(),
        FontId::proportional(17.0),
        fade(HEADING_COLOR, alpha),
        inner.width(),
    );
    let heading_height = heading.size().y;
    painter.galley(cursor, heading, HEADING_COLOR);
    cursor.y += heading_height + 6.0;

    let body = painter.layout(
        card.description.clone(),
        FontId::proportional(13.0),
        fade(BODY_COLOR, alpha),
        inner.width(),
    );
    painter.with_clip_rect(egui_rect).galley(cursor, body, BODY_COLOR);
}

//! Connector geometry: curved paths from each card's marker to its content box.
//!
//! All coordinates are container-local. For every card the path starts at
//! the marker center and ends on the content edge that faces the container's
//! vertical centerline:
//!
//! ```text
//! content.left <  mid_x  -> attach to content right edge
//! content.left >= mid_x  -> attach to content left edge
//! ```
//!
//! Control points only shape the curve horizontally, so connectors stay
//! horizontally dominant no matter how far apart marker and content are
//! vertically:
//!
//! ```text
//! cp1 = (start.x + k*|dx|, start.y)
//! cp2 = (end.x   - k*|dx|, end.y)      k = 0.35
//! ```

use std::fmt::Write as _;

use glam::Vec2;

use super::renderer::Renderer;
use crate::entities::{CardItem, ElementId};

/// Default horizontal control-point factor.
pub const CONTROL_FACTOR: f32 = 0.35;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self::from_min_size(center - size * 0.5, size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn area(&self) -> f32 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn translate(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Overlap of two boxes; `None` when they are disjoint.
    /// Boxes that only touch along an edge yield a zero-area rect.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if min.x > max.x || min.y > max.y {
            None
        } else {
            Some(Rect { min, max })
        }
    }
}

/// Cubic curve descriptor, regenerated every redraw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorPath {
    pub start: Vec2,
    pub end: Vec2,
    pub control_points: [Vec2; 2],
}

impl ConnectorPath {
    /// Build the connector for one card from live page-space boxes.
    pub fn between(container: Rect, marker: Rect, content: Rect, factor: f32) -> Self {
        let origin = container.min;
        let start = marker.center() - origin;

        let mid_x = container.left() + container.width() / 2.0;
        let edge_x = if content.left() < mid_x {
            content.right()
        } else {
            content.left()
        };
        let end = Vec2::new(edge_x - origin.x, content.center().y - origin.y);

        let dx = (end.x - start.x).abs();
        let control_points = [
            Vec2::new(start.x + dx * factor, start.y),
            Vec2::new(end.x - dx * factor, end.y),
        ];

        Self {
            start,
            end,
            control_points,
        }
    }

    /// The four Bézier points in drawing order.
    pub fn points(&self) -> [Vec2; 4] {
        [
            self.start,
            self.control_points[0],
            self.control_points[1],
            self.end,
        ]
    }

    /// Point on the curve at parameter `t` in [0, 1].
    pub fn sample(&self, t: f32) -> Vec2 {
        let [p0, p1, p2, p3] = self.points();
        let u = 1.0 - t;
        p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
    }

    /// SVG path data: `M sx sy C c1x c1y c2x c2y ex ey`.
    pub fn to_svg_d(&self) -> String {
        let [c1, c2] = self.control_points;
        let mut d = String::with_capacity(64);
        let _ = write!(
            d,
            "M {} {} C {} {} {} {} {} {}",
            self.start.x, self.start.y, c1.x, c1.y, c2.x, c2.y, self.end.x, self.end.y
        );
        d
    }
}

/// Stroke style shared by every connector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorStyle {
    /// Straight (non-premultiplied) RGBA
    pub color: [u8; 4],
    pub width: f32,
    pub round_cap: bool,
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            // rgba(152, 232, 205, 0.18)
            color: [152, 232, 205, 46],
            width: 2.0,
            round_cap: true,
        }
    }
}

/// Source of live bounding boxes, in one shared page space.
///
/// Returns `None` for elements that are absent or not laid out.
pub trait LayoutSource {
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;
}

impl<F> LayoutSource for F
where
    F: Fn(ElementId) -> Option<Rect>,
{
    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self(element)
    }
}

/// Recomputes and redraws every connector in one pass.
#[derive(Debug, Clone)]
pub struct GeometryEngine {
    factor: f32,
    style: ConnectorStyle,
    passes: u64,
}

impl Default for GeometryEngine {
    fn default() -> Self {
        Self::new(CONTROL_FACTOR)
    }
}

impl GeometryEngine {
    pub fn new(factor: f32) -> Self {
        Self {
            factor,
            style: ConnectorStyle::default(),
            passes: 0,
        }
    }

    /// Number of passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Compute connectors for `items` in display order.
    ///
    /// Items whose marker or content box is unavailable are skipped; a
    /// missing container yields no connectors at all.
    pub fn compute(
        &self,
        layout: &dyn LayoutSource,
        container: ElementId,
        items: &[CardItem],
    ) -> Vec<(usize, ConnectorPath)> {
        let Some(container_rect) = layout.bounding_rect(container) else {
            log::trace!("GeometryEngine: container {:?} has no layout", container);
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| {
                let marker = layout.bounding_rect(item.marker);
                let content = layout.bounding_rect(item.content);
                match (marker, content) {
                    (Some(marker), Some(content)) => Some((
                        item.index,
                        ConnectorPath::between(container_rect, marker, content, self.factor),
                    )),
                    _ => {
                        log::trace!("GeometryEngine: skipping item {} (unmounted)", item.index);
                        None
                    }
                }
            })
            .collect()
    }

    /// Clear the connector surface and repopulate it from live geometry.
    ///
    /// Returns the number of connectors drawn.
    pub fn pass(
        &mut self,
        layout: &dyn LayoutSource,
        container: ElementId,
        items: &[CardItem],
        renderer: &mut dyn Renderer,
    ) -> usize {
        let paths = self.compute(layout, container, items);
        renderer.clear_paths();
        for (index, path) in &paths {
            renderer.set_path(*index, path, &self.style);
        }
        self.passes += 1;
        log::trace!(
            "GeometryEngine: pass {} drew {}/{} connectors",
            self.passes,
            paths.len(),
            items.len()
        );
        paths.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::renderer::RecordingRenderer;
    use crate::entities::{RenderTree, Tag, TimelineSection, section::Card};
    use std::collections::HashMap;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::from_min_size(Vec2::new(x, y), Vec2::new(w, h))
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_content_left_of_mid_attaches_right_edge() {
        let container = rect(0.0, 0.0, 400.0, 1000.0);
        let marker = rect(195.0, 95.0, 10.0, 10.0);
        let content = rect(20.0, 80.0, 150.0, 60.0);
        let path = ConnectorPath::between(container, marker, content, CONTROL_FACTOR);

        assert!(approx(path.start, Vec2::new(200.0, 100.0)));
        assert!(approx(path.end, Vec2::new(170.0, 110.0)));
    }

    #[test]
    fn test_content_right_of_mid_attaches_left_edge() {
        let container = rect(0.0, 0.0, 400.0, 1000.0);
        let marker = rect(195.0, 95.0, 10.0, 10.0);
        let content = rect(240.0, 80.0, 150.0, 60.0);
        let path = ConnectorPath::between(container, marker, content, CONTROL_FACTOR);

        assert!(approx(path.end, Vec2::new(240.0, 110.0)));
    }

    #[test]
    fn test_boundary_resolves_to_left_edge() {
        let container = rect(0.0, 0.0, 400.0, 1000.0);
        let marker = rect(195.0, 95.0, 10.0, 10.0);
        // content.left == mid_x
        let content = rect(200.0, 80.0, 150.0, 60.0);
        let path = ConnectorPath::between(container, marker, content, CONTROL_FACTOR);

        assert_eq!(path.end.x, 200.0);
    }

    #[test]
    fn test_coordinates_are_container_local() {
        let container = rect(50.0, -300.0, 400.0, 1000.0);
        let marker = rect(245.0, -205.0, 10.0, 10.0);
        let content = rect(300.0, -220.0, 100.0, 40.0);
        let path = ConnectorPath::between(container, marker, content, CONTROL_FACTOR);

        assert!(approx(path.start, Vec2::new(200.0, 100.0)));
        assert!(approx(path.end, Vec2::new(250.0, 100.0)));
    }

    #[test]
    fn test_control_points_horizontal_only() {
        let container = rect(0.0, 0.0, 400.0, 1000.0);
        let marker = rect(195.0, 95.0, 10.0, 10.0);
        let content = rect(20.0, 480.0, 80.0, 40.0);
        let path = ConnectorPath::between(container, marker, content, CONTROL_FACTOR);

        // start (200,100), end (100,500), |dx| = 100
        let [c1, c2] = path.control_points;
        assert!(approx(c1, Vec2::new(235.0, 100.0)));
        assert!(approx(c2, Vec2::new(65.0, 500.0)));
        assert_eq!(c1.y, path.start.y);
        assert_eq!(c2.y, path.end.y);
    }

    #[test]
    fn test_svg_path_data() {
        let path = ConnectorPath {
            start: Vec2::new(1.0, 2.0),
            end: Vec2::new(7.0, 8.0),
            control_points: [Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0)],
        };
        assert_eq!(path.to_svg_d(), "M 1 2 C 3 4 5 6 7 8");
    }

    #[test]
    fn test_sample_endpoints() {
        let path = ConnectorPath {
            start: Vec2::new(0.0, 0.0),
            end: Vec2::new(10.0, 20.0),
            control_points: [Vec2::new(3.0, 0.0), Vec2::new(7.0, 20.0)],
        };
        assert!(approx(path.sample(0.0), path.start));
        assert!(approx(path.sample(1.0), path.end));
    }

    fn mounted() -> (RenderTree, ElementId, Vec<CardItem>) {
        let mut tree = RenderTree::new();
        let root = tree.create_with_id(Tag::Div, "root");
        let section = TimelineSection::new(
            "t",
            "T",
            vec![Card::new("A", "1", "a"), Card::new("B", "2", "b"), Card::new("C", "3", "c")],
        );
        let (_, items) = tree.render_section(root, &section);
        (tree, root, items)
    }

    fn layout_for(root: ElementId, items: &[CardItem]) -> HashMap<ElementId, Rect> {
        let mut boxes = HashMap::new();
        boxes.insert(root, rect(0.0, 0.0, 400.0, 600.0));
        for item in items {
            let y = 100.0 + item.index as f32 * 150.0;
            boxes.insert(item.marker, rect(195.0, y, 10.0, 10.0));
            let x = if item.index % 2 == 0 { 20.0 } else { 240.0 };
            boxes.insert(item.content, rect(x, y - 20.0, 140.0, 60.0));
        }
        boxes
    }

    #[test]
    fn test_pass_skips_unmounted_items() {
        let (_tree, root, items) = mounted();
        let mut boxes = layout_for(root, &items);
        boxes.remove(&items[1].content);
        let layout = |id: ElementId| boxes.get(&id).copied();

        let mut engine = GeometryEngine::default();
        let mut renderer = RecordingRenderer::default();
        let drawn = engine.pass(&layout, root, &items, &mut renderer);

        assert_eq!(drawn, 2);
        let indices: Vec<usize> = renderer.paths().iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, [0, 2]);
    }

    #[test]
    fn test_pass_missing_container_draws_nothing() {
        let (_tree, root, items) = mounted();
        let mut boxes = layout_for(root, &items);
        boxes.remove(&root);
        let layout = |id: ElementId| boxes.get(&id).copied();

        let mut engine = GeometryEngine::default();
        let mut renderer = RecordingRenderer::default();
        assert_eq!(engine.pass(&layout, root, &items, &mut renderer), 0);
        assert!(renderer.paths().is_empty());
    }

    #[test]
    fn test_pass_is_idempotent() {
        let (_tree, root, items) = mounted();
        let boxes = layout_for(root, &items);
        let layout = |id: ElementId| boxes.get(&id).copied();

        let mut engine = GeometryEngine::default();
        let mut renderer = RecordingRenderer::default();
        engine.pass(&layout, root, &items, &mut renderer);
        let first = renderer.paths().to_vec();
        engine.pass(&layout, root, &items, &mut renderer);
        let second = renderer.paths().to_vec();

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        for ((_, a), (_, b)) in first.iter().zip(&second) {
            assert_eq!(a.to_svg_d(), b.to_svg_d());
        }
        assert_eq!(engine.passes(), 2);
    }
}

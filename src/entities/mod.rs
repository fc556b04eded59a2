//! Entities module - timeline data and its rendered form
//!
//! - `section`: the immutable dataset (sections and cards)
//! - `render_tree`: the element tree built from a section, plus the
//!   per-card runtime entity (`CardItem`)

pub mod render_tree;
pub mod section;

pub use render_tree::{CardItem, Element, ElementId, RenderTree, Tag, TimelineSkeleton};
pub use section::{Card, TimelineSection};

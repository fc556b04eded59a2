//! Headless render tree: the element structure a timeline mounts into.
//!
//! Elements live in an arena and are addressed by [`ElementId`]. A host
//! seeds the tree with its own elements (at minimum a mount point carrying
//! a known `id`), then [`RenderTree::render_section`] clears the mount and
//! builds the timeline under it:
//!
//! ```text
//! container
//! ├── rope            (aria-hidden)
//! ├── connector surface (aria-hidden)
//! └── list
//!     └── item × N
//!         ├── marker  (role=img, aria-hidden)
//!         ├── time    (date text)
//!         └── content (tabindex=0)
//!             └── parallax-inner
//!                 ├── heading
//!                 └── description
//! ```
//!
//! Each rendered card yields one [`CardItem`] holding the ids of its marker
//! and content elements plus its reveal and drag state.

use crate::core::drag::DragState;
use crate::core::reveal::RevealState;

use super::section::TimelineSection;

/// Arena index of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Div,
    Svg,
    List,
    ListItem,
    Time,
    Heading,
    Paragraph,
}

#[derive(Clone, Debug)]
pub struct Element {
    pub tag: Tag,
    pub id_attr: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    /// False once removed from the tree
    pub mounted: bool,
}

impl Element {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            id_attr: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            mounted: true,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Runtime entity for one rendered card.
#[derive(Clone, Debug)]
pub struct CardItem {
    /// Position in display order
    pub index: usize,
    /// The list item element
    pub element: ElementId,
    pub marker: ElementId,
    pub content: ElementId,
    pub reveal: RevealState,
    pub drag: DragState,
}

/// Element ids of the timeline skeleton produced by one render.
#[derive(Clone, Copy, Debug)]
pub struct TimelineSkeleton {
    pub container: ElementId,
    pub rope: ElementId,
    pub surface: ElementId,
    pub list: ElementId,
}

#[derive(Clone, Debug, Default)]
pub struct RenderTree {
    elements: Vec<Element>,
    /// Slots of removed elements, reused by `create`
    free: Vec<ElementId>,
}

impl RenderTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element.
    ///
    /// Slots freed by [`RenderTree::remove`] are reused, so ids of removed
    /// elements must not be held across a re-render.
    pub fn create(&mut self, tag: Tag) -> ElementId {
        if let Some(id) = self.free.pop() {
            self.elements[id.0 as usize] = Element::new(tag);
            return id;
        }
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element::new(tag));
        id
    }

    /// Number of live (mounted or detached) elements.
    pub fn len(&self) -> usize {
        self.elements.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a root-level element carrying an `id` attribute (host mount point).
    pub fn create_with_id(&mut self, tag: Tag, id_attr: &str) -> ElementId {
        let id = self.create(tag);
        if let Some(el) = self.get_mut(id) {
            el.id_attr = Some(id_attr.to_string());
        }
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize).filter(|el| el.mounted)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0 as usize).filter(|el| el.mounted)
    }

    /// Lookup by `id` attribute among mounted elements.
    pub fn element_by_id(&self, id_attr: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|el| el.mounted && el.id_attr.as_deref() == Some(id_attr))
            .map(|idx| ElementId(idx as u32))
    }

    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        if let Some(el) = self.get_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.get_mut(parent) {
            el.children.push(child);
        }
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.get(id).and_then(|el| el.text.as_deref())
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.get_mut(id) {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(el) = self.get_mut(id) {
            match el.attrs.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value.to_string(),
                None => el.attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(el) = self.get_mut(id) {
            el.text = Some(text.to_string());
        }
    }

    /// Unmount an element and its whole subtree.
    pub fn remove(&mut self, id: ElementId) {
        let Some(el) = self.get(id) else {
            return;
        };
        let parent = el.parent;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(el) = self.get_mut(next) {
                el.mounted = false;
                el.parent = None;
                stack.extend(el.children.drain(..));
                self.free.push(next);
            }
        }
        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|c| *c != id);
        }
    }

    /// Remove every child of `id`, keeping `id` itself.
    pub fn clear_children(&mut self, id: ElementId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    /// First mounted descendant (depth-first) carrying `class`.
    pub fn find_by_class(&self, root: ElementId, class: &str) -> Option<ElementId> {
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let el = self.get(id)?;
            if el.has_class(class) {
                return Some(id);
            }
            stack.extend(el.children.iter().rev().copied());
        }
        None
    }

    fn element(&mut self, tag: Tag, class: Option<&str>, attrs: &[(&str, &str)]) -> ElementId {
        let id = self.create(tag);
        if let Some(class) = class {
            self.add_class(id, class);
        }
        for (name, value) in attrs {
            self.set_attr(id, name, value);
        }
        id
    }

    /// Clear `container` and build the timeline for `section` under it.
    ///
    /// Returns one [`CardItem`] per card, in dataset order.
    pub fn render_section(
        &mut self,
        container: ElementId,
        section: &TimelineSection,
    ) -> (TimelineSkeleton, Vec<CardItem>) {
        self.clear_children(container);

        let rope = self.element(Tag::Div, Some("rope"), &[("aria-hidden", "true")]);
        let surface = self.element(
            Tag::Svg,
            Some("timeline-svg"),
            &[("aria-hidden", "true"), ("width", "100%"), ("height", "100%")],
        );
        let list = self.element(Tag::List, Some("timeline-list"), &[]);
        self.append_child(container, rope);
        self.append_child(container, surface);
        self.append_child(container, list);

        let mut items = Vec::with_capacity(section.cards.len());
        for (index, card) in section.cards.iter().enumerate() {
            let li = self.element(Tag::ListItem, Some("timeline-item"), &[]);
            let marker = self.element(
                Tag::Div,
                Some("timeline-dot"),
                &[("role", "img"), ("aria-hidden", "true")],
            );
            let time = self.element(Tag::Time, None, &[]);
            self.set_text(time, &card.date);
            let content = self.element(Tag::Div, Some("timeline-content"), &[("tabindex", "0")]);
            let inner = self.element(Tag::Div, Some("parallax-inner"), &[]);
            let heading = self.element(Tag::Heading, None, &[]);
            self.set_text(heading, &card.heading);
            let description = self.element(Tag::Paragraph, None, &[]);
            self.set_text(description, &card.description);

            self.append_child(inner, heading);
            self.append_child(inner, description);
            self.append_child(content, inner);
            self.append_child(li, marker);
            self.append_child(li, time);
            self.append_child(li, content);
            self.append_child(list, li);

            items.push(CardItem {
                index,
                element: li,
                marker,
                content,
                reveal: RevealState::Hidden,
                drag: DragState::default(),
            });
        }

        log::debug!(
            "Rendered section '{}' into {:?}: {} items",
            section.id,
            container,
            items.len()
        );

        let skeleton = TimelineSkeleton {
            container,
            rope,
            surface,
            list,
        };
        (skeleton, items)
    }
}

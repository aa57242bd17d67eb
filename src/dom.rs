use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::events::{ControlEvent, Gesture, PointerEvent};
use crate::stage::{Markup, Stage, Tag};

/// YAML description of a page body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Page {
    #[serde(default)]
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Node {
    pub tag: Tag,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub style: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            id: None,
            text: None,
            src: None,
            style: BTreeMap::new(),
            children: Vec::new(),
        }
    }
}

impl Page {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read page {}", path.display()))?;
        serde_yaml::from_str(&s)
            .with_context(|| format!("failed to parse page {}", path.display()))
    }

    /// A hidden container holding `panels` image/caption panels.
    pub fn gallery(container_id: &str, panels: usize) -> Self {
        let mut container = Node::new(Tag::Div);
        container.id = Some(container_id.to_string());
        container
            .style
            .insert("display".to_string(), "none".to_string());
        for n in 1..=panels {
            let mut image = Node::new(Tag::Img);
            image.src = Some(format!("images/photo-{n:02}.jpg"));
            let mut caption = Node::new(Tag::Div);
            caption.text = Some(format!("Photo {n}"));
            let mut panel = Node::new(Tag::Div);
            panel.children = vec![image, caption];
            container.children.push(panel);
        }
        Self {
            body: vec![container],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(usize);

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: Tag,
    pub id: Option<String>,
    pub text: Option<String>,
    pub src: Option<String>,
    pub style: BTreeMap<String, String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    In,
    Out,
}

/// One requested opacity transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub element: ElementId,
    pub fade: Fade,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
struct Listener {
    element: ElementId,
    gesture: Gesture,
    action: ControlEvent,
}

/// In-memory page. Visibility is the `display` style; fades apply their end
/// state immediately and are recorded in the transition log.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
    roots: Vec<ElementId>,
    listeners: Vec<Listener>,
    transitions: Vec<Transition>,
}

impl Document {
    pub fn from_page(page: &Page) -> Self {
        let mut doc = Self::default();
        for node in &page.body {
            let id = doc.insert(None, node);
            doc.roots.push(id);
        }
        doc
    }

    fn insert(&mut self, parent: Option<ElementId>, node: &Node) -> ElementId {
        let id = self.push(Element {
            tag: node.tag,
            id: node.id.clone(),
            text: node.text.clone(),
            src: node.src.clone(),
            style: node.style.clone(),
            parent,
            children: Vec::new(),
        });
        for child in &node.children {
            let child_id = self.insert(Some(id), child);
            self.elements[id.0].children.push(child_id);
        }
        id
    }

    fn push(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).and_then(|el| el.parent)
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.css(id, "display").is_none_or(|d| d != "none")
    }

    pub fn css(&self, id: ElementId, property: &str) -> Option<&str> {
        self.element(id)
            .and_then(|el| el.style.get(property))
            .map(String::as_str)
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn take_transitions(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.transitions)
    }

    fn descendants(&self, parent: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = match self.element(parent) {
            Some(el) => el.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(el) = self.element(id) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    fn all(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        for root in &self.roots {
            out.push(*root);
            out.extend(self.descendants(*root));
        }
        out
    }

    fn set_display(&mut self, id: ElementId, value: &str) {
        if let Some(el) = self.elements.get_mut(id.0) {
            el.style.insert("display".to_string(), value.to_string());
        }
    }

    fn record(&mut self, element: ElementId, fade: Fade, duration: Duration) {
        debug!(?element, ?fade, duration_ms = duration.as_millis() as u64, "fade");
        self.transitions.push(Transition {
            element,
            fade,
            duration,
        });
    }
}

impl Stage for Document {
    type Handle = ElementId;

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.all()
            .into_iter()
            .find(|el| self.elements[el.0].id.as_deref() == Some(id))
    }

    fn children(&self, parent: &ElementId, tag: Tag) -> Vec<ElementId> {
        self.element(*parent)
            .map(|el| {
                el.children
                    .iter()
                    .copied()
                    .filter(|child| self.elements[child.0].tag == tag)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn first_descendant(&self, parent: &ElementId, tag: Tag) -> Option<ElementId> {
        self.descendants(*parent)
            .into_iter()
            .find(|el| self.elements[el.0].tag == tag)
    }

    fn fade_in(&mut self, el: &ElementId, duration: Duration) {
        self.set_display(*el, "block");
        self.record(*el, Fade::In, duration);
    }

    fn fade_out(&mut self, el: &ElementId, duration: Duration) {
        self.set_display(*el, "none");
        self.record(*el, Fade::Out, duration);
    }

    fn set_css(&mut self, el: &ElementId, property: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(el.0) {
            element
                .style
                .insert(property.to_string(), value.to_string());
        }
    }

    fn append(&mut self, parent: &ElementId, markup: Markup) -> crate::error::Result<ElementId> {
        if self.element(*parent).is_none() {
            return Err(Error::Stage(format!("no element {parent:?} to append to")));
        }
        if self.element_by_id(&markup.id).is_some() {
            return Err(Error::Stage(format!("duplicate element id {}", markup.id)));
        }
        let mut style = BTreeMap::new();
        if markup.hidden {
            style.insert("display".to_string(), "none".to_string());
        }
        let id = self.push(Element {
            tag: markup.tag,
            id: Some(markup.id),
            text: Some(markup.text),
            src: None,
            style,
            parent: Some(*parent),
            children: Vec::new(),
        });
        self.elements[parent.0].children.push(id);
        Ok(id)
    }

    fn listen(&mut self, el: &ElementId, gesture: Gesture, action: ControlEvent) {
        self.listeners.push(Listener {
            element: *el,
            gesture,
            action,
        });
    }

    /// Clicks bubble to ancestors; enter and leave only reach the element
    /// itself, so moving between a container and its children is not a leave.
    fn route(&self, event: &PointerEvent) -> Option<ControlEvent> {
        let mut current = self.element_by_id(&event.target);
        while let Some(el) = current {
            if let Some(listener) = self
                .listeners
                .iter()
                .find(|l| l.element == el && l.gesture == event.gesture)
            {
                debug!(target = %event.target, action = ?listener.action, "routed pointer event");
                return Some(listener.action);
            }
            current = match event.gesture {
                Gesture::Click => self.parent(el),
                Gesture::Enter | Gesture::Leave => None,
            };
        }
        debug!(target = %event.target, gesture = ?event.gesture, "unhandled pointer event");
        None
    }
}

//! Capability interface over the hosting page.
//!
//! The slideshow never touches a rendering environment directly: element
//! queries, timed fades, style changes, injected markup and listener wiring
//! all go through [`Stage`]. [`crate::dom::Document`] is the in-memory host.

use std::fmt::Debug;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::events::{ControlEvent, Gesture, PointerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Div,
    Img,
    Span,
    P,
    A,
}

/// Markup appended to an existing element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    pub tag: Tag,
    pub id: String,
    pub text: String,
    pub hidden: bool,
}

impl Markup {
    /// A `div` that starts with `display: none`.
    pub fn hidden_div(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: Tag::Div,
            id: id.into(),
            text: text.into(),
            hidden: true,
        }
    }
}

pub trait Stage {
    type Handle: Clone + Debug + PartialEq;

    fn element_by_id(&self, id: &str) -> Option<Self::Handle>;

    /// Immediate children of `parent` with the given tag, in document order.
    fn children(&self, parent: &Self::Handle, tag: Tag) -> Vec<Self::Handle>;

    /// First descendant of `parent` with the given tag, depth first.
    fn first_descendant(&self, parent: &Self::Handle, tag: Tag) -> Option<Self::Handle>;

    fn fade_in(&mut self, el: &Self::Handle, duration: Duration);

    fn fade_out(&mut self, el: &Self::Handle, duration: Duration);

    fn set_css(&mut self, el: &Self::Handle, property: &str, value: &str);

    fn append(&mut self, parent: &Self::Handle, markup: Markup) -> Result<Self::Handle>;

    /// Ask the host to report `gesture` on `el` as `action`.
    fn listen(&mut self, el: &Self::Handle, gesture: Gesture, action: ControlEvent);

    /// Resolve a host event against the registered listeners.
    fn route(&self, event: &PointerEvent) -> Option<ControlEvent>;
}

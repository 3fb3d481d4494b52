//! Element accessor abstraction
//!
//! The fingerprinter never touches a rendering engine directly. It reads
//! elements through the [`Element`] trait, which a host implements over its
//! live document. [`DocumentTree`] is a self-contained implementation used
//! for headless callers and tests, buildable by hand or from markup.

mod markup;
mod tree;

pub use tree::{DocumentTree, ElementHandle, NodeId};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("Markup parse error: {0}")]
    Parse(#[from] roxmltree::Error),
}

/// Viewport-relative rectangle, as reported by layout
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether the viewport point lies inside the rectangle
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }
}

/// Document scroll position in px
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// Read access to one element of a live document
///
/// Handles are cheap to clone and compare by identity. The document body
/// is the boundary every structural walk stops at.
pub trait Element: Clone + PartialEq {
    /// Tag name in any case
    fn tag_name(&self) -> String;

    /// Non-empty `id` attribute
    fn id(&self) -> Option<String>;

    /// Raw `class` attribute
    fn class_name(&self) -> Option<String>;

    fn parent(&self) -> Option<Self>;

    /// Element children in document order
    fn children(&self) -> Vec<Self>;

    /// Whether this element is the document body
    fn is_boundary(&self) -> bool;

    /// Layout rectangle relative to the viewport
    fn client_rect(&self) -> Rect;

    /// Scroll offset of the owning document
    fn scroll_offset(&self) -> ScrollOffset;

    /// Resolved value of a style property
    fn computed_style(&self, property: &str) -> Option<String>;

    /// Rendered text of the element and its descendants
    fn text_content(&self) -> String;

    /// Form-control `type`, if the element has one
    fn input_type(&self) -> Option<String>;
}

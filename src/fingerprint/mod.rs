//! Element fingerprinting
//!
//! Turns a live element into plain data that outlives it: a structural
//! locator, a short display label, a style snapshot, page geometry and
//! nearby text. All operations accept `None` and return a neutral value.
//!
//! Locator format, walking from the target up to (not including) `body`:
//!
//! ```text
//! body > main.content > ul > li.item.active:nth-of-type(3)
//! #sidebar > nav > a:nth-of-type(2)
//! ```
//!
//! An element with an id ends the walk, so the locator is anchored at that id
//! instead of `body`.

mod escape;

pub use escape::css_escape;

use serde::{Deserialize, Serialize};

use crate::annotations::BoundingBox;
use crate::dom::Element;

/// Upper bound on ancestor steps for any walk
pub const MAX_WALK_DEPTH: usize = 512;

/// Default length limit for [`get_nearby_text`]
pub const DEFAULT_NEARBY_TEXT_LENGTH: usize = 100;

const BOUNDARY_LABEL: &str = "body";
const SEPARATOR: &str = " > ";
const ELLIPSIS: &str = "...";

/// Style properties captured by [`get_computed_styles`], in output order
pub const STYLE_PROPERTIES: &[&str] = &[
    "display",
    "position",
    "width",
    "height",
    "padding",
    "margin",
    "font-size",
    "font-weight",
    "line-height",
    "color",
    "background-color",
    "border",
    "border-radius",
    "box-shadow",
    "opacity",
    "z-index",
    "flex-direction",
    "justify-content",
    "align-items",
    "gap",
    "grid-template-columns",
    "grid-template-rows",
    "text-align",
    "overflow",
    "transform",
    "transition",
];

const DEFAULT_STYLE_VALUES: &[&str] = &["none", "normal", "auto"];

/// Everything the fingerprinter knows about one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    /// Lowercase tag
    pub tag_name: String,
    pub selector: String,
    pub short_selector: String,
    /// Trimmed class attribute
    pub css_classes: String,
    pub bounding_box: Option<BoundingBox>,
    pub computed_styles: String,
    pub nearby_text: String,
    pub is_fixed: bool,
    pub input_type: Option<String>,
    /// Buttons, links and button-typed form controls
    pub is_button: bool,
}

/// Build the long-form locator for `element`
///
/// Same document structure always yields the same string.
pub fn generate_selector<E: Element>(element: Option<&E>) -> String {
    let Some(element) = element else {
        return String::new();
    };
    if element.is_boundary() {
        return BOUNDARY_LABEL.to_string();
    }

    let mut parts = Vec::new();
    let mut anchored = false;
    let mut current = Some(element.clone());

    while let Some(node) = current {
        if node.is_boundary() || parts.len() >= MAX_WALK_DEPTH {
            break;
        }

        if let Some(id) = node.id() {
            parts.push(format!("#{}", css_escape(&id)));
            anchored = true;
            break;
        }

        let mut segment = node.tag_name().to_lowercase();
        for class in classes(&node).take(2) {
            segment.push('.');
            segment.push_str(&css_escape(class.as_str()));
        }

        let parent = node.parent();
        if let Some(parent) = &parent {
            let tag = node.tag_name();
            let same_tag: Vec<E> = parent
                .children()
                .into_iter()
                .filter(|sibling| sibling.tag_name().eq_ignore_ascii_case(&tag))
                .collect();
            if same_tag.len() > 1 {
                if let Some(index) = same_tag.iter().position(|sibling| *sibling == node) {
                    segment.push_str(&format!(":nth-of-type({})", index + 1));
                }
            }
        }

        parts.push(segment);
        current = parent;
    }

    parts.reverse();
    if anchored {
        parts.join(SEPARATOR)
    } else {
        format!("{}{}{}", BOUNDARY_LABEL, SEPARATOR, parts.join(SEPARATOR))
    }
}

/// Single-level label for display: `tag#id`, `tag.class` or `tag`
pub fn get_short_selector<E: Element>(element: Option<&E>) -> String {
    let Some(element) = element else {
        return String::new();
    };
    if element.is_boundary() {
        return BOUNDARY_LABEL.to_string();
    }

    let tag = element.tag_name().to_lowercase();
    if let Some(id) = element.id() {
        return format!("{}#{}", tag, css_escape(&id));
    }

    match classes(element).next() {
        Some(class) => format!("{}.{}", tag, css_escape(&class)),
        None => tag,
    }
}

/// Non-default values of [`STYLE_PROPERTIES`] as `property: value;` lines
pub fn get_computed_styles<E: Element>(element: Option<&E>) -> String {
    let Some(element) = element else {
        return String::new();
    };

    STYLE_PROPERTIES
        .iter()
        .filter_map(|property| {
            let value = element.computed_style(property)?;
            let value = value.trim();
            if value.is_empty() || DEFAULT_STYLE_VALUES.contains(&value) {
                return None;
            }
            Some(format!("{}: {};", property, value))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Page-absolute geometry, rounded to whole pixels
pub fn get_bounding_box<E: Element>(element: Option<&E>) -> Option<BoundingBox> {
    let element = element?;
    let rect = element.client_rect();
    let scroll = element.scroll_offset();

    Some(BoundingBox {
        x: (rect.left + scroll.x).round() as i64,
        y: (rect.top + scroll.y).round() as i64,
        width: rect.width.round() as i64,
        height: rect.height.round() as i64,
    })
}

/// Whitespace-collapsed text, at most `max_length` characters
///
/// Longer text is cut so that it ends in `...` and the result is exactly
/// `max_length` characters.
pub fn get_nearby_text<E: Element>(element: Option<&E>, max_length: usize) -> String {
    let Some(element) = element else {
        return String::new();
    };

    let cleaned = element
        .text_content()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    truncate_with_ellipsis(&cleaned, max_length)
}

fn truncate_with_ellipsis(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let keep = max_length.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Whether the element or any ancestor below `body` is fixed or sticky
pub fn is_fixed_position<E: Element>(element: Option<&E>) -> bool {
    let mut current = element.cloned();
    let mut depth = 0;

    while let Some(node) = current {
        if node.is_boundary() || depth >= MAX_WALK_DEPTH {
            break;
        }
        if let Some(position) = node.computed_style("position") {
            if matches!(position.trim(), "fixed" | "sticky") {
                return true;
            }
        }
        current = node.parent();
        depth += 1;
    }

    false
}

/// Aggregate fingerprint of `element`
pub fn get_element_info<E: Element>(element: Option<&E>) -> Option<ElementInfo> {
    let node = element?;
    let tag_name = node.tag_name().to_lowercase();
    let input_type = node.input_type();
    let is_button = matches!(tag_name.as_str(), "button" | "a")
        || matches!(input_type.as_deref(), Some("button") | Some("submit"));

    Some(ElementInfo {
        selector: generate_selector(element),
        short_selector: get_short_selector(element),
        css_classes: node.class_name().map(|c| c.trim().to_string()).unwrap_or_default(),
        bounding_box: get_bounding_box(element),
        computed_styles: get_computed_styles(element),
        nearby_text: get_nearby_text(element, DEFAULT_NEARBY_TEXT_LENGTH),
        is_fixed: is_fixed_position(element),
        input_type,
        is_button,
        tag_name,
    })
}

/// Topmost element under a viewport point, searching below `root`
///
/// Embedded documents (`iframe`, `object`) are not annotatable and yield
/// `None`.
pub fn element_at_point<E: Element>(root: &E, x: f64, y: f64) -> Option<E> {
    let hit = hit_test(root, x, y, 0)?;
    let tag = hit.tag_name().to_lowercase();
    if tag == "iframe" || tag == "object" {
        return None;
    }
    Some(hit)
}

fn hit_test<E: Element>(node: &E, x: f64, y: f64, depth: usize) -> Option<E> {
    if depth >= MAX_WALK_DEPTH {
        return None;
    }

    // later siblings paint over earlier ones
    for child in node.children().iter().rev() {
        if let Some(hit) = hit_test(child, x, y, depth + 1) {
            return Some(hit);
        }
    }

    node.client_rect().contains(x, y).then(|| node.clone())
}

fn classes<E: Element>(element: &E) -> impl Iterator<Item = String> {
    element
        .class_name()
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect::<Vec<_>>()
        .into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DocumentTree, ElementHandle, Rect};

    /// body > main.content#? > ul > li x3, plus an aside with an id
    fn list_page() -> (DocumentTree, Vec<crate::dom::NodeId>) {
        let mut tree = DocumentTree::new();
        let body = tree.body();
        let main = tree.append(body, "main");
        tree.set_class(main, "content wide extra");
        let ul = tree.append(main, "ul");
        let items: Vec<_> = (0..3)
            .map(|i| {
                let li = tree.append(ul, "li");
                tree.append_text(li, &format!("Item {}", i + 1));
                li
            })
            .collect();
        tree.set_class(items[2], "item active");

        let aside = tree.append(body, "aside");
        tree.set_id(aside, "sidebar");
        let nav = tree.append(aside, "nav");
        let a1 = tree.append(nav, "a");
        let a2 = tree.append(nav, "A");

        let mut nodes = items;
        nodes.extend([main, ul, aside, nav, a1, a2]);
        (tree, nodes)
    }

    fn el(tree: &DocumentTree, id: crate::dom::NodeId) -> ElementHandle<'_> {
        tree.element(id)
    }

    #[test]
    fn test_selector_with_classes_and_index() {
        let (tree, nodes) = list_page();
        let selector = generate_selector(Some(&el(&tree, nodes[2])));

        assert_eq!(
            selector,
            "body > main.content.wide > ul > li.item.active:nth-of-type(3)"
        );
    }

    #[test]
    fn test_selector_is_deterministic() {
        let (tree, nodes) = list_page();
        let target = el(&tree, nodes[1]);

        assert_eq!(
            generate_selector(Some(&target)),
            generate_selector(Some(&target))
        );
    }

    #[test]
    fn test_selector_stops_at_id() {
        let (tree, nodes) = list_page();

        assert_eq!(generate_selector(Some(&el(&tree, nodes[5]))), "#sidebar");
        assert_eq!(
            generate_selector(Some(&el(&tree, nodes[8]))),
            "#sidebar > nav > a:nth-of-type(2)"
        );
    }

    #[test]
    fn test_deep_id_short_circuits_walk() {
        let mut tree = DocumentTree::new();
        let mut parent = tree.body();
        for tag in ["div", "section", "div", "article", "div"] {
            parent = tree.append(parent, tag);
        }
        let deep = tree.append(parent, "div");
        tree.set_id(deep, "deep");
        let p = tree.append(deep, "p");
        let span = tree.append(p, "span");

        assert_eq!(generate_selector(Some(&el(&tree, deep))), "#deep");
        assert_eq!(
            generate_selector(Some(&el(&tree, span))),
            "#deep > p > span"
        );
    }

    #[test]
    fn test_selector_escapes_id() {
        let mut tree = DocumentTree::new();
        let body = tree.body();
        let div = tree.append(body, "div");
        tree.set_id(div, "1st:item");

        assert_eq!(generate_selector(Some(&tree.element(div))), "#\\31 st\\:item");
    }

    #[test]
    fn test_selector_boundary_and_none() {
        let tree = DocumentTree::new();

        assert_eq!(generate_selector(Some(&tree.element(tree.body()))), "body");
        assert_eq!(generate_selector::<ElementHandle<'_>>(None), "");
    }

    #[test]
    fn test_selector_terminates_for_detached_element() {
        let mut tree = DocumentTree::new();
        let orphan = tree.create_detached("section");
        let child = tree.append(orphan, "p");

        assert_eq!(
            generate_selector(Some(&tree.element(child))),
            "body > section > p"
        );
    }

    #[test]
    fn test_short_selector() {
        let (tree, nodes) = list_page();

        assert_eq!(get_short_selector(Some(&el(&tree, nodes[3]))), "main.content");
        assert_eq!(get_short_selector(Some(&el(&tree, nodes[5]))), "aside#sidebar");
        assert_eq!(get_short_selector(Some(&el(&tree, nodes[4]))), "ul");
        assert_eq!(get_short_selector::<ElementHandle<'_>>(None), "");
    }

    #[test]
    fn test_computed_styles_skip_defaults() {
        let mut tree = DocumentTree::new();
        let body = tree.body();
        let div = tree.append(body, "div");
        tree.set_style(div, "display", "flex")
            .set_style(div, "position", "static")
            .set_style(div, "box-shadow", "none")
            .set_style(div, "line-height", "normal")
            .set_style(div, "z-index", "auto")
            .set_style(div, "color", "rgb(0, 0, 0)")
            .set_style(div, "cursor", "pointer");

        assert_eq!(
            get_computed_styles(Some(&tree.element(div))),
            "display: flex;\nposition: static;\ncolor: rgb(0, 0, 0);"
        );
    }

    #[test]
    fn test_bounding_box_adds_scroll() {
        let mut tree = DocumentTree::new();
        let body = tree.body();
        let div = tree.append(body, "div");
        tree.set_rect(div, Rect::new(10.4, 20.6, 99.5, 30.2))
            .set_scroll(0.0, 500.0);

        assert_eq!(
            get_bounding_box(Some(&tree.element(div))),
            Some(BoundingBox {
                x: 10,
                y: 521,
                width: 100,
                height: 30
            })
        );
        assert!(get_bounding_box::<ElementHandle<'_>>(None).is_none());
    }

    #[test]
    fn test_nearby_text_collapses_and_truncates() {
        let mut tree = DocumentTree::new();
        let body = tree.body();
        let p = tree.append(body, "p");
        tree.append_text(p, "  Hello\n\n   wide\tworld  ");
        let element = tree.element(p);

        assert_eq!(get_nearby_text(Some(&element), 100), "Hello wide world");

        let cut = get_nearby_text(Some(&element), 10);
        assert_eq!(cut, "Hello w...");
        assert_eq!(cut.chars().count(), 10);
    }

    #[test]
    fn test_fixed_position_from_ancestor() {
        let mut tree = DocumentTree::new();
        let body = tree.body();
        let header = tree.append(body, "header");
        tree.set_style(header, "position", "sticky");
        let button = tree.append(header, "button");
        let main = tree.append(body, "main");
        tree.set_style(body, "position", "fixed");

        assert!(is_fixed_position(Some(&tree.element(button))));
        assert!(!is_fixed_position(Some(&tree.element(main))));
        assert!(!is_fixed_position::<ElementHandle<'_>>(None));
    }

    #[test]
    fn test_element_info() {
        let mut tree = DocumentTree::new();
        let body = tree.body();
        let form = tree.append(body, "form");
        let input = tree.append(form, "INPUT");
        tree.set_input_type(input, "submit")
            .set_class(input, "  btn primary ");

        let info = get_element_info(Some(&tree.element(input))).unwrap();

        assert_eq!(info.tag_name, "input");
        assert_eq!(info.selector, "body > form > input.btn.primary");
        assert_eq!(info.short_selector, "input.btn");
        assert_eq!(info.css_classes, "btn primary");
        assert_eq!(info.input_type.as_deref(), Some("submit"));
        assert!(info.is_button);
        assert!(!info.is_fixed);
        assert!(get_element_info::<ElementHandle<'_>>(None).is_none());
    }

    #[test]
    fn test_element_at_point() {
        let mut tree = DocumentTree::new();
        let body = tree.body();
        tree.set_rect(body, Rect::new(0.0, 0.0, 800.0, 600.0));
        let card = tree.append(body, "div");
        tree.set_rect(card, Rect::new(100.0, 100.0, 200.0, 200.0));
        let button = tree.append(card, "button");
        tree.set_rect(button, Rect::new(150.0, 150.0, 50.0, 20.0));
        let frame = tree.append(body, "iframe");
        tree.set_rect(frame, Rect::new(400.0, 0.0, 200.0, 200.0));

        let root = tree.element(tree.root());
        let hit = |x, y| element_at_point(&root, x, y).map(|e| e.node_id());

        assert_eq!(hit(160.0, 155.0), Some(button));
        assert_eq!(hit(110.0, 110.0), Some(card));
        assert_eq!(hit(10.0, 10.0), Some(body));
        assert_eq!(hit(450.0, 50.0), None);
    }
}

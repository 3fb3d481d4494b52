//! Build a [`DocumentTree`] from well-formed (X)HTML
//!
//! Inline `style` declarations stand in for computed styles; geometry is not
//! derived from markup and stays zero until set.

use super::{DocumentTree, DomError, NodeId};

impl DocumentTree {
    /// Parse markup into a tree
    ///
    /// The first `body` element becomes the boundary. Markup without a body
    /// is mounted as the body's only child.
    pub fn from_markup(markup: &str) -> Result<Self, DomError> {
        let doc = roxmltree::Document::parse(markup)?;
        let mut tree = DocumentTree::new();
        let body = tree.body();

        let source_body = doc
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name().eq_ignore_ascii_case("body"));

        match source_body {
            Some(source) => {
                copy_attributes(&mut tree, body, source);
                copy_children(&mut tree, body, source);
            }
            None => {
                let root = doc.root_element();
                let node = tree.append(body, root.tag_name().name());
                copy_attributes(&mut tree, node, root);
                copy_children(&mut tree, node, root);
            }
        }

        Ok(tree)
    }
}

fn copy_children(tree: &mut DocumentTree, parent: NodeId, source: roxmltree::Node<'_, '_>) {
    for child in source.children() {
        if child.is_element() {
            let node = tree.append(parent, child.tag_name().name());
            copy_attributes(tree, node, child);
            copy_children(tree, node, child);
        } else if child.is_text() {
            if let Some(text) = child.text() {
                tree.append_text(parent, text);
            }
        }
    }
}

fn copy_attributes(tree: &mut DocumentTree, node: NodeId, source: roxmltree::Node<'_, '_>) {
    if let Some(id) = source.attribute("id") {
        tree.set_id(node, id);
    }
    if let Some(class) = source.attribute("class") {
        tree.set_class(node, class);
    }
    if let Some(input_type) = source.attribute("type") {
        tree.set_input_type(node, input_type);
    }
    if let Some(style) = source.attribute("style") {
        for (property, value) in parse_declarations(style) {
            tree.set_style(node, &property, &value);
        }
    }
}

/// Split `a: b; c: d` into lowercase properties and trimmed values
fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(property, value)| (property.trim().to_ascii_lowercase(), value.trim().to_string()))
        .filter(|(property, value)| !property.is_empty() && !value.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    #[test]
    fn test_parse_declarations() {
        let decls = parse_declarations("Position: fixed ; color:red;;bogus");
        assert_eq!(
            decls,
            vec![
                ("position".to_string(), "fixed".to_string()),
                ("color".to_string(), "red".to_string()),
            ]
        );
    }

    #[test]
    fn test_body_becomes_boundary() {
        let tree = DocumentTree::from_markup(
            r#"<html><head><title>t</title></head><body class="app"><main id="content"><p>Hi</p></main></body></html>"#,
        )
        .unwrap();

        let body = tree.element(tree.body());
        assert_eq!(body.class_name().as_deref(), Some("app"));

        let main = tree.find_by_id("content").unwrap();
        assert_eq!(main.parent().unwrap(), body);
        assert_eq!(main.text_content(), "Hi");
        assert!(tree.find_by_tag("title").is_empty());
    }

    #[test]
    fn test_fragment_without_body() {
        let tree =
            DocumentTree::from_markup(r#"<div style="position: sticky"><button type="submit">Go</button></div>"#)
                .unwrap();

        let divs = tree.find_by_tag("div");
        assert!(divs[0].parent().unwrap().is_boundary());
        assert_eq!(divs[0].computed_style("position").as_deref(), Some("sticky"));

        let buttons = tree.find_by_tag("button");
        let button = &buttons[0];
        assert_eq!(button.input_type().as_deref(), Some("submit"));
    }

    #[test]
    fn test_malformed_markup() {
        assert!(matches!(
            DocumentTree::from_markup("<div><p></div>"),
            Err(DomError::Parse(_))
        ));
    }
}

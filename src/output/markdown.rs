//! Markdown export
//!
//! Block layout (optional lines depend on the detail profile):
//!
//! ~~~text
//! ## Annotation #<last 3 chars of id>
//!
//! **Element:** button.primary
//! **Path:** body > main > button.primary
//! **Classes:** primary large
//! **Position:** 10px, 20px (100×40px)
//! **Nearby text:** Submit
//! **Selected text:** "Submit"
//!
//! **Computed Styles:**
//! ```css
//! display: flex;
//! ```
//!
//! **Feedback:** Make it bigger
//! **Intent:** change
//! **Severity:** suggestion
//! ~~~
//!
//! Downstream tools parse these labels; keep their order and wording stable.

use super::OutputDetail;
use crate::annotations::Annotation;

/// Returned instead of an empty document
pub const NO_ANNOTATIONS: &str = "No annotations.";

const SEPARATOR: &str = "\n\n---\n\n";

/// Backslash-escape markdown metacharacters: `*`, `_`, backtick, `[`, `]` and `\`
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '`' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render one annotation as a markdown block
pub fn format_annotation_markdown(annotation: &Annotation, detail: OutputDetail) -> String {
    let profile = detail.profile();
    let mut lines = Vec::new();

    lines.push(format!("## Annotation #{}", id_suffix(&annotation.id)));
    lines.push(String::new());

    let first_class = present(&annotation.css_classes).and_then(|c| c.split_whitespace().next());
    let element = match first_class {
        Some(class) if profile.include_classes => format!("{}.{}", annotation.element, class),
        _ => annotation.element.clone(),
    };
    lines.push(format!("**Element:** {}", escape_markdown(&element)));

    if profile.include_path && !annotation.element_path.is_empty() {
        lines.push(format!("**Path:** {}", escape_markdown(&annotation.element_path)));
    }

    if profile.include_classes {
        if let Some(classes) = present(&annotation.css_classes) {
            lines.push(format!("**Classes:** {}", escape_markdown(classes)));
        }
    }

    if profile.include_position {
        if let Some(bb) = &annotation.bounding_box {
            lines.push(format!(
                "**Position:** {}px, {}px ({}×{}px)",
                bb.x, bb.y, bb.width, bb.height
            ));
        }
    }

    if profile.include_nearby_text {
        if let Some(text) = present(&annotation.nearby_text) {
            lines.push(format!("**Nearby text:** {}", escape_markdown(text)));
        }
    }

    if let Some(text) = present(&annotation.selected_text) {
        lines.push(format!("**Selected text:** \"{}\"", escape_markdown(text)));
    }

    if profile.include_styles {
        if let Some(styles) = present(&annotation.computed_styles) {
            lines.push(String::new());
            lines.push("**Computed Styles:**".to_string());
            lines.push("```css".to_string());
            lines.push(styles.to_string());
            lines.push("```".to_string());
        }
    }

    lines.push(String::new());
    lines.push(format!("**Feedback:** {}", escape_markdown(&annotation.comment)));

    if profile.include_intent {
        if let Some(intent) = annotation.intent {
            lines.push(format!("**Intent:** {}", intent));
        }
        if let Some(severity) = annotation.severity {
            lines.push(format!("**Severity:** {}", severity));
        }
    }

    lines.join("\n")
}

/// Render every annotation, separated by horizontal rules
pub fn format_all_annotations_markdown(annotations: &[Annotation], detail: OutputDetail) -> String {
    if annotations.is_empty() {
        return NO_ANNOTATIONS.to_string();
    }

    annotations
        .iter()
        .map(|a| format_annotation_markdown(a, detail))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

fn id_suffix(id: &str) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(2)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &id[start..]
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{BoundingBox, Intent, NewAnnotation, Severity};

    fn full() -> Annotation {
        NewAnnotation {
            bounding_box: Some(BoundingBox {
                x: 10,
                y: 20,
                width: 100,
                height: 40,
            }),
            css_classes: Some("primary large".to_string()),
            computed_styles: Some("display: flex;\ncolor: red;".to_string()),
            nearby_text: Some("Submit order".to_string()),
            ..NewAnnotation::new("button", "body > main > button.primary.large", "Make it *bigger*")
        }
        .with_intent(Intent::Change)
        .with_severity(Severity::Suggestion)
        .into_annotation("ann_lo_9xk2q7abc".to_string(), 0, "https://example.com/")
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a*b_c`d[e]f\\g"), "a\\*b\\_c\\`d\\[e\\]f\\\\g");
        assert_eq!(escape_markdown("plain #text"), "plain #text");
    }

    #[test]
    fn test_id_suffix() {
        assert_eq!(id_suffix("ann_abc123"), "123");
        assert_eq!(id_suffix("ab"), "ab");
        assert_eq!(id_suffix("xéab"), "éab");
    }

    #[test]
    fn test_compact_block() {
        let md = format_annotation_markdown(&full(), OutputDetail::Compact);

        assert_eq!(
            md,
            "## Annotation #abc\n\n**Element:** button\n\n**Feedback:** Make it \\*bigger\\*"
        );
    }

    #[test]
    fn test_standard_block() {
        let md = format_annotation_markdown(&full(), OutputDetail::Standard);

        assert!(md.contains("**Element:** button.primary\n"));
        assert!(md.contains("**Path:** body > main > button.primary.large\n"));
        assert!(md.contains("**Classes:** primary large\n"));
        assert!(!md.contains("**Position:**"));
        assert!(!md.contains("**Intent:**"));
    }

    #[test]
    fn test_forensic_block() {
        let md = format_annotation_markdown(&full(), OutputDetail::Forensic);

        let expected = [
            "## Annotation #abc",
            "",
            "**Element:** button.primary",
            "**Path:** body > main > button.primary.large",
            "**Classes:** primary large",
            "**Position:** 10px, 20px (100×40px)",
            "**Nearby text:** Submit order",
            "",
            "**Computed Styles:**",
            "```css",
            "display: flex;",
            "color: red;",
            "```",
            "",
            "**Feedback:** Make it \\*bigger\\*",
            "**Intent:** change",
            "**Severity:** suggestion",
        ]
        .join("\n");
        assert_eq!(md, expected);
    }

    #[test]
    fn test_detailed_omits_styles_only() {
        let md = format_annotation_markdown(&full(), OutputDetail::Detailed);

        assert!(md.contains("**Position:**"));
        assert!(md.contains("**Nearby text:**"));
        assert!(md.contains("**Severity:** suggestion"));
        assert!(!md.contains("```css"));
    }

    #[test]
    fn test_selected_text_always_shown() {
        let annotation = NewAnnotation::new("p", "body > p", "Typo")
            .with_selected_text("teh [cat]")
            .into_annotation("ann_1_xyz".to_string(), 0, "u");

        let md = format_annotation_markdown(&annotation, OutputDetail::Compact);
        assert!(md.contains("**Selected text:** \"teh \\[cat\\]\""));
    }

    #[test]
    fn test_all_annotations() {
        let first = full();
        let second = NewAnnotation::new("p", "body > p", "Second")
            .into_annotation("ann_2_zzz".to_string(), 0, "u");

        let md = format_all_annotations_markdown(&[first, second], OutputDetail::Compact);
        let blocks: Vec<&str> = md.split("\n\n---\n\n").collect();

        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].starts_with("## Annotation #zzz"));
    }

    #[test]
    fn test_empty_sentinel() {
        for detail in OutputDetail::ALL {
            assert_eq!(format_all_annotations_markdown(&[], detail), NO_ANNOTATIONS);
        }
    }
}

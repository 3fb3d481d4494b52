//! Annotation records
//!
//! The serialized shape is the persisted layout: camelCase keys, optional
//! fields omitted when absent, `timestamp` in Unix milliseconds.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::fingerprint::ElementInfo;

/// A unit of feedback attached to a document element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Store-assigned identifier, never changes
    pub id: String,
    /// Creation time in Unix milliseconds, never changes
    pub timestamp: i64,
    /// Document context the annotation belongs to
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Operator feedback
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    /// Long-form locator of the target element
    #[serde(default, deserialize_with = "null_as_default")]
    pub element_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    /// Tag of the target element
    #[serde(default, deserialize_with = "null_as_default")]
    pub element: String,
    /// Marker position as a percentage of viewport width (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Marker position in px from document top
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_classes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_styles: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearby_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fixed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_multi_select: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Review status
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
    /// RFC 3339 time the annotation was resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    /// Fields written by other producers, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Page-absolute element geometry in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// What the operator wants done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Fix,
    Change,
    Question,
    Approve,
}

/// How urgent the feedback is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Blocking,
    Important,
    Suggestion,
}

/// Review lifecycle of an annotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Acknowledged,
    Resolved,
    Dismissed,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fix => write!(f, "fix"),
            Self::Change => write!(f, "change"),
            Self::Question => write!(f, "question"),
            Self::Approve => write!(f, "approve"),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blocking => write!(f, "blocking"),
            Self::Important => write!(f, "important"),
            Self::Suggestion => write!(f, "suggestion"),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Acknowledged => write!(f, "acknowledged"),
            Self::Resolved => write!(f, "resolved"),
            Self::Dismissed => write!(f, "dismissed"),
        }
    }
}

/// Caller-supplied fields for a new annotation
///
/// `url` and `status` override the store defaults when set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewAnnotation {
    pub comment: String,
    pub element_path: String,
    pub full_path: Option<String>,
    pub element: String,
    pub url: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub bounding_box: Option<BoundingBox>,
    pub css_classes: Option<String>,
    pub computed_styles: Option<String>,
    pub nearby_text: Option<String>,
    pub selected_text: Option<String>,
    pub is_fixed: Option<bool>,
    pub is_multi_select: Option<bool>,
    pub intent: Option<Intent>,
    pub severity: Option<Severity>,
    pub status: Option<Status>,
}

impl NewAnnotation {
    /// Create fields for a comment on an element
    pub fn new(element: &str, element_path: &str, comment: &str) -> Self {
        Self {
            comment: comment.to_string(),
            element_path: element_path.to_string(),
            element: element.to_string(),
            ..Default::default()
        }
    }

    /// Merge a fingerprint with operator text
    ///
    /// Empty class, style and text captures are left unset.
    pub fn from_element_info(info: &ElementInfo, comment: &str) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        Self {
            comment: comment.to_string(),
            element_path: info.selector.clone(),
            full_path: Some(info.selector.clone()),
            element: info.tag_name.clone(),
            bounding_box: info.bounding_box,
            css_classes: non_empty(&info.css_classes),
            computed_styles: non_empty(&info.computed_styles),
            nearby_text: non_empty(&info.nearby_text),
            is_fixed: Some(info.is_fixed),
            ..Default::default()
        }
    }

    /// Set the intent
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Set the selected text
    pub fn with_selected_text(mut self, text: &str) -> Self {
        self.selected_text = Some(text.to_string());
        self
    }

    /// Override the document context
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    /// Build the stored record
    pub(crate) fn into_annotation(self, id: String, timestamp: i64, url: &str) -> Annotation {
        Annotation {
            id,
            timestamp,
            url: self.url.unwrap_or_else(|| url.to_string()),
            comment: self.comment,
            element_path: self.element_path,
            full_path: self.full_path,
            element: self.element,
            x: self.x,
            y: self.y,
            bounding_box: self.bounding_box,
            css_classes: self.css_classes,
            computed_styles: self.computed_styles,
            nearby_text: self.nearby_text,
            selected_text: self.selected_text,
            is_fixed: self.is_fixed,
            is_multi_select: self.is_multi_select,
            intent: self.intent,
            severity: self.severity,
            status: self.status.unwrap_or_default(),
            resolved_at: None,
            resolved_by: None,
            extra: Map::new(),
        }
    }
}

/// Shallow field replacement for an existing annotation
///
/// Every `Some` field replaces the stored value wholesale; `id` and
/// `timestamp` are not patchable. A `None` field leaves the stored value
/// untouched, so a patch cannot clear an optional field once it is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationPatch {
    pub url: Option<String>,
    pub comment: Option<String>,
    pub element_path: Option<String>,
    pub full_path: Option<String>,
    pub element: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub bounding_box: Option<BoundingBox>,
    pub css_classes: Option<String>,
    pub computed_styles: Option<String>,
    pub nearby_text: Option<String>,
    pub selected_text: Option<String>,
    pub is_fixed: Option<bool>,
    pub is_multi_select: Option<bool>,
    pub intent: Option<Intent>,
    pub severity: Option<Severity>,
    pub status: Option<Status>,
    pub resolved_at: Option<String>,
    pub resolved_by: Option<String>,
}

impl AnnotationPatch {
    /// Patch that only changes the status
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Patch that only changes the comment
    pub fn comment(comment: &str) -> Self {
        Self {
            comment: Some(comment.to_string()),
            ..Default::default()
        }
    }

    /// Apply onto a copy of `annotation`
    pub fn apply(&self, annotation: &Annotation) -> Annotation {
        let mut next = annotation.clone();

        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = &self.$field {
                    next.$field = value.clone();
                })*
            };
        }
        macro_rules! merge_opt {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = &self.$field {
                    next.$field = Some(value.clone());
                })*
            };
        }

        merge!(url, comment, element_path, element, status);
        merge_opt!(
            full_path,
            x,
            y,
            bounding_box,
            css_classes,
            computed_styles,
            nearby_text,
            selected_text,
            is_fixed,
            is_multi_select,
            intent,
            severity,
            resolved_at,
            resolved_by,
        );

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Annotation {
        NewAnnotation::new("button", "body > main > button", "Make this bigger")
            .with_intent(Intent::Change)
            .into_annotation("ann_1_abc".to_string(), 1_700_000_000_000, "https://example.com/")
    }

    #[test]
    fn test_new_annotation_defaults() {
        let annotation = sample();

        assert_eq!(annotation.status, Status::Pending);
        assert_eq!(annotation.url, "https://example.com/");
        assert_eq!(annotation.intent, Some(Intent::Change));
        assert!(annotation.resolved_at.is_none());
    }

    #[test]
    fn test_supplied_status_and_url_win() {
        let annotation = NewAnnotation {
            status: Some(Status::Acknowledged),
            ..NewAnnotation::new("p", "body > p", "typo")
        }
        .with_url("https://other.test/")
        .into_annotation("id".to_string(), 0, "https://example.com/");

        assert_eq!(annotation.status, Status::Acknowledged);
        assert_eq!(annotation.url, "https://other.test/");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["elementPath"], "body > main > button");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["intent"], "change");
        assert!(json.get("boundingBox").is_none());
        assert!(json.get("severity").is_none());
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let raw = r#"{"id":"ann_x","timestamp":1,"comment":"hi","element":"div","elementPath":"body > div","customTag":"qa"}"#;
        let annotation: Annotation = serde_json::from_str(raw).unwrap();

        assert_eq!(annotation.status, Status::Pending);
        assert_eq!(annotation.extra["customTag"], "qa");

        let back = serde_json::to_value(&annotation).unwrap();
        assert_eq!(back["customTag"], "qa");
    }

    #[test]
    fn test_patch_is_shallow() {
        let mut original = sample();
        original.bounding_box = Some(BoundingBox {
            x: 1,
            y: 2,
            width: 3,
            height: 4,
        });

        let patch = AnnotationPatch {
            bounding_box: Some(BoundingBox {
                x: 10,
                y: 20,
                width: 0,
                height: 0,
            }),
            ..AnnotationPatch::status(Status::Resolved)
        };
        let next = patch.apply(&original);

        assert_eq!(next.status, Status::Resolved);
        assert_eq!(
            next.bounding_box,
            Some(BoundingBox {
                x: 10,
                y: 20,
                width: 0,
                height: 0
            })
        );
        assert_eq!(next.id, original.id);
        assert_eq!(next.comment, original.comment);
        assert_eq!(next.intent, original.intent);
    }

    #[test]
    fn test_patch_cannot_clear_optional_fields() {
        let original = sample();

        let next = AnnotationPatch {
            intent: None,
            ..AnnotationPatch::comment("Smaller, actually")
        }
        .apply(&original);

        assert_eq!(next.comment, "Smaller, actually");
        assert_eq!(next.intent, Some(Intent::Change));
    }

    #[test]
    fn test_null_required_text_reads_as_empty() {
        let raw = r#"{"id":"ann_n","timestamp":1,"comment":null,"element":null,"elementPath":"body","status":null}"#;
        let annotation: Annotation = serde_json::from_str(raw).unwrap();

        assert_eq!(annotation.comment, "");
        assert_eq!(annotation.element, "");
        assert_eq!(annotation.status, Status::Pending);
        assert!(annotation.extra.is_empty());
    }
}

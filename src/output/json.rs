//! JSON export
//!
//! Every stored field is emitted regardless of detail level.

use crate::annotations::Annotation;
use crate::error::FormatError;

/// Pretty-printed JSON object for one annotation
pub fn annotation_to_json(annotation: &Annotation) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(annotation)?)
}

/// Pretty-printed JSON array of annotations
pub fn annotations_to_json(annotations: &[Annotation]) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(annotations)?)
}

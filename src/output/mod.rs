//! Annotation export
//!
//! Renders a collection of annotations for a human reviewer or a downstream
//! agent.
//!
//! # Formats
//!
//! - **markdown**: one block per annotation, verbosity chosen by [`OutputDetail`]
//! - **json**: the stored records verbatim, pretty-printed; detail is ignored
//!
//! # Example
//!
//! ```rust,ignore
//! use page_annotations::output::{generate_output, OutputDetail, OutputFormat};
//!
//! let report = generate_output(&store.get_all(), OutputFormat::Markdown, OutputDetail::Forensic)?;
//! ```

mod json;
mod markdown;

pub use json::{annotation_to_json, annotations_to_json};
pub use markdown::{
    escape_markdown, format_all_annotations_markdown, format_annotation_markdown,
    NO_ANNOTATIONS,
};

use serde::{Deserialize, Serialize};

use crate::annotations::Annotation;
use crate::error::FormatError;

/// Document type produced by [`generate_output`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Markdown,
}

/// Markdown verbosity, from least to most informative
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputDetail {
    Compact,
    #[default]
    Standard,
    Detailed,
    Forensic,
}

/// Which optional lines a markdown block carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailProfile {
    pub include_classes: bool,
    pub include_path: bool,
    pub include_position: bool,
    pub include_styles: bool,
    pub include_nearby_text: bool,
    pub include_intent: bool,
}

impl OutputDetail {
    /// Every level, least informative first
    pub const ALL: [OutputDetail; 4] = [
        OutputDetail::Compact,
        OutputDetail::Standard,
        OutputDetail::Detailed,
        OutputDetail::Forensic,
    ];

    /// Inclusion flags for this level
    pub const fn profile(self) -> DetailProfile {
        match self {
            Self::Compact => DetailProfile {
                include_classes: false,
                include_path: false,
                include_position: false,
                include_styles: false,
                include_nearby_text: false,
                include_intent: false,
            },
            Self::Standard => DetailProfile {
                include_classes: true,
                include_path: true,
                include_position: false,
                include_styles: false,
                include_nearby_text: false,
                include_intent: false,
            },
            Self::Detailed => DetailProfile {
                include_classes: true,
                include_path: true,
                include_position: true,
                include_styles: false,
                include_nearby_text: true,
                include_intent: true,
            },
            Self::Forensic => DetailProfile {
                include_classes: true,
                include_path: true,
                include_position: true,
                include_styles: true,
                include_nearby_text: true,
                include_intent: true,
            },
        }
    }

    /// Parse a level name, falling back to `standard` for unknown names
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Markdown => write!(f, "markdown"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Standard => write!(f, "standard"),
            Self::Detailed => write!(f, "detailed"),
            Self::Forensic => write!(f, "forensic"),
        }
    }
}

impl std::str::FromStr for OutputDetail {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "standard" => Ok(Self::Standard),
            "detailed" => Ok(Self::Detailed),
            "forensic" => Ok(Self::Forensic),
            _ => Err(FormatError::UnknownDetail(s.to_string())),
        }
    }
}

/// Render `annotations` as `format`; `detail` only affects markdown
pub fn generate_output(
    annotations: &[Annotation],
    format: OutputFormat,
    detail: OutputDetail,
) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => annotations_to_json(annotations),
        OutputFormat::Markdown => Ok(format_all_annotations_markdown(annotations, detail)),
    }
}

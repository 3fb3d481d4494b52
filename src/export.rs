//! Report export
//!
//! Renders the file-backed store described by [`Settings`] the same way the
//! `annotations-export` binary does.

use std::env;

use crate::annotations::AnnotationStore;
use crate::config::Settings;
use crate::error::Result;
use crate::output::generate_output;
use crate::storage::FileSlot;

/// Build the report for the current `ANNOTATIONS_*` environment
///
/// `ANNOTATIONS_URL`, when set, limits the report to one document.
pub fn export_from_env() -> Result<String> {
    let settings = Settings::from_env()?;
    let url = env::var("ANNOTATIONS_URL").ok().filter(|url| !url.is_empty());

    render_report(&settings, url.as_deref())
}

/// Render the annotations persisted under `settings.storage_dir`
pub fn render_report(settings: &Settings, url: Option<&str>) -> Result<String> {
    tracing::info!("Reading annotations from {}", settings.storage_dir.display());

    let slot = FileSlot::new(settings.storage_dir.clone());
    let store = AnnotationStore::try_open_with_key(
        slot,
        &settings.storage_key,
        url.unwrap_or_default(),
    )?;

    let annotations = match url {
        Some(url) => store.get_by_url(url),
        None => store.get_all().to_vec(),
    };
    tracing::info!(
        "Exporting {} annotation(s) as {} ({})",
        annotations.len(),
        settings.output_format,
        settings.output_detail
    );

    Ok(generate_output(
        &annotations,
        settings.output_format,
        settings.output_detail,
    )?)
}

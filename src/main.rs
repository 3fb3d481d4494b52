//! Annotations export
//!
//! Reads the persisted annotation store and prints a report to stdout.
//! Set `ANNOTATIONS_URL` to limit the report to one document.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use page_annotations::export::export_from_env;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "page_annotations=info,annotations_export=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let report = export_from_env().context("failed to export annotations")?;
    println!("{}", report);

    Ok(())
}

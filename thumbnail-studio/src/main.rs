//! # Thumbnail Studio
//!
//! Replays an edit script and exports the thumbnail.

use clap::Parser;
use thumbnail_studio::{run, CliArgs, StudioConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,thumbnail_core=debug,thumbnail_renderer=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,thumbnail_core=debug,thumbnail_renderer=debug")
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = StudioConfig::from(CliArgs::parse());
    tracing::info!(
        output = %config.output.display(),
        container_width = config.container_width,
        "Starting Thumbnail Studio"
    );

    let summary = run(&config)?;
    tracing::info!(
        png = %summary.png.display(),
        applied = summary.replay.applied,
        refused = summary.replay.refused.len(),
        preview_scale = summary.preview_scale,
        "Thumbnail written"
    );
    Ok(())
}

//! # Thumbnail Studio
//!
//! Command-line host for the thumbnail composer. It stands in for the editing
//! widgets: an edit script is replayed against the document store, the canvas
//! surface is mounted at the requested container width, and the thumbnail is
//! exported as a 1280×670 PNG.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p thumbnail-studio -- --script edits.json --output thumbnail.png
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `StudioConfig` - Script, output paths and preview settings
//! - `ScriptRunner` - Replays update messages, resolving `$alias` ids
//! - `run` - Replay, mount, export

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod script;

pub use script::{ReplayReport, ScriptRunner};

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use thumbnail_core::{DocumentStore, Resolution};
use thumbnail_renderer::{CanvasSurface, ChromeOptions, ExportConfig, ExportPipeline, ResvgCapture};

/// Command-line arguments for thumbnail-studio.
#[derive(Debug, Clone, Parser)]
#[command(name = "thumbnail-studio")]
#[command(about = "Compose a 1280x670 thumbnail from an edit script")]
#[command(version)]
pub struct CliArgs {
    /// JSON edit script to replay before exporting
    #[arg(long, env = "THUMBNAIL_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Where to write the PNG
    #[arg(long, env = "THUMBNAIL_OUTPUT", default_value = "thumbnail.png")]
    pub output: PathBuf,

    /// Width of the preview container in pixels
    #[arg(long, default_value = "1280")]
    pub container_width: f32,

    /// Seed for mesh point randomization
    #[arg(long, env = "THUMBNAIL_SEED")]
    pub seed: Option<u64>,

    /// Also write the preview SVG next to the PNG
    #[arg(long)]
    pub svg: bool,

    /// Draw the zone grid in the preview SVG
    #[arg(long)]
    pub grid: bool,
}

/// Studio configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Edit script to replay.
    pub script: Option<PathBuf>,
    /// PNG output path.
    pub output: PathBuf,
    /// Preview container width.
    pub container_width: f32,
    /// Mesh randomizer seed.
    pub seed: Option<u64>,
    /// Whether to write the preview SVG.
    pub write_svg: bool,
    /// Chrome drawn in the preview SVG.
    pub chrome: ChromeOptions,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: None,
            output: PathBuf::from(thumbnail_renderer::export::DEFAULT_FILE_NAME),
            container_width: Resolution::CANONICAL.width_f32(),
            seed: None,
            write_svg: false,
            chrome: ChromeOptions::none(),
        }
    }

    /// Path of the preview SVG written alongside the PNG.
    #[must_use]
    pub fn svg_path(&self) -> PathBuf {
        self.output.with_extension("svg")
    }
}

impl From<CliArgs> for StudioConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            script: args.script,
            output: args.output,
            container_width: args.container_width,
            seed: args.seed,
            write_svg: args.svg,
            chrome: ChromeOptions {
                grid: args.grid,
                mesh_handles: args.grid,
            },
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Script replay outcome.
    pub replay: ReplayReport,
    /// Preview scale the surface settled on.
    pub preview_scale: f32,
    /// Written PNG.
    pub png: PathBuf,
    /// Written SVG, if requested.
    pub svg: Option<PathBuf>,
}

/// Replay the script, mount the surface and export.
///
/// # Errors
///
/// Returns an error if the script cannot be read or is not a JSON array, or if
/// the export fails. Individual refused edits are only logged.
pub fn run(config: &StudioConfig) -> anyhow::Result<RunSummary> {
    run_with(config, ResvgCapture::new())
}

/// [`run`] with an explicit capture backend.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(config: &StudioConfig, capture: ResvgCapture) -> anyhow::Result<RunSummary> {
    let mut store = config
        .seed
        .map_or_else(DocumentStore::new, DocumentStore::with_seed);

    let replay = match &config.script {
        Some(path) => replay_file(&mut store, path)?,
        None => ReplayReport::default(),
    };

    let mut surface = CanvasSurface::new(store.state().resolution(), config.chrome);
    surface.mount();
    let preview_scale = surface.resize(config.container_width);
    tracing::debug!(preview_scale, "surface mounted");

    let file_name = config
        .output
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(thumbnail_renderer::export::DEFAULT_FILE_NAME)
        .to_string();
    let pipeline = ExportPipeline::new(
        ExportConfig {
            file_name,
            ..ExportConfig::default()
        },
        capture,
    );
    let snapshot = store.snapshot();
    pipeline
        .export_to_path(&surface, &snapshot, &config.output)
        .with_context(|| format!("exporting to {}", config.output.display()))?;

    let svg = if config.write_svg {
        let path = config.svg_path();
        std::fs::write(&path, surface.preview_svg(&snapshot))
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "preview SVG written");
        Some(path)
    } else {
        None
    };

    Ok(RunSummary {
        replay,
        preview_scale,
        png: config.output.clone(),
        svg,
    })
}

fn replay_file(store: &mut DocumentStore, path: &Path) -> anyhow::Result<ReplayReport> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    let report = ScriptRunner::new()
        .replay(store, &json)
        .with_context(|| format!("parsing script {}", path.display()))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StudioConfig::default();
        assert_eq!(config.output, PathBuf::from("thumbnail.png"));
        assert!((config.container_width - 1280.0).abs() < f32::EPSILON);
        assert!(!config.write_svg);
        assert_eq!(config.chrome, ChromeOptions::none());
    }

    #[test]
    fn test_cli_args_into_config() {
        let args = CliArgs::parse_from([
            "thumbnail-studio",
            "--output",
            "out/cover.png",
            "--container-width",
            "640",
            "--seed",
            "42",
            "--svg",
            "--grid",
        ]);
        let config = StudioConfig::from(args);
        assert_eq!(config.output, PathBuf::from("out/cover.png"));
        assert_eq!(config.svg_path(), PathBuf::from("out/cover.svg"));
        assert_eq!(config.seed, Some(42));
        assert!(config.write_svg);
        assert!(config.chrome.grid);
        assert!((config.container_width - 640.0).abs() < f32::EPSILON);
    }
}

//! The export pipeline.
//!
//! Renders the current document at the canonical resolution and unit scale,
//! drops editor chrome, and encodes the result as PNG. The preview scale of the
//! surface is never consulted. One export runs at a time; a second request while
//! one is in flight is refused.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use image::{ImageEncoder, RgbaImage};
use thumbnail_core::{ExportTransform, Resolution, ThumbnailState};

use crate::capture::{Capture, ResvgCapture};
use crate::error::{RenderError, RenderResult};
use crate::scene::{ChromeOptions, RenderTree};
use crate::surface::CanvasSurface;
use crate::svg::export_svg;

/// Default file name of an exported thumbnail.
pub const DEFAULT_FILE_NAME: &str = "thumbnail.png";

/// Configuration for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Output file name.
    pub file_name: String,
    /// Output size; always the canonical resolution at unit scale.
    pub transform: ExportTransform,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            transform: ExportTransform::canonical(Resolution::CANONICAL),
        }
    }
}

/// A finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// PNG bytes.
    pub png: Vec<u8>,
}

/// Marks an export as in flight until dropped.
#[derive(Debug)]
pub struct ExportGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Produces PNG exports through a [`Capture`] primitive.
#[derive(Debug)]
pub struct ExportPipeline<C = ResvgCapture> {
    config: ExportConfig,
    capture: C,
    in_flight: AtomicBool,
}

impl Default for ExportPipeline<ResvgCapture> {
    fn default() -> Self {
        Self::new(ExportConfig::default(), ResvgCapture::new())
    }
}

impl<C: Capture> ExportPipeline<C> {
    /// Create a pipeline with the given configuration and capture primitive.
    #[must_use]
    pub fn new(config: ExportConfig, capture: C) -> Self {
        Self {
            config,
            capture,
            in_flight: AtomicBool::new(false),
        }
    }

    /// The pipeline configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Whether an export is running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the pipeline for one export.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ExportInProgress`] if another export holds it.
    pub fn begin(&self) -> RenderResult<ExportGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RenderError::ExportInProgress)?;
        Ok(ExportGuard {
            flag: &self.in_flight,
        })
    }

    /// Export `state` as a PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ExportUnavailable`] if `surface` is not mounted,
    /// [`RenderError::ExportInProgress`] if another export is running,
    /// [`RenderError::Rasterization`] if capture fails, or
    /// [`RenderError::Encode`] if PNG encoding fails.
    pub fn export(
        &self,
        surface: &CanvasSurface,
        state: &ThumbnailState,
    ) -> RenderResult<ExportArtifact> {
        if !surface.is_mounted() {
            let err = RenderError::ExportUnavailable("canvas surface is not mounted".to_string());
            tracing::warn!("{err}");
            return Err(err);
        }
        let _guard = self.begin()?;
        let transform = self.config.transform;
        tracing::info!(
            width = transform.width,
            height = transform.height,
            preview_scale = surface.scale(),
            "exporting thumbnail"
        );

        let tree = RenderTree::build(state, &surface.chrome());
        let image = self.capture.capture(&tree, transform).map_err(|e| {
            let err = if matches!(e, RenderError::Rasterization(_)) {
                e
            } else {
                RenderError::Rasterization(e.to_string())
            };
            tracing::warn!("{err}");
            err
        })?;

        if image.dimensions() != (transform.width, transform.height) {
            return Err(RenderError::Rasterization(format!(
                "capture produced {}x{}, expected {}x{}",
                image.width(),
                image.height(),
                transform.width,
                transform.height
            )));
        }

        let png = encode_png(&image)?;
        tracing::info!(bytes = png.len(), file = %self.config.file_name, "export complete");
        Ok(ExportArtifact {
            file_name: self.config.file_name.clone(),
            width: transform.width,
            height: transform.height,
            png,
        })
    }

    /// Export and write the PNG into `dir` under the configured file name.
    ///
    /// # Errors
    ///
    /// Returns any error of [`export`](Self::export), or [`RenderError::Io`] if
    /// the file cannot be written.
    pub fn export_to_dir(
        &self,
        surface: &CanvasSurface,
        state: &ThumbnailState,
        dir: &Path,
    ) -> RenderResult<PathBuf> {
        let path = dir.join(&self.config.file_name);
        self.export_to_path(surface, state, &path)?;
        Ok(path)
    }

    /// Export and write the PNG to `path`.
    ///
    /// # Errors
    ///
    /// Returns any error of [`export`](Self::export), or [`RenderError::Io`] if
    /// the file cannot be written.
    pub fn export_to_path(
        &self,
        surface: &CanvasSurface,
        state: &ThumbnailState,
        path: &Path,
    ) -> RenderResult<ExportArtifact> {
        let artifact = self.export(surface, state)?;
        std::fs::write(path, &artifact.png)?;
        tracing::info!(path = %path.display(), "thumbnail written");
        Ok(artifact)
    }

    /// The SVG the export would rasterize, without chrome.
    #[must_use]
    pub fn export_svg(&self, state: &ThumbnailState) -> String {
        let tree = RenderTree::build(state, &ChromeOptions::none());
        export_svg(&tree, self.config.transform)
    }
}

/// Encode an RGBA image as PNG.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] if encoding fails.
pub fn encode_png(image: &RgbaImage) -> RenderResult<Vec<u8>> {
    let mut buf = std::io::Cursor::new(Vec::new());
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SolidCapture;

    impl Capture for SolidCapture {
        fn capture(
            &self,
            _tree: &RenderTree,
            transform: ExportTransform,
        ) -> RenderResult<RgbaImage> {
            Ok(RgbaImage::from_pixel(
                transform.width,
                transform.height,
                image::Rgba([1, 2, 3, 255]),
            ))
        }
    }

    fn mounted() -> CanvasSurface {
        let mut surface = CanvasSurface::default();
        surface.mount();
        surface
    }

    #[test]
    fn test_default_config() {
        let config = ExportConfig::default();
        assert_eq!(config.file_name, "thumbnail.png");
        assert_eq!((config.transform.width, config.transform.height), (1280, 670));
    }

    #[test]
    fn test_unmounted_surface_is_refused() {
        let pipeline = ExportPipeline::new(ExportConfig::default(), SolidCapture);
        let result = pipeline.export(&CanvasSurface::default(), &ThumbnailState::default());
        assert!(matches!(result, Err(RenderError::ExportUnavailable(_))));
    }

    #[test]
    fn test_guard_blocks_second_export() {
        let pipeline = ExportPipeline::new(ExportConfig::default(), SolidCapture);
        let guard = pipeline.begin().expect("first");
        assert!(pipeline.is_busy());
        let result = pipeline.export(&mounted(), &ThumbnailState::default());
        assert!(matches!(result, Err(RenderError::ExportInProgress)));
        drop(guard);
        assert!(!pipeline.is_busy());
        assert!(pipeline.export(&mounted(), &ThumbnailState::default()).is_ok());
    }

    #[test]
    fn test_export_encodes_png() {
        let pipeline = ExportPipeline::new(ExportConfig::default(), SolidCapture);
        let artifact = pipeline
            .export(&mounted(), &ThumbnailState::default())
            .expect("export");
        assert_eq!(&artifact.png[0..4], &[137, 80, 78, 71]);
        assert_eq!((artifact.width, artifact.height), (1280, 670));
        assert!(!pipeline.is_busy());
    }

    #[test]
    fn test_export_svg_has_no_chrome() {
        let pipeline = ExportPipeline::new(ExportConfig::default(), SolidCapture);
        let svg = pipeline.export_svg(&ThumbnailState::default());
        assert!(!svg.contains("stroke-dasharray"));
    }
}

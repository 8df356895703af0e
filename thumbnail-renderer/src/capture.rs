//! The capture primitive: rasterize a render tree at a fixed size.

use std::sync::Arc;

use image::RgbaImage;
use thumbnail_core::ExportTransform;

use crate::error::{RenderError, RenderResult};
use crate::scene::RenderTree;
use crate::svg::export_svg;

/// Rasterizes the exportable part of a render tree.
///
/// Implementations must skip every node tagged ignore-on-export and produce an
/// image of exactly `transform.width × transform.height` pixels.
pub trait Capture {
    /// Capture `tree` at `transform`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Rasterization`] if the raster cannot be produced.
    fn capture(&self, tree: &RenderTree, transform: ExportTransform) -> RenderResult<RgbaImage>;
}

/// Capture backed by resvg / tiny-skia.
#[derive(Clone)]
pub struct ResvgCapture {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for ResvgCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResvgCapture")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl Default for ResvgCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl ResvgCapture {
    /// Create a capture with the system fonts loaded.
    #[must_use]
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::debug!(faces = fontdb.len(), "loaded system fonts");
        Self::with_fontdb(fontdb)
    }

    /// Create a capture using a prepared font database.
    #[must_use]
    pub fn with_fontdb(fontdb: usvg::fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Rasterize an SVG document into a pixmap of exactly `width × height`.
    fn rasterize_svg(&self, svg: &str, width: u32, height: u32) -> RenderResult<tiny_skia::Pixmap> {
        let opt = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(svg, &opt)
            .map_err(|e| RenderError::Rasterization(format!("SVG parsing failed: {e}")))?;

        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| RenderError::Rasterization("Failed to create pixmap".to_string()))?;

        #[allow(clippy::cast_precision_loss)]
        let transform = tiny_skia::Transform::from_scale(
            width as f32 / tree.size().width(),
            height as f32 / tree.size().height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

impl Capture for ResvgCapture {
    fn capture(&self, tree: &RenderTree, transform: ExportTransform) -> RenderResult<RgbaImage> {
        let svg = export_svg(tree, transform);
        let pixmap = self.rasterize_svg(&svg, transform.width, transform.height)?;
        pixmap_to_image(&pixmap)
    }
}

/// Convert a premultiplied pixmap into a straight-alpha RGBA image.
fn pixmap_to_image(pixmap: &tiny_skia::Pixmap) -> RenderResult<RgbaImage> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| RenderError::Rasterization("pixel buffer size mismatch".to_string()))
}

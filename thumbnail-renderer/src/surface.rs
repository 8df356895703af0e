//! The on-screen canvas surface.
//!
//! A surface is mounted by the host once its viewport exists. It owns the live
//! preview scale; exports read the document, never this scale.

use thumbnail_core::{BoundingBox, Resolution, ScaleResolver, ThumbnailState};

use crate::scene::{ChromeOptions, RenderTree};
use crate::svg::preview_svg;

/// Host-side canvas surface.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    resolution: Resolution,
    scale: ScaleResolver,
    chrome: ChromeOptions,
    mounted: bool,
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new(Resolution::CANONICAL, ChromeOptions::default())
    }
}

impl CanvasSurface {
    /// Create an unmounted surface.
    #[must_use]
    pub fn new(resolution: Resolution, chrome: ChromeOptions) -> Self {
        Self {
            resolution,
            scale: ScaleResolver::new(resolution),
            chrome,
            mounted: false,
        }
    }

    /// Mark the surface as available for capture.
    pub fn mount(&mut self) {
        if !self.mounted {
            tracing::debug!("canvas surface mounted");
        }
        self.mounted = true;
    }

    /// Mark the surface as gone.
    pub fn unmount(&mut self) {
        if self.mounted {
            tracing::debug!("canvas surface unmounted");
        }
        self.mounted = false;
    }

    /// Whether the surface can be captured.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// React to a new viewport width; returns the preview scale.
    pub fn resize(&mut self, container_width: f32) -> f32 {
        self.scale.resize(container_width)
    }

    /// Current preview scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale.scale()
    }

    /// Chrome drawn by the preview.
    #[must_use]
    pub fn chrome(&self) -> ChromeOptions {
        self.chrome
    }

    /// On-screen box of the canvas when its top-left corner sits at `(left, top)`.
    #[must_use]
    pub fn bounding_box(&self, left: f32, top: f32) -> BoundingBox {
        let scale = self.scale();
        BoundingBox::new(
            left,
            top,
            self.resolution.width_f32() * scale,
            self.resolution.height_f32() * scale,
        )
    }

    /// Render tree for the preview, chrome included.
    #[must_use]
    pub fn render_tree(&self, state: &ThumbnailState) -> RenderTree {
        RenderTree::build(state, &self.chrome)
    }

    /// Preview SVG at the current scale.
    #[must_use]
    pub fn preview_svg(&self, state: &ThumbnailState) -> String {
        preview_svg(&self.render_tree(state), self.scale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_unmounted() {
        let mut surface = CanvasSurface::default();
        assert!(!surface.is_mounted());
        surface.mount();
        assert!(surface.is_mounted());
        surface.unmount();
        assert!(!surface.is_mounted());
    }

    #[test]
    fn test_bounding_box_follows_scale() {
        let mut surface = CanvasSurface::default();
        surface.resize(640.0);
        let bbox = surface.bounding_box(10.0, 20.0);
        assert!((bbox.width - 640.0).abs() < f32::EPSILON);
        assert!((bbox.height - 335.0).abs() < f32::EPSILON);
        assert!((bbox.left - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_preview_svg_uses_scale() {
        let mut surface = CanvasSurface::default();
        surface.resize(960.0);
        let svg = surface.preview_svg(&ThumbnailState::default());
        assert!(svg.contains("width=\"960\""));
        assert!(svg.contains("stroke-dasharray"));
    }
}

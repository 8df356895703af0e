//! Canvas geometry: rectangles, live preview scale and the fixed export transform.

use serde::{Deserialize, Serialize};

use crate::Resolution;

/// An axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Check if a point is within this rectangle (edges inclusive).
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Maps the width of the host viewport to a preview scale, capped at 1:1.
///
/// The scale only affects the on-screen preview; exports use [`ExportTransform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleResolver {
    native_width: f32,
    container_width: Option<f32>,
    scale: f32,
}

impl ScaleResolver {
    /// Create a resolver for a composition of the given resolution.
    #[must_use]
    pub fn new(resolution: Resolution) -> Self {
        Self {
            native_width: resolution.width_f32(),
            container_width: None,
            scale: 1.0,
        }
    }

    /// Compute `min(container_width / native_width, 1)` without touching state.
    ///
    /// Non-finite or negative widths resolve to a zero scale.
    #[must_use]
    pub fn scale_for(&self, container_width: f32) -> f32 {
        if !container_width.is_finite() || container_width <= 0.0 || self.native_width <= 0.0 {
            return 0.0;
        }
        (container_width / self.native_width).min(1.0)
    }

    /// Record a new container width and return the resulting scale.
    ///
    /// Idempotent: the same width always yields the same scale.
    pub fn resize(&mut self, container_width: f32) -> f32 {
        let scale = self.scale_for(container_width);
        if self.container_width != Some(container_width) {
            tracing::trace!(container_width, scale, "preview scale recomputed");
        }
        self.container_width = Some(container_width);
        self.scale = scale;
        scale
    }

    /// The current preview scale (1.0 until the first resize).
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The last container width seen, if any.
    #[must_use]
    pub fn container_width(&self) -> Option<f32> {
        self.container_width
    }
}

impl Default for ScaleResolver {
    fn default() -> Self {
        Self::new(Resolution::CANONICAL)
    }
}

/// The transform used for export: always the canonical size at unit scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportTransform {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl ExportTransform {
    /// Export scale; never derived from the preview.
    pub const SCALE: f32 = 1.0;

    /// The export transform for `resolution`.
    #[must_use]
    pub fn canonical(resolution: Resolution) -> Self {
        Self {
            width: resolution.width,
            height: resolution.height,
        }
    }
}

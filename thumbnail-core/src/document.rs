//! The thumbnail document.

use serde::{Deserialize, Serialize};

use crate::{BackgroundConfig, ElementId, TextElement, Zone};

/// Maximum number of text elements in a document.
pub const MAX_ELEMENTS: usize = 5;

/// Pixel dimensions of the composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// The fixed 1280×670 output size.
    pub const CANONICAL: Self = Self {
        width: 1280,
        height: 670,
    };

    /// Width as a float, for layout math.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn width_f32(self) -> f32 {
        self.width as f32
    }

    /// Height as a float, for layout math.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn height_f32(self) -> f32 {
        self.height as f32
    }
}

/// The whole document: fixed resolution, a background and up to five text elements.
///
/// Snapshots are immutable from the outside; only
/// [`DocumentStore`](crate::DocumentStore) produces new ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailState {
    resolution: Resolution,
    pub(crate) background: BackgroundConfig,
    pub(crate) elements: Vec<TextElement>,
}

impl Default for ThumbnailState {
    fn default() -> Self {
        Self {
            resolution: Resolution::CANONICAL,
            background: BackgroundConfig::default(),
            elements: Vec::new(),
        }
    }
}

impl ThumbnailState {
    /// Canonical resolution; never changes.
    #[must_use]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Current background.
    #[must_use]
    pub fn background(&self) -> &BackgroundConfig {
        &self.background
    }

    /// Text elements in insertion order (not render order).
    #[must_use]
    pub fn elements(&self) -> &[TextElement] {
        &self.elements
    }

    /// Look up an element by ID.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&TextElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Number of text elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Whether another element may be added.
    #[must_use]
    pub fn has_capacity(&self) -> bool {
        self.elements.len() < MAX_ELEMENTS
    }

    /// Number of elements currently placed in `zone`.
    #[must_use]
    pub fn zone_count(&self, zone: Zone) -> usize {
        self.elements.iter().filter(|e| e.zone == zone).count()
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::StudioResult<String> {
        serde_json::to_string(self).map_err(crate::StudioError::Serialization)
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Option<&mut TextElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }
}

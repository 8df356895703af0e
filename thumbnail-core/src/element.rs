//! Text elements - the only content placed on a thumbnail.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Color;

/// Unique identifier for a text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the nine fixed placements of the 3×3 canvas grid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Zone {
    /// Top row, left column.
    TopLeft,
    /// Top row, center column.
    TopCenter,
    /// Top row, right column.
    TopRight,
    /// Middle row, left column.
    MiddleLeft,
    /// Middle row, center column.
    #[default]
    MiddleCenter,
    /// Middle row, right column.
    MiddleRight,
    /// Bottom row, left column.
    BottomLeft,
    /// Bottom row, center column.
    BottomCenter,
    /// Bottom row, right column.
    BottomRight,
}

/// Vertical flow of a zone's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    /// Flows downward from the top edge.
    Top,
    /// Centered on the cell's vertical midpoint.
    Middle,
    /// Flows upward from the bottom edge.
    Bottom,
}

/// Horizontal alignment of a zone's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAnchor {
    /// Aligned to the left edge.
    Left,
    /// Centered horizontally.
    Center,
    /// Aligned to the right edge.
    Right,
}

impl Zone {
    /// All zones in row-major order.
    pub const ALL: [Zone; 9] = [
        Zone::TopLeft,
        Zone::TopCenter,
        Zone::TopRight,
        Zone::MiddleLeft,
        Zone::MiddleCenter,
        Zone::MiddleRight,
        Zone::BottomLeft,
        Zone::BottomCenter,
        Zone::BottomRight,
    ];

    /// Row-major index of the zone's grid cell (0..9).
    #[must_use]
    pub fn index(self) -> usize {
        self.row() * 3 + self.column()
    }

    /// Grid row (0 = top).
    #[must_use]
    pub fn row(self) -> usize {
        match self.vertical() {
            VerticalAnchor::Top => 0,
            VerticalAnchor::Middle => 1,
            VerticalAnchor::Bottom => 2,
        }
    }

    /// Grid column (0 = left).
    #[must_use]
    pub fn column(self) -> usize {
        match self.horizontal() {
            HorizontalAnchor::Left => 0,
            HorizontalAnchor::Center => 1,
            HorizontalAnchor::Right => 2,
        }
    }

    /// Vertical flow of this zone.
    #[must_use]
    pub fn vertical(self) -> VerticalAnchor {
        match self {
            Zone::TopLeft | Zone::TopCenter | Zone::TopRight => VerticalAnchor::Top,
            Zone::MiddleLeft | Zone::MiddleCenter | Zone::MiddleRight => VerticalAnchor::Middle,
            Zone::BottomLeft | Zone::BottomCenter | Zone::BottomRight => VerticalAnchor::Bottom,
        }
    }

    /// Horizontal alignment of this zone.
    #[must_use]
    pub fn horizontal(self) -> HorizontalAnchor {
        match self {
            Zone::TopLeft | Zone::MiddleLeft | Zone::BottomLeft => HorizontalAnchor::Left,
            Zone::TopCenter | Zone::MiddleCenter | Zone::BottomCenter => HorizontalAnchor::Center,
            Zone::TopRight | Zone::MiddleRight | Zone::BottomRight => HorizontalAnchor::Right,
        }
    }
}

/// Font weight choices offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    /// Regular weight (400).
    #[serde(rename = "normal")]
    Normal,
    /// Bold weight (700).
    #[serde(rename = "bold")]
    Bold,
    /// Extra-bold weight (800).
    #[serde(rename = "800")]
    ExtraBold,
}

impl FontWeight {
    /// The numeric CSS/SVG weight.
    #[must_use]
    pub fn numeric(self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::Bold => 700,
            FontWeight::ExtraBold => 800,
        }
    }
}

/// Visual style of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontConfig {
    /// Font family name, resolved by the rasterizer's font database.
    pub family: String,
    /// Font size in pixels (> 0).
    pub size: f32,
    /// Fill color.
    pub color: Color,
    /// Opacity, 0..=1.
    pub opacity: f32,
    /// Font weight.
    pub weight: FontWeight,
    /// Line height multiplier (> 0).
    pub line_height: f32,
    /// Letter spacing in em (may be zero or slightly negative).
    pub letter_spacing: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 32.0,
            color: Color::rgb(0x33, 0x33, 0x33),
            opacity: 1.0,
            weight: FontWeight::Bold,
            line_height: 1.5,
            letter_spacing: 0.0,
        }
    }
}

/// A text element anchored in one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    /// Stable identifier.
    pub id: ElementId,
    /// Text content; embedded newlines are preserved.
    pub content: String,
    /// Placement zone.
    pub zone: Zone,
    /// Intra-zone ordering key; lower renders first.
    pub priority: u32,
    /// Visual style.
    pub style: FontConfig,
}

/// Content given to freshly added text.
pub const DEFAULT_TEXT_CONTENT: &str = "New text";

impl TextElement {
    /// Create a new element in `zone` with default content and style.
    #[must_use]
    pub fn new(zone: Zone, priority: u32) -> Self {
        Self {
            id: ElementId::new(),
            content: DEFAULT_TEXT_CONTENT.to_string(),
            zone,
            priority,
            style: FontConfig::default(),
        }
    }

    /// Set the content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Content split into rendered lines. Always yields at least one line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n').map(|line| line.trim_end_matches('\r'))
    }
}

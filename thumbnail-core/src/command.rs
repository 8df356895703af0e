//! Update commands produced by the editing widgets.
//!
//! Each struct enumerates exactly which fields an operation may override. A `None`
//! field leaves the current value untouched.

use serde::{Deserialize, Serialize};

use crate::{
    BackgroundKind, Color, ElementId, FontConfig, FontWeight, GradientConfig, GradientKind,
    GradientStop, MeshPoint, MeshPointId, StopId, TextElement, Zone,
};

/// Fields of a text element that `update_element` may change. Style is excluded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementUpdate {
    /// New text content.
    pub content: Option<String>,
    /// New placement zone.
    pub zone: Option<Zone>,
    /// New intra-zone priority.
    pub priority: Option<u32>,
}

impl ElementUpdate {
    pub(crate) fn apply(&self, element: &mut TextElement) {
        if let Some(content) = &self.content {
            element.content.clone_from(content);
        }
        if let Some(zone) = self.zone {
            element.zone = zone;
        }
        if let Some(priority) = self.priority {
            element.priority = priority;
        }
    }
}

/// Fields of a [`FontConfig`] that `update_style` may change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleUpdate {
    /// New font family.
    pub family: Option<String>,
    /// New size in pixels.
    pub size: Option<f32>,
    /// New color.
    pub color: Option<Color>,
    /// New opacity.
    pub opacity: Option<f32>,
    /// New weight.
    pub weight: Option<FontWeight>,
    /// New line height multiplier.
    pub line_height: Option<f32>,
    /// New letter spacing in em.
    pub letter_spacing: Option<f32>,
}

impl StyleUpdate {
    pub(crate) fn apply(&self, style: &mut FontConfig) {
        if let Some(family) = &self.family {
            style.family.clone_from(family);
        }
        if let Some(size) = self.size {
            style.size = size;
        }
        if let Some(color) = self.color {
            style.color = color;
        }
        if let Some(opacity) = self.opacity {
            style.opacity = opacity;
        }
        if let Some(weight) = self.weight {
            style.weight = weight;
        }
        if let Some(line_height) = self.line_height {
            style.line_height = line_height;
        }
        if let Some(letter_spacing) = self.letter_spacing {
            style.letter_spacing = letter_spacing;
        }
    }
}

/// Top-level background fields. The gradient is only replaced when given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundUpdate {
    /// New active fill kind.
    #[serde(rename = "type")]
    pub kind: Option<BackgroundKind>,
    /// New flat color.
    pub solid_color: Option<Color>,
    /// Replacement gradient.
    pub gradient: Option<GradientConfig>,
}

/// Gradient fields. Applying any of them activates gradient mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GradientUpdate {
    /// New gradient flavour.
    #[serde(rename = "type")]
    pub kind: Option<GradientKind>,
    /// New angle in degrees.
    pub angle: Option<f32>,
    /// Replacement stop list.
    pub stops: Option<Vec<GradientStop>>,
    /// Replacement mesh point list.
    pub mesh_points: Option<Vec<MeshPoint>>,
}

impl GradientUpdate {
    /// An update that only replaces the stop list.
    #[must_use]
    pub fn stops(stops: Vec<GradientStop>) -> Self {
        Self {
            stops: Some(stops),
            ..Self::default()
        }
    }

    /// An update that only replaces the mesh point list.
    #[must_use]
    pub fn mesh_points(points: Vec<MeshPoint>) -> Self {
        Self {
            mesh_points: Some(points),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, gradient: &mut GradientConfig) {
        if let Some(kind) = self.kind {
            gradient.kind = kind;
        }
        if let Some(angle) = self.angle {
            gradient.angle = angle;
        }
        if let Some(stops) = self.stops {
            gradient.stops = stops;
        }
        if let Some(points) = self.mesh_points {
            gradient.mesh_points = points;
        }
    }
}

/// Fields of a single gradient stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopUpdate {
    /// New color.
    pub color: Option<Color>,
    /// New position, 0..=100.
    pub position: Option<f32>,
}

/// Fields of a single mesh point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshPointUpdate {
    /// New horizontal center, 0..=100.
    pub x: Option<f32>,
    /// New vertical center, 0..=100.
    pub y: Option<f32>,
    /// New color.
    pub color: Option<Color>,
    /// New radius in pixels.
    pub radius: Option<f32>,
}

impl MeshPointUpdate {
    /// An update that only moves the point.
    #[must_use]
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub(crate) fn apply(&self, point: &mut MeshPoint) {
        if let Some(x) = self.x {
            point.x = x;
        }
        if let Some(y) = self.y {
            point.y = y;
        }
        if let Some(color) = self.color {
            point.color = color;
        }
        if let Some(radius) = self.radius {
            point.radius = radius;
        }
    }
}

/// An update message as sent by the editing widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StudioCommand {
    /// Add a text element to a zone.
    AddText {
        /// Target zone.
        #[serde(default)]
        zone: Zone,
    },
    /// Remove a text element.
    RemoveText {
        /// Element to remove.
        id: ElementId,
    },
    /// Change content, zone or priority of an element.
    UpdateElement {
        /// Target element.
        id: ElementId,
        /// Fields to change.
        #[serde(flatten)]
        update: ElementUpdate,
    },
    /// Change the style of an element.
    UpdateStyle {
        /// Target element.
        id: ElementId,
        /// Fields to change.
        #[serde(flatten)]
        update: StyleUpdate,
    },
    /// Change top-level background fields.
    UpdateBackground(BackgroundUpdate),
    /// Change gradient fields and activate gradient mode.
    UpdateGradient(GradientUpdate),
    /// Replace the mesh points with a random set.
    RandomizeMeshPoints,
    /// Append a white stop at 100%.
    AddGradientStop,
    /// Change one gradient stop.
    UpdateGradientStop {
        /// Target stop.
        id: StopId,
        /// Fields to change.
        #[serde(flatten)]
        update: StopUpdate,
    },
    /// Remove one gradient stop (refused below two stops).
    RemoveGradientStop {
        /// Target stop.
        id: StopId,
    },
    /// Append a mesh point at the canvas center.
    AddMeshPoint,
    /// Change one mesh point.
    UpdateMeshPoint {
        /// Target point.
        id: MeshPointId,
        /// Fields to change.
        #[serde(flatten)]
        update: MeshPointUpdate,
    },
    /// Remove one mesh point.
    RemoveMeshPoint {
        /// Target point.
        id: MeshPointId,
    },
}

impl StudioCommand {
    /// Parse a JSON array of commands.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or names an unknown operation.
    pub fn parse_script(json: &str) -> crate::StudioResult<Vec<Self>> {
        serde_json::from_str(json).map_err(crate::StudioError::Serialization)
    }
}

//! Background configuration: a solid fill or one of three gradient kinds.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Color;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new unique ID.
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

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a gradient stop.
    StopId
);

uuid_id!(
    /// Unique identifier for a mesh point.
    MeshPointId
);

/// A color stop of a linear or radial gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Stable identifier.
    pub id: StopId,
    /// Stop color.
    pub color: Color,
    /// Offset along the gradient, 0..=100 percent.
    pub position: f32,
}

impl GradientStop {
    /// Create a stop with a fresh ID.
    #[must_use]
    pub fn new(color: Color, position: f32) -> Self {
        Self {
            id: StopId::new(),
            color,
            position,
        }
    }
}

/// A soft color glow positioned on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshPoint {
    /// Stable identifier.
    pub id: MeshPointId,
    /// Horizontal center, 0..=100 percent of the canvas width.
    pub x: f32,
    /// Vertical center, 0..=100 percent of the canvas height.
    pub y: f32,
    /// Glow color.
    pub color: Color,
    /// Glow radius in canvas pixels (> 0).
    pub radius: f32,
}

impl MeshPoint {
    /// Create a mesh point with a fresh ID.
    #[must_use]
    pub fn new(x: f32, y: f32, color: Color, radius: f32) -> Self {
        Self {
            id: MeshPointId::new(),
            x,
            y,
            color,
            radius,
        }
    }
}

/// The gradient flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    /// Directional gradient at `angle` degrees.
    Linear,
    /// Circular gradient from the center outward.
    Radial,
    /// Independent soft-glow points.
    Mesh,
}

/// Gradient settings, kept even while the background is solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientConfig {
    /// Gradient flavour.
    #[serde(rename = "type")]
    pub kind: GradientKind,
    /// Direction in degrees (linear only; 0 points up, 90 points right).
    pub angle: f32,
    /// Color stops for linear and radial gradients.
    pub stops: Vec<GradientStop>,
    /// Glow points for mesh gradients.
    pub mesh_points: Vec<MeshPoint>,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            angle: 135.0,
            stops: vec![
                GradientStop::new(Color::rgb(0xff, 0x9a, 0x9e), 0.0),
                GradientStop::new(Color::rgb(0xfa, 0xd0, 0xc4), 100.0),
            ],
            mesh_points: Vec::new(),
        }
    }
}

impl GradientConfig {
    /// Stops ordered by position. Stable: equal positions keep their relative order.
    #[must_use]
    pub fn sorted_stops(&self) -> Vec<GradientStop> {
        let mut stops = self.stops.clone();
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        stops
    }
}

/// Which fill the background currently uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    /// A flat color.
    Solid,
    /// The configured gradient.
    Gradient,
}

/// Background of the thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundConfig {
    /// Active fill kind.
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    /// Flat color; retained while a gradient is active.
    pub solid_color: Color,
    /// Gradient settings; always present.
    pub gradient: GradientConfig,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::Solid,
            solid_color: Color::WHITE,
            gradient: GradientConfig::default(),
        }
    }
}

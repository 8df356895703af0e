//! Background resolution: turns a [`BackgroundConfig`] into a renderable fill.
//!
//! Linear and radial gradients resolve to a single paint over sorted stops. Mesh
//! gradients resolve to a base color plus one blurred glow per mesh point, painted
//! in point order.

use serde::{Deserialize, Serialize};

use crate::{BackgroundConfig, BackgroundKind, Color, GradientKind, MeshPointId, Resolution};

/// Layer opacity of a mesh glow.
pub const GLOW_OPACITY: f32 = 0.8;

/// Gaussian blur applied to a mesh glow, in pixels.
pub const GLOW_BLUR: f32 = 80.0;

/// A gradient stop ready for painting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStop {
    /// Stop color.
    pub color: Color,
    /// Offset in `0.0..=1.0`.
    pub offset: f32,
}

/// One soft glow of a mesh background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    /// Source mesh point.
    pub point: MeshPointId,
    /// Horizontal center, percent of canvas width.
    pub x: f32,
    /// Vertical center, percent of canvas height.
    pub y: f32,
    /// Glow diameter in pixels.
    pub diameter: f32,
    /// Glow color.
    pub color: Color,
    /// Layer opacity.
    pub opacity: f32,
    /// Blur radius in pixels.
    pub blur: f32,
}

impl Glow {
    /// Center of the glow in canvas pixels.
    #[must_use]
    pub fn center(&self, resolution: Resolution) -> (f32, f32) {
        (
            self.x / 100.0 * resolution.width_f32(),
            self.y / 100.0 * resolution.height_f32(),
        )
    }

    /// Radius of the glow disc in pixels (before blur).
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }
}

/// A background described in paintable terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fill", rename_all = "lowercase")]
pub enum RenderableFill {
    /// A flat color.
    Solid {
        /// Fill color.
        color: Color,
    },
    /// A directional gradient.
    Linear {
        /// Direction in degrees, 0 pointing up.
        angle: f32,
        /// Stops sorted by offset.
        stops: Vec<ResolvedStop>,
    },
    /// A circular gradient from the center to the farthest corner.
    Radial {
        /// Stops sorted by offset.
        stops: Vec<ResolvedStop>,
    },
    /// Independent glow layers over a base color.
    Mesh {
        /// Fill beneath the glows.
        base: Color,
        /// Glows in paint order.
        glows: Vec<Glow>,
    },
}

impl RenderableFill {
    /// Stops of a linear or radial fill; empty otherwise.
    #[must_use]
    pub fn stops(&self) -> &[ResolvedStop] {
        match self {
            Self::Linear { stops, .. } | Self::Radial { stops } => stops,
            Self::Solid { .. } | Self::Mesh { .. } => &[],
        }
    }
}

/// Resolve a background into a renderable fill.
#[must_use]
pub fn resolve_background(background: &BackgroundConfig) -> RenderableFill {
    if background.kind == BackgroundKind::Solid {
        return RenderableFill::Solid {
            color: background.solid_color,
        };
    }

    let gradient = &background.gradient;
    match gradient.kind {
        GradientKind::Linear => RenderableFill::Linear {
            angle: gradient.angle,
            stops: resolve_stops(background),
        },
        GradientKind::Radial => RenderableFill::Radial {
            stops: resolve_stops(background),
        },
        GradientKind::Mesh => RenderableFill::Mesh {
            base: background.solid_color,
            glows: gradient
                .mesh_points
                .iter()
                .map(|p| Glow {
                    point: p.id,
                    x: p.x,
                    y: p.y,
                    diameter: p.radius * 2.0,
                    color: p.color,
                    opacity: GLOW_OPACITY,
                    blur: GLOW_BLUR,
                })
                .collect(),
        },
    }
}

fn resolve_stops(background: &BackgroundConfig) -> Vec<ResolvedStop> {
    background
        .gradient
        .sorted_stops()
        .into_iter()
        .map(|s| ResolvedStop {
            color: s.color,
            offset: (s.position / 100.0).clamp(0.0, 1.0),
        })
        .collect()
}

/// Start and end points of a linear gradient line over a `width`×`height` box.
///
/// 0° points up and angles turn clockwise. The line passes through the center and
/// is long enough that the corners hit the first and last stop.
#[must_use]
pub fn linear_endpoints(angle: f32, width: f32, height: f32) -> ((f32, f32), (f32, f32)) {
    let (sin, cos) = angle.to_radians().sin_cos();
    let half = ((width * sin).abs() + (height * cos).abs()) / 2.0;
    let (cx, cy) = (width / 2.0, height / 2.0);
    let (dx, dy) = (sin * half, -cos * half);
    ((cx - dx, cy - dy), (cx + dx, cy + dy))
}

/// Radius of a centered circular gradient reaching the farthest corner.
#[must_use]
pub fn radial_radius(width: f32, height: f32) -> f32 {
    (width / 2.0).hypot(height / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GradientConfig, GradientStop, MeshPoint};

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn gradient_bg(kind: GradientKind, stops: Vec<GradientStop>) -> BackgroundConfig {
        BackgroundConfig {
            kind: BackgroundKind::Gradient,
            gradient: GradientConfig {
                kind,
                angle: 90.0,
                stops,
                mesh_points: Vec::new(),
            },
            ..BackgroundConfig::default()
        }
    }

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 0.01 && (a.1 - b.1).abs() < 0.01
    }

    #[test]
    fn test_solid_uses_solid_color() {
        let bg = BackgroundConfig::default();
        assert_eq!(
            resolve_background(&bg),
            RenderableFill::Solid {
                color: Color::WHITE
            }
        );
    }

    #[test]
    fn test_linear_red_to_blue() {
        let bg = gradient_bg(
            GradientKind::Linear,
            vec![GradientStop::new(RED, 0.0), GradientStop::new(BLUE, 100.0)],
        );
        let fill = resolve_background(&bg);
        let RenderableFill::Linear { angle, stops } = &fill else {
            panic!("expected linear fill, got {fill:?}");
        };
        assert!((angle - 90.0).abs() < f32::EPSILON);
        assert_eq!(
            stops,
            &vec![
                ResolvedStop {
                    color: RED,
                    offset: 0.0
                },
                ResolvedStop {
                    color: BLUE,
                    offset: 1.0
                },
            ]
        );
    }

    #[test]
    fn test_stop_input_order_does_not_matter() {
        let red = GradientStop::new(RED, 0.0);
        let blue = GradientStop::new(BLUE, 100.0);
        let forward = gradient_bg(GradientKind::Linear, vec![red.clone(), blue.clone()]);
        let backward = gradient_bg(GradientKind::Linear, vec![blue, red]);
        assert_eq!(resolve_background(&forward), resolve_background(&backward));
    }

    #[test]
    fn test_radial_ignores_angle() {
        let mut bg = gradient_bg(
            GradientKind::Radial,
            vec![GradientStop::new(RED, 0.0), GradientStop::new(BLUE, 100.0)],
        );
        let a = resolve_background(&bg);
        bg.gradient.angle = 12.0;
        assert_eq!(a, resolve_background(&bg));
        assert_eq!(a.stops().len(), 2);
    }

    #[test]
    fn test_mesh_glows_follow_point_order() {
        let mut bg = gradient_bg(GradientKind::Mesh, GradientConfig::default().stops);
        bg.solid_color = Color::rgb(10, 10, 10);
        bg.gradient.mesh_points = vec![
            MeshPoint::new(10.0, 20.0, RED, 100.0),
            MeshPoint::new(10.0, 20.0, BLUE, 250.0),
        ];

        let RenderableFill::Mesh { base, glows } = resolve_background(&bg) else {
            panic!("expected mesh fill");
        };
        assert_eq!(base, Color::rgb(10, 10, 10));
        assert_eq!(glows.len(), 2);
        assert_eq!(glows[0].color, RED);
        assert_eq!(glows[1].color, BLUE);
        assert!(glows[1].diameter > glows[0].diameter);
        assert!((glows[0].diameter - 200.0).abs() < f32::EPSILON);
        assert!((glows[0].opacity - GLOW_OPACITY).abs() < f32::EPSILON);
        assert!(close(glows[0].center(Resolution::CANONICAL), (128.0, 134.0)));
    }

    #[test]
    fn test_linear_endpoints_follow_css_angles() {
        // 90deg runs left to right across the full width.
        let (start, end) = linear_endpoints(90.0, 1280.0, 670.0);
        assert!(close(start, (0.0, 335.0)));
        assert!(close(end, (1280.0, 335.0)));

        // 180deg runs top to bottom.
        let (start, end) = linear_endpoints(180.0, 1280.0, 670.0);
        assert!(close(start, (640.0, 0.0)));
        assert!(close(end, (640.0, 670.0)));

        // 0deg runs bottom to top.
        let (start, end) = linear_endpoints(0.0, 100.0, 100.0);
        assert!(close(start, (50.0, 100.0)));
        assert!(close(end, (50.0, 0.0)));
    }

    #[test]
    fn test_radial_reaches_corner() {
        assert!((radial_radius(6.0, 8.0) - 5.0).abs() < 1e-4);
    }
}

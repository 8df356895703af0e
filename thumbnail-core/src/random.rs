//! Seeded mesh point generation.

use std::ops::RangeInclusive;

use crate::{Color, MeshPoint, StudioError, StudioResult};

/// Deterministic 64-bit generator (`SplitMix64`).
#[derive(Debug, Clone, Copy)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Create a generator from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, 1)` with 24 bits of precision.
    #[allow(clippy::cast_precision_loss)]
    pub fn next_f32_01(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        v as f32 / (1u64 << 24) as f32
    }

    /// Uniform value in `[lo, hi]`.
    pub fn range(&mut self, range: &RangeInclusive<f32>) -> f32 {
        let (lo, hi) = (*range.start(), *range.end());
        (lo + (hi - lo) * self.next_f32_01()).clamp(lo, hi)
    }
}

/// How `randomize_mesh_points` builds a new point set.
///
/// Positions are uniform over the whole canvas, hues are uniform around the color
/// wheel at fixed saturation and lightness, and radii are uniform in `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomizePolicy {
    /// Number of points generated.
    pub count: usize,
    /// Radius range in pixels; must be strictly positive.
    pub radius: RangeInclusive<f32>,
    /// HSL saturation of generated colors.
    pub saturation: f32,
    /// HSL lightness of generated colors.
    pub lightness: f32,
}

impl Default for RandomizePolicy {
    fn default() -> Self {
        Self {
            count: 4,
            radius: 100.0..=400.0,
            saturation: 0.75,
            lightness: 0.65,
        }
    }
}

impl RandomizePolicy {
    /// Check that generated points would satisfy the mesh point invariants.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidValue`] for a non-positive or inverted radius range.
    pub fn validate(&self) -> StudioResult<()> {
        let (lo, hi) = (*self.radius.start(), *self.radius.end());
        if !(lo > 0.0 && hi >= lo && hi.is_finite()) {
            return Err(StudioError::InvalidValue(format!(
                "mesh radius range must be positive and ordered, got {lo}..={hi}"
            )));
        }
        Ok(())
    }

    /// Generate a fresh point set.
    #[must_use]
    pub fn generate(&self, rng: &mut Rng64) -> Vec<MeshPoint> {
        (0..self.count)
            .map(|_| {
                let x = rng.range(&(0.0..=100.0));
                let y = rng.range(&(0.0..=100.0));
                let hue = rng.range(&(0.0..=360.0));
                let radius = rng.range(&self.radius);
                MeshPoint::new(
                    x,
                    y,
                    Color::from_hsl(hue, self.saturation, self.lightness),
                    radius,
                )
            })
            .collect()
    }
}

//! Zone layout: places text elements into the 3×3 grid.
//!
//! Each zone is an equal third of the canvas in both directions. Within a zone,
//! elements are sorted by priority (stable) and stacked: top zones flow down from
//! the top edge, bottom zones end at the bottom edge, middle zones are centered.
//! Horizontally the stack is aligned left, centered or right.
//!
//! Text is measured approximately (fixed advance per character); exact font
//! metrics are left to the rasterizer.

use serde::{Deserialize, Serialize};

use crate::{
    ElementId, FontConfig, HorizontalAnchor, Rect, Resolution, TextElement, ThumbnailState,
    VerticalAnchor, Zone,
};

/// Inner padding of every zone cell, in pixels.
pub const ZONE_PADDING: f32 = 16.0;

/// Space after every stacked block, in pixels.
pub const BLOCK_GAP: f32 = 8.0;

/// Estimated advance of one character, in em.
pub const CHAR_ADVANCE_EM: f32 = 0.6;

/// Estimated ascent above the baseline, in em.
pub const ASCENT_EM: f32 = 0.8;

/// One laid-out text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedText {
    /// Source element.
    pub id: ElementId,
    /// Zone the block sits in.
    pub zone: Zone,
    /// Position within the zone's stack (0 = first).
    pub order: usize,
    /// Estimated block bounds in canvas pixels.
    pub bounds: Rect,
    /// Horizontal alignment of every line.
    pub align: HorizontalAnchor,
    /// X coordinate the lines are anchored to (left edge, center or right edge).
    pub anchor_x: f32,
    /// Lines of text, verbatim.
    pub lines: Vec<String>,
    /// Distance between consecutive baselines.
    pub line_advance: f32,
    /// Style of the element.
    pub style: FontConfig,
}

impl PlacedText {
    /// Baseline y coordinate of line `index`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn baseline(&self, index: usize) -> f32 {
        let half_leading = (self.line_advance - self.style.size) / 2.0;
        self.bounds.y + index as f32 * self.line_advance + half_leading + ASCENT_EM * self.style.size
    }
}

/// Layout of a single zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneLayout {
    /// The zone.
    pub zone: Zone,
    /// The zone's grid cell.
    pub cell: Rect,
    /// Stacked blocks in flow order.
    pub items: Vec<PlacedText>,
}

/// Layout of the whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    zones: Vec<ZoneLayout>,
}

impl Layout {
    /// Lay out every element of `state`.
    #[must_use]
    pub fn compute(state: &ThumbnailState) -> Self {
        let resolution = state.resolution();
        let zones = Zone::ALL
            .iter()
            .map(|&zone| layout_zone(resolution, zone, state.elements()))
            .collect();
        Self { zones }
    }

    /// All zones, row-major.
    #[must_use]
    pub fn zones(&self) -> &[ZoneLayout] {
        &self.zones
    }

    /// Layout of one zone.
    #[must_use]
    pub fn zone(&self, zone: Zone) -> &ZoneLayout {
        &self.zones[zone.index()]
    }

    /// All blocks in paint order: zone by zone, then stack order.
    pub fn blocks(&self) -> impl Iterator<Item = &PlacedText> {
        self.zones.iter().flat_map(|z| z.items.iter())
    }

    /// Find the block for an element.
    #[must_use]
    pub fn block(&self, id: ElementId) -> Option<&PlacedText> {
        self.blocks().find(|b| b.id == id)
    }
}

/// Grid cell of `zone` on a canvas of `resolution`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn zone_cell(resolution: Resolution, zone: Zone) -> Rect {
    let width = resolution.width_f32() / 3.0;
    let height = resolution.height_f32() / 3.0;
    Rect::new(
        zone.column() as f32 * width,
        zone.row() as f32 * height,
        width,
        height,
    )
}

/// Elements of `zone`, ordered by priority. Equal priorities keep input order.
#[must_use]
pub fn zone_elements(elements: &[TextElement], zone: Zone) -> Vec<&TextElement> {
    let mut selected: Vec<_> = elements.iter().filter(|e| e.zone == zone).collect();
    selected.sort_by_key(|e| e.priority);
    selected
}

/// Estimated `(width, height)` of an element's text block.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn measure(element: &TextElement) -> (f32, f32) {
    let style = &element.style;
    let advance = (CHAR_ADVANCE_EM + style.letter_spacing).max(0.0) * style.size;
    let mut widest = 0usize;
    let mut lines = 0usize;
    for line in element.lines() {
        widest = widest.max(line.chars().count());
        lines += 1;
    }
    let width = widest as f32 * advance;
    let height = lines as f32 * style.size * style.line_height;
    (width, height)
}

fn layout_zone(resolution: Resolution, zone: Zone, elements: &[TextElement]) -> ZoneLayout {
    let cell = zone_cell(resolution, zone);
    let ordered = zone_elements(elements, zone);

    let measured: Vec<(f32, f32)> = ordered.iter().map(|&e| measure(e)).collect();
    let stack_height: f32 = measured.iter().map(|(_, h)| h + BLOCK_GAP).sum();

    let mut y = match zone.vertical() {
        VerticalAnchor::Top => cell.y + ZONE_PADDING,
        VerticalAnchor::Middle => cell.center_y() - stack_height / 2.0,
        VerticalAnchor::Bottom => cell.bottom() - ZONE_PADDING - stack_height,
    };

    let align = zone.horizontal();
    let anchor_x = match align {
        HorizontalAnchor::Left => cell.x + ZONE_PADDING,
        HorizontalAnchor::Center => cell.center_x(),
        HorizontalAnchor::Right => cell.right() - ZONE_PADDING,
    };

    let items = ordered
        .into_iter()
        .zip(measured)
        .enumerate()
        .map(|(order, (element, (width, height)))| {
            let x = match align {
                HorizontalAnchor::Left => anchor_x,
                HorizontalAnchor::Center => anchor_x - width / 2.0,
                HorizontalAnchor::Right => anchor_x - width,
            };
            let placed = PlacedText {
                id: element.id,
                zone,
                order,
                bounds: Rect::new(x, y, width, height),
                align,
                anchor_x,
                lines: element.lines().map(str::to_string).collect(),
                line_advance: element.style.size * element.style.line_height,
                style: element.style.clone(),
            };
            y += height + BLOCK_GAP;
            placed
        })
        .collect();

    ZoneLayout { zone, cell, items }
}

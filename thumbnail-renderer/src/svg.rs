//! SVG emission for render trees.
//!
//! The SVG is always laid out in canvas units (`viewBox` = the canonical
//! resolution). Previews change only the outer `width`/`height`; exports use the
//! canonical size and leave out every node tagged ignore-on-export.

use std::fmt::Write;

use thumbnail_core::fill::GLOW_BLUR;
use thumbnail_core::{
    linear_endpoints, radial_radius, Color, ExportTransform, HorizontalAnchor, PlacedText, Rect,
    RenderableFill, ResolvedStop,
};

use crate::scene::{NodeKind, RenderTree};

/// Side length of a mesh handle in canvas pixels.
pub const HANDLE_SIZE: f32 = thumbnail_core::interaction::HANDLE_SIZE;

/// Border width of a mesh handle.
pub const HANDLE_BORDER: f32 = 3.0;

const GRADIENT_ID: &str = "bg-gradient";
const BLUR_ID: &str = "glow-blur";

/// SVG for the export: canonical size, unit scale, no chrome.
#[must_use]
pub fn export_svg(tree: &RenderTree, transform: ExportTransform) -> String {
    #[allow(clippy::cast_precision_loss)]
    let (width, height) = (transform.width as f32, transform.height as f32);
    write_document(
        tree,
        width * ExportTransform::SCALE,
        height * ExportTransform::SCALE,
        false,
    )
}

/// SVG for the live preview at `scale`, chrome included.
#[must_use]
pub fn preview_svg(tree: &RenderTree, scale: f32) -> String {
    let res = tree.resolution();
    write_document(
        tree,
        res.width_f32() * scale,
        res.height_f32() * scale,
        true,
    )
}

fn write_document(tree: &RenderTree, out_w: f32, out_h: f32, include_chrome: bool) -> String {
    let res = tree.resolution();
    let (view_w, view_h) = (res.width_f32(), res.height_f32());

    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\">",
    );

    for node in tree.nodes() {
        if node.is_chrome() && !include_chrome {
            continue;
        }
        match &node.kind {
            NodeKind::Background(fill) => write_background(&mut svg, fill, view_w, view_h),
            NodeKind::Text(block) => write_text(&mut svg, block),
            NodeKind::GridOverlay { cells } => write_grid(&mut svg, cells),
            NodeKind::MeshHandle { x, y, color, .. } => write_handle(&mut svg, *x, *y, *color),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn write_background(svg: &mut String, fill: &RenderableFill, width: f32, height: f32) {
    match fill {
        RenderableFill::Solid { color } => {
            let _ = write!(
                svg,
                "<rect width=\"{width}\" height=\"{height}\" fill=\"{}\" fill-opacity=\"{}\"/>",
                color.hex_rgb(),
                color.alpha(),
            );
        }
        RenderableFill::Linear { angle, stops } => {
            let ((x1, y1), (x2, y2)) = linear_endpoints(*angle, width, height);
            let _ = write!(
                svg,
                "<defs><linearGradient id=\"{GRADIENT_ID}\" gradientUnits=\"userSpaceOnUse\" x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\">",
            );
            write_stops(svg, stops);
            let _ = write!(
                svg,
                "</linearGradient></defs><rect width=\"{width}\" height=\"{height}\" fill=\"url(#{GRADIENT_ID})\"/>",
            );
        }
        RenderableFill::Radial { stops } => {
            let (cx, cy) = (width / 2.0, height / 2.0);
            let r = radial_radius(width, height);
            let _ = write!(
                svg,
                "<defs><radialGradient id=\"{GRADIENT_ID}\" gradientUnits=\"userSpaceOnUse\" cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\">",
            );
            write_stops(svg, stops);
            let _ = write!(
                svg,
                "</radialGradient></defs><rect width=\"{width}\" height=\"{height}\" fill=\"url(#{GRADIENT_ID})\"/>",
            );
        }
        RenderableFill::Mesh { base, glows } => {
            let _ = write!(
                svg,
                "<rect width=\"{width}\" height=\"{height}\" fill=\"{}\" fill-opacity=\"{}\"/>",
                base.hex_rgb(),
                base.alpha(),
            );
            if glows.is_empty() {
                return;
            }
            // The filter region is the canvas itself; glows never paint outside it.
            let _ = write!(
                svg,
                "<defs><filter id=\"{BLUR_ID}\" filterUnits=\"userSpaceOnUse\" x=\"0\" y=\"0\" width=\"{width}\" height=\"{height}\"><feGaussianBlur stdDeviation=\"{GLOW_BLUR}\"/></filter></defs>",
            );
            for glow in glows {
                let cx = glow.x / 100.0 * width;
                let cy = glow.y / 100.0 * height;
                let _ = write!(
                    svg,
                    "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{}\" fill=\"{}\" fill-opacity=\"{}\" opacity=\"{}\" filter=\"url(#{BLUR_ID})\"/>",
                    glow.radius(),
                    glow.color.hex_rgb(),
                    glow.color.alpha(),
                    glow.opacity,
                );
            }
        }
    }
}

fn write_stops(svg: &mut String, stops: &[ResolvedStop]) {
    for stop in stops {
        let _ = write!(
            svg,
            "<stop offset=\"{}\" stop-color=\"{}\" stop-opacity=\"{}\"/>",
            stop.offset,
            stop.color.hex_rgb(),
            stop.color.alpha(),
        );
    }
}

fn write_text(svg: &mut String, block: &PlacedText) {
    let style = &block.style;
    let anchor = match block.align {
        HorizontalAnchor::Left => "start",
        HorizontalAnchor::Center => "middle",
        HorizontalAnchor::Right => "end",
    };
    let _ = write!(
        svg,
        "<text xml:space=\"preserve\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" letter-spacing=\"{}\" text-anchor=\"{anchor}\" fill=\"{}\" fill-opacity=\"{}\" opacity=\"{}\">",
        escape_xml(&style.family),
        style.size,
        style.weight.numeric(),
        style.letter_spacing * style.size,
        style.color.hex_rgb(),
        style.color.alpha(),
        style.opacity,
    );
    for (i, line) in block.lines.iter().enumerate() {
        let _ = write!(
            svg,
            "<tspan x=\"{}\" y=\"{}\">{}</tspan>",
            block.anchor_x,
            block.baseline(i),
            escape_xml(line),
        );
    }
    svg.push_str("</text>");
}

fn write_grid(svg: &mut String, cells: &[Rect]) {
    svg.push_str(
        "<g fill=\"none\" stroke=\"#000000\" stroke-opacity=\"0.15\" stroke-width=\"1\" stroke-dasharray=\"6 6\">",
    );
    for cell in cells {
        let _ = write!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
            cell.x, cell.y, cell.width, cell.height,
        );
    }
    svg.push_str("</g>");
}

fn write_handle(svg: &mut String, x: f32, y: f32, color: Color) {
    let r = HANDLE_SIZE / 2.0 - HANDLE_BORDER / 2.0;
    let _ = write!(
        svg,
        "<circle cx=\"{x}\" cy=\"{y}\" r=\"{r}\" fill=\"{}\" stroke=\"#ffffff\" stroke-width=\"{HANDLE_BORDER}\"/>",
        color.hex_rgb(),
    );
}

/// Escape special XML characters and drop code points XML 1.0 forbids.
fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

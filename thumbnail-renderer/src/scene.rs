//! Render tree built from a document snapshot.
//!
//! Every node carries an [`ExportVisibility`] tag. Editor chrome (the zone grid
//! and mesh drag handles) is tagged [`ExportVisibility::IgnoreOnExport`], so the
//! capture step can drop it without knowing what it is.

use serde::{Deserialize, Serialize};
use thumbnail_core::layout::zone_cell;
use thumbnail_core::{
    resolve_background, BackgroundKind, Color, GradientKind, Layout, MeshPointId, PlacedText,
    Rect, RenderableFill, Resolution, ThumbnailState, Zone,
};

use crate::error::RenderResult;

/// Whether a node appears in exported images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportVisibility {
    /// Part of the composition.
    Include,
    /// Editor-only chrome; preview only.
    IgnoreOnExport,
}

/// Which chrome layers a preview draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeOptions {
    /// Dashed 3×3 zone grid.
    pub grid: bool,
    /// Drag handles on mesh points (only while a mesh gradient is active).
    pub mesh_handles: bool,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            grid: true,
            mesh_handles: true,
        }
    }
}

impl ChromeOptions {
    /// No chrome at all.
    #[must_use]
    pub fn none() -> Self {
        Self {
            grid: false,
            mesh_handles: false,
        }
    }
}

/// Content of a render node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum NodeKind {
    /// The background fill.
    Background(RenderableFill),
    /// A laid-out text block.
    Text(PlacedText),
    /// Dashed outlines of the zone cells.
    GridOverlay {
        /// Cell rectangles, row-major.
        cells: Vec<Rect>,
    },
    /// A drag handle centered on a mesh point.
    MeshHandle {
        /// Point the handle moves.
        point: MeshPointId,
        /// Center x in canvas pixels.
        x: f32,
        /// Center y in canvas pixels.
        y: f32,
        /// Fill color (the point's color).
        color: Color,
    },
}

/// One node of the render tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// What to draw.
    pub kind: NodeKind,
    /// Export tag.
    pub visibility: ExportVisibility,
}

impl SceneNode {
    fn content(kind: NodeKind) -> Self {
        Self {
            kind,
            visibility: ExportVisibility::Include,
        }
    }

    fn chrome(kind: NodeKind) -> Self {
        Self {
            kind,
            visibility: ExportVisibility::IgnoreOnExport,
        }
    }

    /// Whether this node is editor chrome.
    #[must_use]
    pub fn is_chrome(&self) -> bool {
        self.visibility == ExportVisibility::IgnoreOnExport
    }
}

/// Paint-ordered nodes describing one document snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderTree {
    resolution: Resolution,
    nodes: Vec<SceneNode>,
}

impl RenderTree {
    /// Build the tree for `state`.
    ///
    /// Paint order: background, text blocks zone by zone, grid, mesh handles.
    #[must_use]
    pub fn build(state: &ThumbnailState, chrome: &ChromeOptions) -> Self {
        let resolution = state.resolution();
        let mut nodes = vec![SceneNode::content(NodeKind::Background(
            resolve_background(state.background()),
        ))];

        let layout = Layout::compute(state);
        nodes.extend(
            layout
                .blocks()
                .cloned()
                .map(|block| SceneNode::content(NodeKind::Text(block))),
        );

        if chrome.grid {
            let cells = Zone::ALL
                .iter()
                .map(|&zone| zone_cell(resolution, zone))
                .collect();
            nodes.push(SceneNode::chrome(NodeKind::GridOverlay { cells }));
        }

        let background = state.background();
        let mesh_active = background.kind == BackgroundKind::Gradient
            && background.gradient.kind == GradientKind::Mesh;
        if chrome.mesh_handles && mesh_active {
            nodes.extend(background.gradient.mesh_points.iter().map(|p| {
                SceneNode::chrome(NodeKind::MeshHandle {
                    point: p.id,
                    x: p.x / 100.0 * resolution.width_f32(),
                    y: p.y / 100.0 * resolution.height_f32(),
                    color: p.color,
                })
            }));
        }

        Self { resolution, nodes }
    }

    /// Canvas resolution the tree was built for.
    #[must_use]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// All nodes in paint order.
    #[must_use]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Nodes that belong in an exported image.
    pub fn exported_nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter().filter(|n| !n.is_chrome())
    }

    /// Number of chrome nodes.
    #[must_use]
    pub fn chrome_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_chrome()).count()
    }

    /// Serialize the tree to JSON, for debugging hosts.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> RenderResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| thumbnail_core::StudioError::Serialization(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thumbnail_core::{DocumentStore, GradientUpdate};

    fn mesh_doc() -> DocumentStore {
        let mut store = DocumentStore::new();
        store
            .update_gradient(GradientUpdate {
                kind: Some(GradientKind::Mesh),
                ..GradientUpdate::default()
            })
            .expect("mesh");
        store.add_mesh_point().expect("point");
        store.add_element(Zone::TopLeft).expect("text");
        store
    }

    #[test]
    fn test_background_comes_first() {
        let tree = RenderTree::build(&ThumbnailState::default(), &ChromeOptions::default());
        assert!(matches!(
            tree.nodes()[0].kind,
            NodeKind::Background(RenderableFill::Solid { .. })
        ));
    }

    #[test]
    fn test_chrome_is_tagged_ignore_on_export() {
        let store = mesh_doc();
        let tree = RenderTree::build(store.state(), &ChromeOptions::default());
        // Grid plus one handle.
        assert_eq!(tree.chrome_count(), 2);
        for node in tree.nodes() {
            let chrome_kind = matches!(
                node.kind,
                NodeKind::GridOverlay { .. } | NodeKind::MeshHandle { .. }
            );
            assert_eq!(chrome_kind, node.is_chrome());
        }
        assert_eq!(tree.exported_nodes().count(), 2);
    }

    #[test]
    fn test_handles_only_in_mesh_mode() {
        let mut store = mesh_doc();
        store
            .update_gradient(GradientUpdate {
                kind: Some(GradientKind::Linear),
                ..GradientUpdate::default()
            })
            .expect("linear");
        let tree = RenderTree::build(store.state(), &ChromeOptions::default());
        assert!(!tree
            .nodes()
            .iter()
            .any(|n| matches!(n.kind, NodeKind::MeshHandle { .. })));
    }

    #[test]
    fn test_no_chrome_option() {
        let store = mesh_doc();
        let tree = RenderTree::build(store.state(), &ChromeOptions::none());
        assert_eq!(tree.chrome_count(), 0);
    }

    #[test]
    fn test_handle_positions_in_pixels() {
        let store = mesh_doc();
        let tree = RenderTree::build(store.state(), &ChromeOptions::default());
        let handle = tree
            .nodes()
            .iter()
            .find_map(|n| match n.kind {
                NodeKind::MeshHandle { x, y, .. } => Some((x, y)),
                _ => None,
            })
            .expect("handle");
        assert!((handle.0 - 640.0).abs() < f32::EPSILON);
        assert!((handle.1 - 335.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_tree_serializes() {
        let store = mesh_doc();
        let json = RenderTree::build(store.state(), &ChromeOptions::default())
            .to_json()
            .expect("json");
        assert!(json.contains("\"ignore-on-export\""));
        assert!(json.contains("\"mesh-handle\""));
    }
}

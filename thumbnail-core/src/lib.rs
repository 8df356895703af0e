//! # Thumbnail Studio Core
//!
//! Document model and editing engine for 1280×670 thumbnails: a background
//! (solid, linear, radial or mesh gradient) and up to five text elements placed
//! in a 3×3 zone grid.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               thumbnail-core                │
//! ├─────────────────────────────────────────────┤
//! │  Document Store  │  Update Commands         │
//! │  - Snapshots     │  - Per-operation fields  │
//! │  - Invariants    │  - JSON messages         │
//! ├─────────────────────────────────────────────┤
//! │  Zone Layout     │  Background Resolver     │
//! │  - 3×3 grid      │  - Sorted stops          │
//! │  - Stack order   │  - Mesh glows            │
//! ├─────────────────────────────────────────────┤
//! │  Scale Resolver  │  Mesh Interaction        │
//! │  - Preview scale │  - Drag state machine    │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod background;
pub mod color;
pub mod command;
pub mod document;
pub mod element;
pub mod error;
pub mod fill;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod random;
pub mod store;

pub use background::{
    BackgroundConfig, BackgroundKind, GradientConfig, GradientKind, GradientStop, MeshPoint,
    MeshPointId, StopId,
};
pub use color::Color;
pub use command::{
    BackgroundUpdate, ElementUpdate, GradientUpdate, MeshPointUpdate, StopUpdate, StudioCommand,
    StyleUpdate,
};
pub use document::{Resolution, ThumbnailState, MAX_ELEMENTS};
pub use element::{
    ElementId, FontConfig, FontWeight, HorizontalAnchor, TextElement, VerticalAnchor, Zone,
    DEFAULT_TEXT_CONTENT,
};
pub use error::{StudioError, StudioResult};
pub use fill::{
    linear_endpoints, radial_radius, resolve_background, Glow, RenderableFill, ResolvedStop,
};
pub use geometry::{ExportTransform, Rect, ScaleResolver};
pub use interaction::{BoundingBox, DragState, MeshInteraction, PointerEvent, PointerPhase};
pub use layout::{Layout, PlacedText, ZoneLayout};
pub use random::{RandomizePolicy, Rng64};
pub use store::{DocumentStore, Snapshot};

/// Thumbnail core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! # Thumbnail Studio Renderer
//!
//! Turns document snapshots into previews and exported PNGs.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          ThumbnailState (snapshot)          │
//! ├─────────────────────────────────────────────┤
//! │  RenderTree: background, text, chrome       │
//! │  (chrome tagged ignore-on-export)           │
//! ├──────────────────────┬──────────────────────┤
//! │ Preview SVG          │ Export               │
//! │ (live scale, chrome) │ (1280×670, 1:1,      │
//! │                      │  resvg → PNG)        │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capture;
pub mod error;
pub mod export;
pub mod scene;
pub mod surface;
pub mod svg;

pub use capture::{Capture, ResvgCapture};
pub use error::{RenderError, RenderResult};
pub use export::{encode_png, ExportArtifact, ExportConfig, ExportGuard, ExportPipeline};
pub use scene::{ChromeOptions, ExportVisibility, NodeKind, RenderTree, SceneNode};
pub use surface::CanvasSurface;

//! Schema ERD graph module
//!
//! # Architecture
//!
//! ```text
//! ErdGraph (from /api/schema-graph/{domain}/erd)
//!        │
//!        ▼
//! selector (degree ranking or filter + one-hop expansion)
//!        │
//!        ▼
//! Selection (bounded nodes, induced edges)
//!        │
//!        ▼
//! LayoutEngine (force_sim → overlap → viewport_fit)
//!        │
//!        ▼
//! PositionMap ──► SvgRenderer
//! ```
//!
//! Selection and layout are pure functions of their inputs: no hidden
//! state, no randomness, safe to call from any thread.

pub mod density;
pub mod force_sim;
pub mod layout;
pub mod overlap;
pub mod render;
pub mod selector;
pub mod types;
pub mod viewport_fit;

pub use density::{canvas_height, Density, LayoutParams, CANVAS_WIDTH};
pub use layout::LayoutEngine;
pub use render::{EdgeCurve, RenderStyle, SvgRenderer};
pub use selector::{parse_filter_tokens, select, Selection, MAX_VISIBLE_EDGES, MAX_VISIBLE_NODES};
pub use types::*;

//! Schema ERD layout
//!
//! Selects a bounded, relevant subset of a schema relationship graph and lays
//! it out on a 2D canvas with a deterministic force-directed engine.
//!
//! The core (`graph::selector`, `graph::layout`) is pure and synchronous.
//! `api` fetches graphs from the migration backend, `explorer` ties filter,
//! density and layout together, and `graph::render` writes SVG.

pub mod api;
pub mod config;
pub mod error;
pub mod explorer;
pub mod graph;

pub use api::ApiClient;
pub use config::ErdConfig;
pub use error::{ErdError, Result};
pub use explorer::{ErdExplorer, ErdView, RelationshipRow};
pub use graph::{
    canvas_height,
    parse_filter_tokens,
    select,
    // Layout
    Density,
    // Wire types
    ErdEdge,
    ErdGraph,
    ErdNode,
    LayoutEngine,
    Point,
    PositionMap,
    SchemaDomain,
    Selection,
    // Rendering
    SvgRenderer,
};

//! Core ERD types
//!
//! Wire shapes match the `/api/schema-graph/{domain}/erd` payload:
//! `{ domain, nodes: [{id, label, column_count}], edges: [{source, target,
//! field, confidence, reason, cardinality?}] }`.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ErdError, Result};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Rendered node box width
pub const NODE_WIDTH: f64 = 190.0;

/// Rendered node box height
pub const NODE_HEIGHT: f64 = 66.0;

/// Cardinality shown when the payload omits one
pub const DEFAULT_CARDINALITY: &str = "1:N";

// =============================================================================
// NODES AND EDGES
// =============================================================================

/// A schema table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErdNode {
    /// Table name, unique within a graph
    pub id: String,

    #[serde(default)]
    pub label: String,

    /// Annotation only; never affects layout
    #[serde(default)]
    pub column_count: u32,
}

impl ErdNode {
    pub fn new(id: impl Into<String>, column_count: u32) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            column_count,
        }
    }
}

/// An inferred relationship between two tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErdEdge {
    pub source: String,
    pub target: String,

    /// Join column
    #[serde(default)]
    pub field: String,

    /// Categorical: "high", "medium", "low", "inferred", ...
    #[serde(default)]
    pub confidence: String,

    #[serde(default)]
    pub reason: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<String>,
}

impl ErdEdge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            field: field.into(),
            confidence: String::new(),
            reason: String::new(),
            cardinality: None,
        }
    }

    /// Builder: set confidence and reason
    pub fn with_inference(mut self, confidence: impl Into<String>, reason: impl Into<String>) -> Self {
        self.confidence = confidence.into();
        self.reason = reason.into();
        self
    }

    /// Builder: set cardinality
    pub fn with_cardinality(mut self, cardinality: impl Into<String>) -> Self {
        self.cardinality = Some(cardinality.into());
        self
    }

    /// Cardinality label, defaulting to "1:N"
    pub fn cardinality_label(&self) -> &str {
        match self.cardinality.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => DEFAULT_CARDINALITY,
        }
    }
}

/// Full graph as served by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErdGraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default)]
    pub nodes: Vec<ErdNode>,

    #[serde(default)]
    pub edges: Vec<ErdEdge>,
}

impl ErdGraph {
    pub fn new(nodes: Vec<ErdNode>, edges: Vec<ErdEdge>) -> Self {
        Self {
            domain: None,
            nodes,
            edges,
        }
    }

    /// Parse an ERD payload
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse an ERD payload from a reader (file, stdin)
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// =============================================================================
// POSITIONS
// =============================================================================

/// Top-left corner of a node box on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Centre of the node box whose top-left corner is this point
    pub fn box_center(self) -> Self {
        Self::new(self.x + NODE_WIDTH / 2.0, self.y + NODE_HEIGHT / 2.0)
    }
}

/// Positions keyed by node id, ordered for stable output
pub type PositionMap = BTreeMap<String, Point>;

// =============================================================================
// SCHEMA DOMAIN
// =============================================================================

/// Which side of the migration a schema graph describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaDomain {
    Source,
    #[default]
    Target,
}

impl SchemaDomain {
    /// Path segment used by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaDomain::Source => "source",
            SchemaDomain::Target => "target",
        }
    }
}

impl fmt::Display for SchemaDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaDomain {
    type Err = ErdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Ok(SchemaDomain::Source),
            "target" => Ok(SchemaDomain::Target),
            other => Err(ErdError::config(format!(
                "domain must be source or target, got '{other}'"
            ))),
        }
    }
}

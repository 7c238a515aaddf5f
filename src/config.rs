//! ERD explorer configuration
//!
//! Loaded from an optional YAML file (`ERD_CONFIG`), then overridden by
//! environment variables. Every key has a default so an empty file or no
//! file at all is valid.
//!
//! ```yaml
//! api_base_url: http://localhost:8000
//! domain: target
//! density: sparse
//! max_nodes: 90
//! max_edges: 300
//! canvas_width: 2200
//! max_relationship_rows: 450
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ErdError, Result};
use crate::graph::{Density, SchemaDomain, CANVAS_WIDTH, MAX_VISIBLE_EDGES, MAX_VISIBLE_NODES};

/// Rows shown in the relationship list
pub const MAX_RELATIONSHIP_ROWS: usize = 450;

pub const ENV_CONFIG_PATH: &str = "ERD_CONFIG";
pub const ENV_API_URL: &str = "ERD_API_URL";
pub const ENV_DOMAIN: &str = "ERD_DOMAIN";
pub const ENV_DENSITY: &str = "ERD_DENSITY";
pub const ENV_MAX_NODES: &str = "ERD_MAX_NODES";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErdConfig {
    /// Backend base URL serving `/api/schema-graph/{domain}/erd`
    pub api_base_url: String,
    pub domain: SchemaDomain,
    pub density: Density,
    pub max_nodes: usize,
    pub max_edges: usize,
    pub canvas_width: f64,
    pub max_relationship_rows: usize,
}

impl Default for ErdConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            domain: SchemaDomain::Target,
            density: Density::Sparse,
            max_nodes: MAX_VISIBLE_NODES,
            max_edges: MAX_VISIBLE_EDGES,
            canvas_width: CANVAS_WIDTH,
            max_relationship_rows: MAX_RELATIONSHIP_ROWS,
        }
    }
}

impl ErdConfig {
    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading ERD configuration from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML text; blank text yields defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// File named by `ERD_CONFIG` (or defaults), then env overrides
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `ERD_*` overrides from a lookup. Unparseable values are logged
    /// and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(raw) = lookup(ENV_DOMAIN) {
            match raw.parse() {
                Ok(domain) => self.domain = domain,
                Err(e) => warn!("Ignoring {ENV_DOMAIN}: {e}"),
            }
        }
        if let Some(raw) = lookup(ENV_DENSITY) {
            match raw.parse() {
                Ok(density) => self.density = density,
                Err(e) => warn!("Ignoring {ENV_DENSITY}: {e}"),
            }
        }
        if let Some(raw) = lookup(ENV_MAX_NODES) {
            match raw.trim().parse() {
                Ok(n) => self.max_nodes = n,
                Err(e) => warn!("Ignoring {ENV_MAX_NODES}={raw}: {e}"),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ErdError::config("api_base_url must not be empty"));
        }
        if !(self.canvas_width.is_finite() && self.canvas_width > 0.0) {
            return Err(ErdError::config(format!(
                "canvas_width must be positive, got {}",
                self.canvas_width
            )));
        }
        Ok(())
    }
}

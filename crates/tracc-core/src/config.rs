use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::VariableCatalog;
use crate::error::Result;

/// Where the datasets come from and which variables are mapped.
/// Defaults reproduce the published deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Candidate locations of the DRIAS table, tried in order.
    pub data_sources: Vec<String>,
    /// Candidate locations of the commune contours, tried in order.
    pub geometry_sources: Vec<String>,
    /// JSON variable catalog; the built-in DRIAS set when absent.
    pub variables: Option<PathBuf>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            data_sources: vec!["data/communes_drias.json".into()],
            geometry_sources: vec![
                "data/communes.geojson".into(),
                "https://raw.githubusercontent.com/gregoiredavid/france-geojson/master/communes.geojson"
                    .into(),
            ],
            variables: None,
        }
    }
}

impl AtlasConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Replace the source lists with command-line candidates, when any.
    pub fn with_sources(mut self, data: Vec<String>, geometry: Vec<String>) -> Self {
        if !data.is_empty() {
            self.data_sources = data;
        }
        if !geometry.is_empty() {
            self.geometry_sources = geometry;
        }
        self
    }

    pub fn catalog(&self) -> Result<VariableCatalog> {
        match &self.variables {
            Some(p) => VariableCatalog::from_json(&std::fs::read(p)?),
            None => Ok(VariableCatalog::drias()),
        }
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::key::normalize_key;

/// A GeoJSON feature collection of commune contours.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// One commune polygon. The geometry is passed through untouched to the
/// renderer; only its bounding box is ever read here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub geometry: Option<Value>,
}

impl Feature {
    pub fn join_key(&self) -> String {
        normalize_key(&self.properties)
    }

    /// Bounding box of every coordinate pair in the geometry.
    pub fn bounds(&self) -> Option<Bounds> {
        let coords = self.geometry.as_ref()?.get("coordinates")?;
        let mut acc: Option<Bounds> = None;
        visit_positions(coords, &mut |lon, lat| {
            acc = Some(match acc {
                Some(b) => b.extend(lon, lat),
                None => Bounds { min_lon: lon, min_lat: lat, max_lon: lon, max_lat: lat },
            });
        });
        acc
    }
}

impl FeatureCollection {
    pub fn from_json(bytes: &[u8]) -> crate::error::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    fn extend(self, lon: f64, lat: f64) -> Self {
        Self {
            min_lon: self.min_lon.min(lon),
            min_lat: self.min_lat.min(lat),
            max_lon: self.max_lon.max(lon),
            max_lat: self.max_lat.max(lat),
        }
    }

    pub fn union(self, other: Bounds) -> Self {
        self.extend(other.min_lon, other.min_lat)
            .extend(other.max_lon, other.max_lat)
    }
}

/// Walk nested coordinate arrays down to `[lon, lat, ..]` positions.
fn visit_positions(v: &Value, f: &mut impl FnMut(f64, f64)) {
    let Some(items) = v.as_array() else { return };
    match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(lon), Some(lat)) => f(lon, lat),
        _ => {
            for item in items {
                visit_positions(item, f);
            }
        }
    }
}

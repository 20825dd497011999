use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One commune row of the DRIAS projection table.
///
/// Deserialized from a flat JSON object: `code_insee` and `nom_offici` are
/// required, `population` is optional, and every other field holding a finite
/// number becomes a variable value. Anything else (null, strings, NaN) is
/// treated as missing, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct ClimateRecord {
    pub code_insee: String,
    pub nom_offici: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl ClimateRecord {
    pub fn new(code_insee: impl Into<String>, nom_offici: impl Into<String>) -> Self {
        Self {
            code_insee: code_insee.into(),
            nom_offici: nom_offici.into(),
            population: None,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: f64) -> Self {
        if value.is_finite() {
            self.values.insert(key.into(), value);
        }
        self
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = Some(population);
        self
    }

    /// Value of `key`, or `None` when missing.
    #[inline]
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

// ── Serde helpers ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawRecord {
    code_insee: String,
    nom_offici: String,
    #[serde(default)]
    population: Value,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl From<RawRecord> for ClimateRecord {
    fn from(raw: RawRecord) -> Self {
        let values = raw
            .rest
            .into_iter()
            .filter_map(|(k, v)| v.as_f64().filter(|x| x.is_finite()).map(|x| (k, x)))
            .collect();
        let population = match raw.population {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|x| x.is_finite() && *x >= 0.0)
                    .map(|x| x.round() as u64)
            }),
            _ => None,
        };
        Self {
            code_insee: raw.code_insee,
            nom_offici: raw.nom_offici,
            population,
            values,
        }
    }
}

/// Parse the tabular dataset (a JSON array of records).
pub fn parse_records(bytes: &[u8]) -> crate::error::Result<Vec<ClimateRecord>> {
    Ok(serde_json::from_slice(bytes)?)
}

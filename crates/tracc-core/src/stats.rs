//! National descriptive statistics and quantile class breaks.
//!
//! Percentiles and breaks use the nearest-rank rule on the ascending sample:
//! `sorted[floor(n * p)]`, no interpolation.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::catalog::VariableCatalog;
use crate::record::ClimateRecord;

/// Interior thresholds of the 5-class (quintile) partition.
pub const QUINTILE_BREAKS: usize = 4;
/// Interior thresholds of the 3-class (tertile) partition.
pub const TERTILE_BREAKS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    /// Number of non-missing values the statistics were computed over.
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p5: f64,
    pub p95: f64,
    pub breaks5: [f64; QUINTILE_BREAKS],
    pub breaks3: [f64; TERTILE_BREAKS],
}

/// Statistics of `key` over `records`, skipping records where it is missing.
///
/// Returns `None` when no record carries the variable.
pub fn compute_stats(records: &[ClimateRecord], key: &str) -> Option<Stats> {
    let values: Vec<f64> = records.iter().filter_map(|r| r.value(key)).collect();
    stats_from_values(values)
}

/// Same as [`compute_stats`] over an already-extracted sample.
pub fn stats_from_values(mut values: Vec<f64>) -> Option<Stats> {
    values.retain(|v| v.is_finite());
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    Some(Stats {
        count: n,
        min: values[0],
        max: values[n - 1],
        mean,
        p5: percentile(&values, 0.05),
        p95: percentile(&values, 0.95),
        breaks5: quantile_breaks::<QUINTILE_BREAKS>(&values),
        breaks3: quantile_breaks::<TERTILE_BREAKS>(&values),
    })
}

/// Nearest-rank percentile of an ascending, non-empty sample.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = (sorted.len() as f64 * p).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// `B` interior thresholds splitting an ascending, non-empty sample into
/// `B + 1` equal-count classes. Threshold `i` (1-based) is `sorted[floor(n*i/k)]`.
pub fn quantile_breaks<const B: usize>(sorted: &[f64]) -> [f64; B] {
    let n = sorted.len();
    let k = B + 1;
    std::array::from_fn(|i| sorted[n * (i + 1) / k])
}

// ── Cache ─────────────────────────────────────────────────────────────────────

/// Per-variable statistics, computed once when the dataset loads.
///
/// A variable absent from every record maps to `None` and is rendered as
/// all-missing downstream.
#[derive(Debug, Clone, Default)]
pub struct StatsCache {
    by_key: HashMap<String, Option<Stats>>,
}

impl StatsCache {
    pub fn build(records: &[ClimateRecord], catalog: &VariableCatalog) -> Self {
        let keys: Vec<&str> = catalog.iter().map(|v| v.key.as_str()).collect();

        #[cfg(feature = "threading")]
        let computed: Vec<(String, Option<Stats>)> = {
            use rayon::prelude::*;
            keys.par_iter()
                .map(|k| (k.to_string(), compute_stats(records, k)))
                .collect()
        };
        #[cfg(not(feature = "threading"))]
        let computed: Vec<(String, Option<Stats>)> = keys
            .iter()
            .map(|k| (k.to_string(), compute_stats(records, k)))
            .collect();

        for (key, stats) in &computed {
            match stats {
                Some(s) => debug!(variable = %key, n = s.count, min = s.min, max = s.max, "stats computed"),
                None => debug!(variable = %key, "no values; variable renders as missing"),
            }
        }
        Self { by_key: computed.into_iter().collect() }
    }

    /// Statistics of `key`; `None` for degenerate or unknown variables.
    pub fn get(&self, key: &str) -> Option<&Stats> {
        self.by_key.get(key).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

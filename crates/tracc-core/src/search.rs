//! Commune lookup by name fragment or INSEE code prefix.

use serde::Serialize;

use crate::geometry::{Bounds, FeatureCollection};
use crate::join::JoinIndex;
use crate::record::ClimateRecord;

/// Shorter queries return nothing.
pub const MIN_QUERY_CHARS: usize = 2;
/// Results are truncated to this many hits.
pub const MAX_RESULTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    pub code_insee: &'a str,
    pub name: &'a str,
    /// Département, the first two characters of the code.
    pub departement: &'a str,
}

impl<'a> From<&'a ClimateRecord> for SearchHit<'a> {
    fn from(r: &'a ClimateRecord) -> Self {
        let departement = r
            .code_insee
            .char_indices()
            .nth(2)
            .map_or(r.code_insee.as_str(), |(i, _)| &r.code_insee[..i]);
        Self { code_insee: &r.code_insee, name: &r.nom_offici, departement }
    }
}

/// First matches in dataset order: names containing the query or codes
/// starting with it, both case-insensitive. No ranking.
pub fn search<'a>(index: &'a JoinIndex, query: &str) -> Vec<SearchHit<'a>> {
    let q = query.trim().to_lowercase();
    if q.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }
    index
        .records()
        .iter()
        .filter(|r| {
            r.nom_offici.to_lowercase().contains(&q)
                || r.code_insee.to_lowercase().starts_with(&q)
        })
        .take(MAX_RESULTS)
        .map(SearchHit::from)
        .collect()
}

/// Map viewport request produced by a search selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomTarget {
    pub bounds: Bounds,
    pub max_zoom: u8,
    pub padding_px: u32,
}

/// Bounds of every feature carrying `key`, with the fit options used for a
/// search selection. `None` when no feature matches or none has coordinates.
pub fn zoom_target(features: &FeatureCollection, key: &str) -> Option<ZoomTarget> {
    let bounds = features
        .features
        .iter()
        .filter(|f| f.join_key() == key)
        .filter_map(|f| f.bounds())
        .reduce(Bounds::union)?;
    Some(ZoomTarget { bounds, max_zoom: 12, padding_px: 60 })
}

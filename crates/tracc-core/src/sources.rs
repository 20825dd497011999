//! Dataset loading from an ordered list of candidate sources.
//!
//! Candidates are tried in order and the first one that answers and parses
//! wins; later candidates are never contacted. When all of them fail the load
//! is fatal: nothing is rendered from partial input.

use std::fmt::Display;
use std::path::Path;

use tracing::{info, warn};

use crate::atlas::ClimateAtlas;
use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::geometry::FeatureCollection;
use crate::join::JoinReport;
use crate::record::parse_records;

/// Try `attempt` on each candidate in order, returning the index and output of
/// the first success.
pub fn first_success<S, T, E, F>(dataset: &str, candidates: &[S], mut attempt: F) -> Result<(usize, T)>
where
    S: Display,
    E: Display,
    F: FnMut(&S) -> std::result::Result<T, E>,
{
    for (i, candidate) in candidates.iter().enumerate() {
        match attempt(candidate) {
            Ok(out) => {
                info!(dataset, source = %candidate, "loaded");
                return Ok((i, out));
            }
            Err(e) => warn!(dataset, source = %candidate, error = %e, "source unavailable"),
        }
    }
    Err(AtlasError::NoSourceAvailable {
        dataset: dataset.to_string(),
        tried: candidates.iter().map(ToString::to_string).collect(),
    })
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Read a local path, or fetch an `http(s)://` URL when built with `fetch`.
pub fn read_source(source: &str) -> Result<Vec<u8>> {
    if is_remote(source) {
        return fetch_remote(source);
    }
    Ok(std::fs::read(Path::new(source))?)
}

#[cfg(feature = "fetch")]
fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}

#[cfg(not(feature = "fetch"))]
fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    Err(AtlasError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!("{url}: built without the `fetch` feature"),
    )))
}

/// Read and parse the first candidate that yields valid data.
pub fn load_first<T>(
    dataset: &str,
    candidates: &[String],
    parse: impl Fn(&[u8]) -> Result<T>,
) -> Result<T> {
    first_success(dataset, candidates, |src| read_source(src).and_then(|b| parse(&b)))
        .map(|(_, out)| out)
}

/// Both datasets, joined once.
#[derive(Debug, Clone)]
pub struct LoadedAtlas {
    pub atlas: ClimateAtlas,
    pub features: FeatureCollection,
    pub join: JoinReport,
}

/// Startup load: climate table first, then contours, each from its first
/// working source. Either dataset failing entirely aborts the load.
pub fn load_atlas(config: &AtlasConfig) -> Result<LoadedAtlas> {
    let catalog = config.catalog()?;
    let records = load_first("climate data", &config.data_sources, parse_records)?;
    let features = load_first("geometry", &config.geometry_sources, FeatureCollection::from_json)?;
    let atlas = ClimateAtlas::new(records, catalog);
    let join = atlas.join_report(&features);
    Ok(LoadedAtlas { atlas, features, join })
}

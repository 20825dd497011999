//! TRACC Atlas core: join, classification and view state behind the DRIAS
//! commune choropleth.
//!
//! Pipeline:
//!   climate table → `JoinIndex` + `StatsCache` (once per load) →
//!   `ViewController` transitions → per-feature fill via `ClimateAtlas`.
//!
//! Rendering, DOM and tiles belong to the host map widget; this crate only
//! hands it colors, tooltips, legends and panels as plain data.

pub mod atlas;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod geometry;
pub mod join;
pub mod key;
pub mod legend;
pub mod palette;
pub mod record;
pub mod search;
pub mod sources;
pub mod stats;
pub mod view;

pub use atlas::{ClimateAtlas, FillLayer, InfoPanel, RenderFrame, Tooltip};
pub use catalog::{BivariateRole, Category, VariableCatalog, VariableDef};
pub use classify::{bivariate_class, quintile_class, tertile_class, BivariateCell};
pub use config::AtlasConfig;
pub use error::{AtlasError, CatalogError, Result};
pub use geometry::{Bounds, Feature, FeatureCollection};
pub use join::{JoinIndex, JoinReport};
pub use key::normalize_key;
pub use legend::{Legend, StatsPanel};
pub use palette::Palette;
pub use record::ClimateRecord;
pub use search::{search, zoom_target, SearchHit, ZoomTarget};
pub use sources::{load_atlas, LoadedAtlas};
pub use stats::{compute_stats, Stats, StatsCache};
pub use view::{Mode, ViewController, ViewState};

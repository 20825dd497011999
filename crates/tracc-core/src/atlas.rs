//! The loaded dataset: join index, stats cache and catalog, plus everything a
//! renderer asks per feature (fill, tooltip, info panel).

use serde::Serialize;

use crate::catalog::{BivariateRole, VariableCatalog};
use crate::classify::{bivariate_class, bivariate_color, quintile_class, univariate_color};
use crate::format::{format_number, format_population, format_with_unit, MISSING};
use crate::geometry::FeatureCollection;
use crate::join::{JoinIndex, JoinReport};
use crate::legend::{Legend, StatsPanel};
use crate::palette::UNJOINED_COLOR;
use crate::record::ClimateRecord;
use crate::search::{search, SearchHit};
use crate::stats::StatsCache;
use crate::view::ViewState;

/// Immutable after construction; share it by reference (or `Arc`) between
/// the map fill, legend and panels.
#[derive(Debug, Clone)]
pub struct ClimateAtlas {
    catalog: VariableCatalog,
    index: JoinIndex,
    stats: StatsCache,
}

impl ClimateAtlas {
    /// Join and classify `records` once.
    pub fn new(records: Vec<ClimateRecord>, catalog: VariableCatalog) -> Self {
        let stats = StatsCache::build(&records, &catalog);
        let index = JoinIndex::build(records);
        Self { catalog, index, stats }
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    pub fn index(&self) -> &JoinIndex {
        &self.index
    }

    pub fn stats(&self) -> &StatsCache {
        &self.stats
    }

    pub fn record(&self, key: &str) -> Option<&ClimateRecord> {
        self.index.lookup(key)
    }

    /// Fill color of the feature with canonical key `key`.
    pub fn fill_color(&self, view: &ViewState, key: &str) -> &'static str {
        match self.index.lookup(key) {
            Some(r) => self.record_color(view, r),
            None => UNJOINED_COLOR,
        }
    }

    fn record_color(&self, view: &ViewState, r: &ClimateRecord) -> &'static str {
        if view.is_bivariate() {
            let x = &self.catalog.axis(BivariateRole::X).key;
            let y = &self.catalog.axis(BivariateRole::Y).key;
            let cell = bivariate_class(r.value(x), r.value(y), self.stats.get(x), self.stats.get(y));
            return bivariate_color(cell);
        }
        match self.catalog.get(&view.variable) {
            Some(var) => {
                let class = quintile_class(r.value(&var.key), self.stats.get(&var.key));
                univariate_color(class, var.palette)
            }
            None => univariate_color(None, self.catalog.first().palette),
        }
    }

    /// Hover payload; `None` for features without climate data.
    pub fn tooltip(&self, view: &ViewState, key: &str) -> Option<Tooltip> {
        let r = self.index.lookup(key)?;
        let lines = if view.is_bivariate() {
            [BivariateRole::X, BivariateRole::Y]
                .into_iter()
                .map(|role| {
                    let var = self.catalog.axis(role);
                    let name = var.label.split_whitespace().next().unwrap_or(&var.label);
                    let value = r.value(&var.key).map_or_else(|| MISSING.to_string(), |v| format_number(v, 1));
                    format!("{name} : {value} {}", var.short_unit())
                })
                .collect()
        } else {
            let var = self.catalog.get(&view.variable)?;
            vec![format_with_unit(r.value(&var.key), var)]
        };
        Some(Tooltip { name: r.nom_offici.clone(), lines })
    }

    /// Click payload: identity line plus every variable.
    pub fn info_panel(&self, view: &ViewState, key: &str) -> Option<InfoPanel> {
        let r = self.index.lookup(key)?;
        let rows = self
            .catalog
            .iter()
            .map(|var| InfoRow {
                label: var.label.clone(),
                value: format_with_unit(r.value(&var.key), var),
                highlight: view.is_bivariate() && var.is_bivariate(),
            })
            .collect();
        Some(InfoPanel {
            name: r.nom_offici.clone(),
            subtitle: format!(
                "Code INSEE : {} · Population : {} hab.",
                r.code_insee,
                format_population(r.population)
            ),
            rows,
        })
    }

    pub fn legend(&self, view: &ViewState) -> Option<Legend> {
        Legend::for_view(view, &self.catalog, &self.stats)
    }

    pub fn stats_panel(&self, view: &ViewState) -> Option<StatsPanel> {
        StatsPanel::for_view(view, &self.catalog, &self.stats)
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        search(&self.index, query)
    }

    pub fn join_report(&self, features: &FeatureCollection) -> JoinReport {
        self.index.join_report(&features.features)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub name: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoRow {
    pub label: String,
    pub value: String,
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoPanel {
    pub name: String,
    pub subtitle: String,
    pub rows: Vec<InfoRow>,
}

// ── Fill layer ────────────────────────────────────────────────────────────────

/// Current fill of every rendered feature, in feature order.
///
/// Keys are normalized once; each `recolor` is a full pass over the snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FillLayer {
    keys: Vec<String>,
    fills: Vec<&'static str>,
}

impl FillLayer {
    pub fn new(features: &FeatureCollection) -> Self {
        let keys: Vec<String> = features.features.iter().map(|f| f.join_key()).collect();
        let fills = vec![UNJOINED_COLOR; keys.len()];
        Self { keys, fills }
    }

    pub fn recolor(&mut self, atlas: &ClimateAtlas, view: &ViewState) {
        #[cfg(feature = "threading")]
        {
            use rayon::prelude::*;
            self.fills = self.keys.par_iter().map(|k| atlas.fill_color(view, k)).collect();
        }
        #[cfg(not(feature = "threading"))]
        {
            self.fills = self.keys.iter().map(|k| atlas.fill_color(view, k)).collect();
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn fills(&self) -> &[&'static str] {
        &self.fills
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// ── Render frame ──────────────────────────────────────────────────────────────

/// Everything a renderer needs for one view, derived together so the fills,
/// legend and panel never disagree with the state they were drawn for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub state: ViewState,
    pub fills: Vec<&'static str>,
    pub legend: Option<Legend>,
    pub stats: Option<StatsPanel>,
}

impl ClimateAtlas {
    /// Recolor `layer` for `view`, then snapshot it with the matching legend
    /// and stats panel.
    pub fn render(&self, view: &ViewState, layer: &mut FillLayer) -> RenderFrame {
        layer.recolor(self, view);
        RenderFrame {
            state: view.clone(),
            fills: layer.fills().to_vec(),
            legend: self.legend(view),
            stats: self.stats_panel(view),
        }
    }
}

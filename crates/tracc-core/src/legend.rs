//! Legend and national-statistics panel models.
//!
//! Plain serializable data; markup is the renderer's job.

use serde::Serialize;

use crate::catalog::{BivariateRole, VariableCatalog, VariableDef};
use crate::format::{format_number, format_value, MISSING};
use crate::palette::{BIVARIATE_COLORS, NO_DATA_COLOR};
use crate::stats::{Stats, StatsCache};
use crate::view::ViewState;

const NBSP: char = '\u{a0}';
const TERTILE_LABELS: [&str; 3] = ["faible", "moyenne", "forte"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub color: &'static str,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BivariateLegendCell {
    pub color: &'static str,
    pub row: usize,
    pub col: usize,
    /// e.g. `Intensité : forte | Fréquence : faible`
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Legend {
    Univariate {
        title: String,
        method: String,
        items: Vec<LegendItem>,
    },
    Bivariate {
        title: String,
        method: String,
        /// Top row (high frequency) first, columns low → high intensity.
        cells: Vec<BivariateLegendCell>,
    },
}

impl Legend {
    pub fn for_view(view: &ViewState, catalog: &VariableCatalog, cache: &StatsCache) -> Option<Self> {
        if view.is_bivariate() {
            return Some(Self::bivariate(
                catalog.axis(BivariateRole::X),
                catalog.axis(BivariateRole::Y),
            ));
        }
        let var = catalog.get(&view.variable)?;
        Some(Self::univariate(var, cache.get(&var.key)))
    }

    /// Five quintile classes: `< b0`, `b0 – b1`, …, `≥ b3`.
    pub fn univariate(var: &VariableDef, stats: Option<&Stats>) -> Self {
        let title = var.label.clone();
        let method = "Quintiles — 5 classes à effectifs égaux".to_string();
        let colors = var.palette.colors();
        let Some(s) = stats else {
            let items = vec![LegendItem { color: NO_DATA_COLOR, label: MISSING.to_string() }];
            return Legend::Univariate { title, method, items };
        };

        let b = s.breaks5;
        let fmt = |v: f64| format_number(v, var.decimals);
        let unit = &var.unit;
        let labels = [
            format!("< {}{NBSP}{unit}", fmt(b[0])),
            format!("{} – {}{NBSP}{unit}", fmt(b[0]), fmt(b[1])),
            format!("{} – {}{NBSP}{unit}", fmt(b[1]), fmt(b[2])),
            format!("{} – {}{NBSP}{unit}", fmt(b[2]), fmt(b[3])),
            format!("≥ {}{NBSP}{unit}", fmt(b[3])),
        ];
        let items = labels
            .into_iter()
            .zip(colors.iter())
            .map(|(label, &color)| LegendItem { color, label })
            .collect();
        Legend::Univariate { title, method, items }
    }

    pub fn bivariate(x: &VariableDef, y: &VariableDef) -> Self {
        let x_name = axis_name(x);
        let y_name = axis_name(y);
        let cells = [2usize, 1, 0]
            .into_iter()
            .flat_map(|row| (0..3).map(move |col| (row, col)))
            .map(|(row, col)| BivariateLegendCell {
                color: BIVARIATE_COLORS[row][col],
                row,
                col,
                title: format!(
                    "{x_name}{NBSP}: {} | {y_name}{NBSP}: {}",
                    TERTILE_LABELS[col], TERTILE_LABELS[row]
                ),
            })
            .collect();
        Legend::Bivariate {
            title: format!("{x_name} × {y_name}"),
            method: "Tertiles sur chaque axe — 9 classes".to_string(),
            cells,
        }
    }
}

/// Short axis name: the first word of the label (`Intensité des pluies…` → `Intensité`).
fn axis_name(var: &VariableDef) -> &str {
    var.label.split_whitespace().next().unwrap_or(&var.label)
}

// ── National statistics ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatItem {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsPanel {
    pub title: String,
    pub items: Vec<StatItem>,
}

impl StatsPanel {
    pub fn for_view(view: &ViewState, catalog: &VariableCatalog, cache: &StatsCache) -> Option<Self> {
        if view.is_bivariate() {
            return Some(Self::bivariate(catalog, cache));
        }
        let var = catalog.get(&view.variable)?;
        Some(Self::univariate(var, cache.get(&var.key)))
    }

    pub fn univariate(var: &VariableDef, stats: Option<&Stats>) -> Self {
        let item = |v: Option<f64>, label: &str| StatItem {
            value: format_value(v, var),
            label: label.to_string(),
        };
        Self {
            title: format!("Statistiques nationales — {}", var.label),
            items: vec![
                item(stats.map(|s| s.min), "Min"),
                item(stats.map(|s| s.mean), "Moyenne"),
                item(stats.map(|s| s.max), "Max"),
            ],
        }
    }

    /// Intensity mean and max, frequency mean, one decimal each.
    pub fn bivariate(catalog: &VariableCatalog, cache: &StatsCache) -> Self {
        let x = catalog.axis(BivariateRole::X);
        let y = catalog.axis(BivariateRole::Y);
        let xs = cache.get(&x.key);
        let ys = cache.get(&y.key);
        let one = |v: Option<f64>| v.map_or_else(|| MISSING.to_string(), |v| format_number(v, 1));
        let x_name = axis_name(x);
        let y_name = axis_name(y);
        Self {
            title: "Statistiques nationales".to_string(),
            items: vec![
                StatItem { value: one(xs.map(|s| s.mean)), label: format!("{x_name} moy. ({})", x.short_unit()) },
                StatItem { value: one(xs.map(|s| s.max)), label: format!("{x_name} max.") },
                StatItem { value: one(ys.map(|s| s.mean)), label: format!("{y_name} moy. ({})", y.short_unit()) },
            ],
        }
    }
}

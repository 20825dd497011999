//! Indicator definitions: what can be mapped, how it is labelled and colored.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::palette::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Seasonal and annual rainfall totals.
    Cumuls,
    /// Extreme-rain intensity and frequency.
    Intenses,
}

/// Axis of the bivariate map a variable is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BivariateRole {
    /// Columns of the color matrix (intensity).
    X,
    /// Rows of the color matrix (frequency).
    Y,
}

impl BivariateRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            BivariateRole::X => "x",
            BivariateRole::Y => "y",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    pub key: String,
    pub label: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    pub unit: String,
    /// Compact unit for tooltips and panel labels; `unit` when absent.
    #[serde(default, alias = "shortUnit", skip_serializing_if = "Option::is_none")]
    pub short_unit: Option<String>,
    pub palette: Palette,
    pub category: Category,
    #[serde(default, alias = "bivarRole", skip_serializing_if = "Option::is_none")]
    pub bivariate_role: Option<BivariateRole>,
    /// Digits after the decimal point when displayed; 0 rounds to an integer.
    #[serde(default)]
    pub decimals: u8,
}

impl VariableDef {
    #[allow(clippy::too_many_arguments)]
    fn new(
        key: &str,
        label: &str,
        description: &str,
        unit: &str,
        palette: Palette,
        category: Category,
        bivariate_role: Option<BivariateRole>,
        decimals: u8,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: description.into(),
            unit: unit.into(),
            short_unit: None,
            palette,
            category,
            bivariate_role,
            decimals,
        }
    }

    fn with_short_unit(mut self, short_unit: &str) -> Self {
        self.short_unit = Some(short_unit.into());
        self
    }

    pub fn is_bivariate(&self) -> bool {
        self.bivariate_role.is_some()
    }

    pub fn short_unit(&self) -> &str {
        self.short_unit.as_deref().unwrap_or(&self.unit)
    }
}

/// Validated, ordered list of variables.
///
/// Invariants: at least one variable, unique keys, exactly one `x` and one `y`
/// bivariate axis. Order is display order; the first entry is the initial
/// selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VariableCatalog {
    variables: Vec<VariableDef>,
}

impl VariableCatalog {
    pub fn new(variables: Vec<VariableDef>) -> std::result::Result<Self, CatalogError> {
        if variables.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for v in &variables {
            if !seen.insert(v.key.as_str()) {
                return Err(CatalogError::DuplicateKey(v.key.clone()));
            }
        }
        for role in [BivariateRole::X, BivariateRole::Y] {
            let found = variables
                .iter()
                .filter(|v| v.bivariate_role == Some(role))
                .count();
            if found != 1 {
                return Err(CatalogError::BivariateAxis { role: role.as_str(), found });
            }
        }
        Ok(Self { variables })
    }

    /// The six DRIAS rainfall indicators projected under the +4 °C warming level.
    pub fn drias() -> Self {
        use BivariateRole::{X, Y};
        use Category::{Cumuls, Intenses};
        let variables = vec![
            VariableDef::new("drias_Cumu", "Cumul annuel",
                "Précipitations totales annuelles projetées", "mm/an",
                Palette::Blues, Cumuls, None, 0),
            VariableDef::new("drias_Cu_1", "Cumul hivernal",
                "Précipitations en saison froide (DJF)", "mm",
                Palette::Purples, Cumuls, None, 0),
            VariableDef::new("drias_Cu_2", "Cumul printanier",
                "Précipitations au printemps (MAM)", "mm",
                Palette::Greens, Cumuls, None, 0),
            VariableDef::new("drias_Cu_3", "Cumul estival",
                "Précipitations en été (JJA), pluies convectives", "mm",
                Palette::Oranges, Cumuls, None, 0),
            VariableDef::new("drias_Inte", "Intensité des pluies intenses",
                "Intensité maximale journalière projetée sous +4°C", "mm/j",
                Palette::Reds, Intenses, Some(X), 0),
            VariableDef::new("drias_Fré", "Fréquence des pluies intenses",
                "Nombre d'épisodes intenses projetés par an sous +4°C", "épisodes/an",
                Palette::Yellows, Intenses, Some(Y), 1)
                .with_short_unit("ép/an"),
        ];
        Self { variables }
    }

    /// Load and validate a catalog from a JSON array of definitions.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let variables: Vec<VariableDef> = serde_json::from_slice(bytes)?;
        Ok(Self::new(variables)?)
    }

    pub fn get(&self, key: &str) -> Option<&VariableDef> {
        self.variables.iter().find(|v| v.key == key)
    }

    pub fn first(&self) -> &VariableDef {
        &self.variables[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VariableDef> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// The variable bound to `role`. Always present once validated.
    pub fn axis(&self, role: BivariateRole) -> &VariableDef {
        self.variables
            .iter()
            .find(|v| v.bivariate_role == Some(role))
            .unwrap_or_else(|| unreachable!("catalog validated with one {} axis", role.as_str()))
    }
}

impl Default for VariableCatalog {
    fn default() -> Self {
        Self::drias()
    }
}

impl<'a> IntoIterator for &'a VariableCatalog {
    type Item = &'a VariableDef;
    type IntoIter = std::slice::Iter<'a, VariableDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}

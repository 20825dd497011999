//! Color ramps for the choropleth fill.

use serde::{Deserialize, Serialize};

/// Fill of a joined commune whose value is missing for the active variable.
pub const NO_DATA_COLOR: &str = "#333333";

/// Fill of a geometry feature with no climate record at all.
pub const UNJOINED_COLOR: &str = "#2a3a4a";

/// Intensity × frequency matrix, indexed `[frequency tertile][intensity tertile]`.
/// Low×low (`#e8e8e8`) and high×high (`#3b4994`) sit at the two ends of the diagonal.
pub const BIVARIATE_COLORS: [[&str; 3]; 3] = [
    ["#e8e8e8", "#ace4e4", "#5ac8c8"],
    ["#dfb0d6", "#a5add3", "#5698b9"],
    ["#be64ac", "#8c62aa", "#3b4994"],
];

/// Named five-class sequential ramps, low → high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Blues,
    Purples,
    Greens,
    Oranges,
    Reds,
    Yellows,
}

impl Palette {
    pub const fn colors(self) -> &'static [&'static str; 5] {
        match self {
            Palette::Blues => &["#dce9f5", "#9dc4e0", "#5b9ec9", "#2476b5", "#084594"],
            Palette::Purples => &["#eee5f4", "#c5aede", "#9970c1", "#7441b5", "#49006a"],
            Palette::Greens => &["#e5f5e0", "#a1d99b", "#41ab5d", "#238b45", "#005a32"],
            Palette::Oranges => &["#feedde", "#fdbe85", "#fd8d3c", "#e6550d", "#a63603"],
            Palette::Reds => &["#fee5d9", "#fc9272", "#fb6a4a", "#de2d26", "#a50f15"],
            Palette::Yellows => &["#ffffd4", "#fed98e", "#fe9929", "#d95f0e", "#993404"],
        }
    }

    pub const ALL: [Palette; 6] = [
        Palette::Blues,
        Palette::Purples,
        Palette::Greens,
        Palette::Oranges,
        Palette::Reds,
        Palette::Yellows,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_fills_are_not_palette_colors() {
        for p in Palette::ALL {
            for c in p.colors() {
                assert_ne!(*c, NO_DATA_COLOR);
                assert_ne!(*c, UNJOINED_COLOR);
            }
        }
        for row in BIVARIATE_COLORS {
            for c in row {
                assert_ne!(c, NO_DATA_COLOR);
                assert_ne!(c, UNJOINED_COLOR);
            }
        }
        assert_ne!(NO_DATA_COLOR, UNJOINED_COLOR);
    }

    #[test]
    fn palette_names_round_trip_lowercase() {
        let p: Palette = serde_json::from_str("\"yellows\"").unwrap();
        assert_eq!(p, Palette::Yellows);
        assert_eq!(serde_json::to_string(&Palette::Blues).unwrap(), "\"blues\"");
    }
}

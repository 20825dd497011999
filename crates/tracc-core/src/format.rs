//! Display formatting for values and populations.
//!
//! Two rounding rules only: a fixed number of decimals for variables that ask
//! for it, and round-half-up to an integer for everything else.

use crate::catalog::VariableDef;

/// Placeholder for a missing value.
pub const MISSING: &str = "–";

/// Format with `decimals` digits; 0 rounds half up to an integer.
pub fn format_number(v: f64, decimals: u8) -> String {
    if decimals == 0 {
        let rounded = (v + 0.5).floor();
        // Avoid "-0" for values in (-0.5, 0).
        if rounded == 0.0 {
            "0".to_string()
        } else {
            format!("{rounded:.0}")
        }
    } else {
        format!("{v:.prec$}", prec = decimals as usize)
    }
}

pub fn format_value(v: Option<f64>, var: &VariableDef) -> String {
    match v {
        Some(v) => format_number(v, var.decimals),
        None => MISSING.to_string(),
    }
}

/// Value followed by the variable's unit, e.g. `642 mm/an`.
pub fn format_with_unit(v: Option<f64>, var: &VariableDef) -> String {
    format!("{} {}", format_value(v, var), var.unit)
}

/// French thousands grouping (`2 133 111`, narrow no-break space), or `N/A`.
pub fn format_population(population: Option<u64>) -> String {
    let Some(p) = population else {
        return "N/A".to_string();
    };
    let digits = p.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\u{202f}');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VariableCatalog;

    #[test]
    fn integer_rounding_is_half_up() {
        assert_eq!(format_number(642.5, 0), "643");
        assert_eq!(format_number(642.49, 0), "642");
        assert_eq!(format_number(-2.5, 0), "-2");
        assert_eq!(format_number(-0.2, 0), "0");
    }

    #[test]
    fn fixed_decimals() {
        assert_eq!(format_number(3.14159, 1), "3.1");
        assert_eq!(format_number(3.0, 1), "3.0");
    }

    #[test]
    fn variable_decimals_drive_formatting() {
        let c = VariableCatalog::drias();
        assert_eq!(format_value(Some(41.7), c.get("drias_Inte").unwrap()), "42");
        assert_eq!(format_value(Some(4.26), c.get("drias_Fré").unwrap()), "4.3");
        assert_eq!(format_value(None, c.get("drias_Fré").unwrap()), MISSING);
        assert_eq!(format_with_unit(Some(640.2), c.first()), "640 mm/an");
    }

    #[test]
    fn population_grouping() {
        assert_eq!(format_population(Some(2_133_111)), "2\u{202f}133\u{202f}111");
        assert_eq!(format_population(Some(512)), "512");
        assert_eq!(format_population(Some(1000)), "1\u{202f}000");
        assert_eq!(format_population(None), "N/A");
    }
}

//! Canonical join key extraction for geometry features.
//!
//! Commune contours come from several publishers, each naming the INSEE code
//! property differently. Corsican codes also appear in the pre-1976 numeric
//! form (`201xx` / `202xx`) while the climate table uses `2A` / `2B`.

use serde_json::{Map, Value};

/// Property names carrying the INSEE code, in lookup order.
pub const KEY_ALIASES: [&str; 5] = ["code", "insee", "code_insee", "INSEE_COM", "codgeo"];

/// Extract the canonical join key from a feature's raw properties.
///
/// Returns an empty string when no alias is present; such a feature never joins.
pub fn normalize_key(properties: &Map<String, Value>) -> String {
    let raw = KEY_ALIASES
        .iter()
        .filter_map(|alias| properties.get(*alias))
        .find_map(property_as_code)
        .unwrap_or_default();
    normalize_code(&raw)
}

/// Rewrite the numeric Corsican forms; every other code passes through.
pub fn normalize_code(raw: &str) -> String {
    let is_corsican_numeric =
        raw.len() == 5 && raw.bytes().all(|b| b.is_ascii_digit()) && raw.starts_with("20");
    if is_corsican_numeric {
        let tail = &raw[3..];
        match &raw[..3] {
            "201" => return format!("2A{tail}"),
            "202" => return format!("2B{tail}"),
            _ => {}
        }
    }
    raw.to_string()
}

/// Empty strings and non-scalar values count as absent.
fn property_as_code(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => n.as_u64().map(|v| v.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn corse_du_sud_range_maps_to_2a() {
        for code in 20100..=20199 {
            let key = normalize_code(&code.to_string());
            assert!(key.starts_with("2A"), "{code} -> {key}");
        }
        assert_eq!(normalize_code("20104"), "2A04");
    }

    #[test]
    fn haute_corse_range_maps_to_2b() {
        for code in 20200..=20299 {
            let key = normalize_code(&code.to_string());
            assert!(key.starts_with("2B"), "{code} -> {key}");
        }
        assert_eq!(normalize_code("20233"), "2B33");
    }

    #[test]
    fn other_numeric_codes_pass_through() {
        for code in ["75056", "13055", "69123", "20000", "20099", "20300", "01001"] {
            assert_eq!(normalize_code(code), code);
        }
        // Already-normalized and non-numeric codes are untouched too.
        assert_eq!(normalize_code("2A004"), "2A004");
        assert_eq!(normalize_code("201"), "201");
        assert_eq!(normalize_code("2011a"), "2011a");
    }

    #[test]
    fn first_present_alias_wins() {
        let p = props(json!({ "codgeo": "33063", "insee": "75056" }));
        assert_eq!(normalize_key(&p), "75056");

        let p = props(json!({ "code": "", "INSEE_COM": "69123" }));
        assert_eq!(normalize_key(&p), "69123");
    }

    #[test]
    fn numeric_property_is_rendered_in_decimal() {
        let p = props(json!({ "code": 20104 }));
        assert_eq!(normalize_key(&p), "2A04");
    }

    #[test]
    fn no_alias_yields_empty_key() {
        let p = props(json!({ "nom": "Lyon", "code": null }));
        assert_eq!(normalize_key(&p), "");
    }

    #[test]
    fn normalization_is_deterministic() {
        let p = props(json!({ "insee": "20215" }));
        assert_eq!(normalize_key(&p), normalize_key(&p));
    }
}

//! Lenient typed lookups into a JSON params object.
//!
//! Missing keys and wrong types fall back to the default. Validation of the
//! resulting values happens later, in [`FieldConfig::validate`](crate::config::FieldConfig::validate).

use serde_json::Value;

/// `params[name]` as `f64`. Integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as a non-negative integer.
pub fn param_u64(params: &Value, name: &str, default: u64) -> u64 {
    params.get(name).and_then(Value::as_u64).unwrap_or(default)
}

/// `params[name]` as an owned string.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_owned()
}

/// `params[name]` as a two-element `[min, max]` numeric array.
///
/// Anything other than exactly two numbers yields the default. Ordering is
/// not checked here.
pub fn param_range(params: &Value, name: &str, default: (f64, f64)) -> (f64, f64) {
    match params.get(name).and_then(Value::as_array).map(Vec::as_slice) {
        Some([lo, hi]) => match (lo.as_f64(), hi.as_f64()) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => default,
        },
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_reads_floats_and_integers() {
        let params = json!({"threshold": 150, "max_opacity": 0.1});
        assert_eq!(param_f64(&params, "threshold", 120.0), 150.0);
        assert_eq!(param_f64(&params, "max_opacity", 0.05), 0.1);
    }

    #[test]
    fn param_f64_falls_back() {
        let params = json!({"threshold": "far"});
        assert_eq!(param_f64(&params, "threshold", 120.0), 120.0);
        assert_eq!(param_f64(&params, "missing", 1.5), 1.5);
        assert_eq!(param_f64(&json!(null), "threshold", 2.0), 2.0);
    }

    #[test]
    fn param_u64_rejects_negative_and_fractional() {
        let params = json!({"a": 20000, "b": -1, "c": 2.5});
        assert_eq!(param_u64(&params, "a", 0), 20000);
        assert_eq!(param_u64(&params, "b", 7), 7);
        assert_eq!(param_u64(&params, "c", 9), 9);
    }

    #[test]
    fn param_string_reads_or_defaults() {
        let params = json!({"edge_policy": "bounce", "link_style": 3});
        assert_eq!(param_string(&params, "edge_policy", "wrap"), "bounce");
        assert_eq!(param_string(&params, "link_style", "tight"), "tight");
        assert_eq!(param_string(&params, "nope", ""), "");
    }

    #[test]
    fn param_range_reads_pairs() {
        let params = json!({"radius": [0.5, 2.5], "speed": [-1, 1]});
        assert_eq!(param_range(&params, "radius", (0.0, 0.0)), (0.5, 2.5));
        assert_eq!(param_range(&params, "speed", (0.0, 0.0)), (-1.0, 1.0));
    }

    #[test]
    fn param_range_falls_back_on_bad_shapes() {
        let params = json!({
            "one": [1.0],
            "three": [1.0, 2.0, 3.0],
            "text": ["a", 2.0],
            "scalar": 4.0
        });
        for key in ["one", "three", "text", "scalar", "missing"] {
            assert_eq!(param_range(&params, key, (0.5, 2.5)), (0.5, 2.5), "{key}");
        }
    }
}

//! Dotted-path lookup over a normalized body.
//!
//! `data.items.0.id` walks keys left to right; a numeric segment indexes
//! into an array at that position. There is no wildcard or slice syntax.

use serde_json::Value;

/// Resolve `path` against `root`. Returns `None` when any segment is
/// missing, out of range, or walks into a scalar. The empty path is the
/// whole body.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }

    path.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    })
}

/// Equality used by body expectations: deep, with numbers compared by value
/// so `1` matches `1.0`.
pub fn values_match(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                return a == b;
            }
            if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                return a == b;
            }
            a.as_f64() == b.as_f64()
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_match(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_match(x, y)))
        }
        _ => actual == expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_keys() {
        let body = json!({"a": {"b": 5}});
        assert_eq!(resolve(&body, "a.b"), Some(&json!(5)));
        assert_eq!(resolve(&body, "a"), Some(&json!({"b": 5})));
    }

    #[test]
    fn numeric_segments_index_arrays() {
        let body = json!({"items": [{"id": 1}, {"id": 2}]});
        assert_eq!(resolve(&body, "items.1.id"), Some(&json!(2)));
        assert_eq!(resolve(&body, "items.2.id"), None);
        assert_eq!(resolve(&body, "items.first"), None);
    }

    #[test]
    fn numeric_segment_on_object_is_a_key() {
        let body = json!({"codes": {"0": "zero"}});
        assert_eq!(resolve(&body, "codes.0"), Some(&json!("zero")));
    }

    #[test]
    fn missing_or_scalar_intermediate_is_not_found() {
        let body = json!({"a": 1, "b": null});
        assert_eq!(resolve(&body, "c"), None);
        assert_eq!(resolve(&body, "a.x"), None);
        assert_eq!(resolve(&body, "b.x"), None);
        assert_eq!(resolve(&body, "a."), None);
    }

    #[test]
    fn empty_path_is_root() {
        let body = json!([1, 2]);
        assert_eq!(resolve(&body, ""), Some(&body));
    }

    #[test]
    fn resolve_is_repeatable() {
        let body = json!({"a": [true]});
        assert_eq!(resolve(&body, "a.0"), resolve(&body, "a.0"));
    }

    #[test]
    fn numbers_match_by_value() {
        assert!(values_match(&json!(1), &json!(1.0)));
        assert!(values_match(&json!(-3), &json!(-3)));
        assert!(!values_match(&json!(1), &json!("1")));
        assert!(!values_match(&json!(1.5), &json!(1)));
    }

    #[test]
    fn collections_match_deeply() {
        assert!(values_match(&json!({"a": [1, {"b": 2.0}]}), &json!({"a": [1.0, {"b": 2}]})));
        assert!(!values_match(&json!({"a": 1, "b": 2}), &json!({"a": 1})));
        assert!(!values_match(&json!([1, 2]), &json!([2, 1])));
    }
}

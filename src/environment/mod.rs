//! # Remembered Variables
//!
//! Per-test-case store of values captured from earlier responses, and the
//! `{variable}` interpolation used to recall them in later requests.
//!
//! A store is created empty when a case starts and dropped when it ends, so
//! no two cases ever see each other's values.

use std::collections::HashMap;

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    variables: HashMap<String, Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a captured value, replacing any previous value of the same name.
    pub fn remember(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// Merge a batch of captures; later keys overwrite existing ones.
    pub fn extend(&mut self, captured: impl IntoIterator<Item = (String, Value)>) {
        self.variables.extend(captured);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Replace every `{name}` whose variable is known. Unknown placeholders
    /// are left verbatim and substituted text is never scanned again.
    pub fn interpolate(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(open) = rest.find('{') {
            result.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let Some(close) = after.find(['{', '}']) else {
                result.push_str(&rest[open..]);
                return result;
            };

            if after.as_bytes()[close] == b'{' {
                // Another opening brace before the close: this one is literal.
                result.push('{');
                rest = after;
                continue;
            }

            let name = &after[..close];
            match self.variables.get(name) {
                Some(value) => result.push_str(&stringify(value)),
                None => result.push_str(&rest[open..open + close + 2]),
            }
            rest = &after[close + 1..];
        }

        result.push_str(rest);
        result
    }
}

/// Text form of a captured value as it appears in a request.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(pairs: &[(&str, Value)]) -> VariableStore {
        let mut vars = VariableStore::new();
        for (name, value) in pairs {
            vars.remember(*name, value.clone());
        }
        vars
    }

    #[test]
    fn interpolate_replaces_placeholders() {
        let vars = store(&[("host", json!("api.example.com")), ("port", json!(8080))]);
        let result = vars.interpolate("https://{host}:{port}/api");
        assert_eq!(result, "https://api.example.com:8080/api");
    }

    #[test]
    fn interpolate_leaves_unknown_placeholders() {
        let vars = VariableStore::new();
        assert_eq!(vars.interpolate("Bearer {token}"), "Bearer {token}");
    }

    #[test]
    fn interpolate_ignores_json_braces() {
        let vars = store(&[("id", json!("42"))]);
        let body = r#"{"id": "{id}", "nested": {"a": 1}}"#;
        assert_eq!(
            vars.interpolate(body),
            r#"{"id": "42", "nested": {"a": 1}}"#
        );
    }

    #[test]
    fn interpolate_handles_doubled_braces() {
        let vars = store(&[("name", json!("bob"))]);
        assert_eq!(vars.interpolate("{{name}}"), "{bob}");
        assert_eq!(vars.interpolate("tail {name"), "tail {name");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let vars = store(&[("a", json!("{b}")), ("b", json!("oops"))]);
        assert_eq!(vars.interpolate("{a}"), "{b}");
    }

    #[test]
    fn stringify_renders_scalars_and_collections() {
        assert_eq!(stringify(&json!("abc")), "abc");
        assert_eq!(stringify(&json!(1.5)), "1.5");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!(null)), "null");
        assert_eq!(stringify(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn later_capture_overwrites_earlier() {
        let mut vars = store(&[("token", json!("old"))]);
        vars.extend([("token".to_string(), json!("new"))]);
        assert_eq!(vars.get("token"), Some(&json!("new")));
        assert_eq!(vars.len(), 1);
    }
}

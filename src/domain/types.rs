use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::HttpMethod;

// ─── Suite Types ──────────────────────────────────────────────────────────────

/// A named collection of test cases loaded from one suite file.
#[derive(Debug, Clone, PartialEq)]
pub struct Suite {
    pub name: String,
    /// Location of the suite file relative to the suite root; relative asset
    /// paths are resolved against it.
    pub directory: String,
    pub cases: Vec<TestCase>,
}

impl Suite {
    /// `directory/name`, or just the name for suites at the root. Unique per
    /// suite file.
    pub fn qualified_name(&self) -> String {
        if self.directory.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.directory, self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub name: String,
    #[serde(default, rename = "ignore", alias = "ignoreReason")]
    pub ignore_reason: Option<String>,
    pub calls: Vec<Call>,
}

impl TestCase {
    pub fn is_ignored(&self) -> bool {
        self.ignore_reason
            .as_deref()
            .is_some_and(|reason| !reason.trim().is_empty())
    }
}

/// One HTTP round trip plus its expectations and captures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub on: On,
    pub expect: Expect,
    /// Variable name to extraction path.
    #[serde(default)]
    pub remember: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct On {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Inline body; non-string JSON values are sent as compact JSON.
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub body_file: Option<String>,
}

impl On {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            params: BTreeMap::new(),
            body: None,
            body_file: None,
        }
    }

    pub fn inline_body(&self) -> String {
        match &self.body {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expect {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Dotted path to expected value.
    #[serde(default)]
    pub body: BTreeMap<String, Value>,
    #[serde(default)]
    pub body_schema_file: Option<String>,
    #[serde(default, rename = "bodySchemaURI")]
    pub body_schema_uri: Option<String>,
    #[serde(default)]
    pub absent: Vec<String>,
}

impl Expect {
    /// Declared schema URI, if non-empty.
    pub fn schema_uri(&self) -> Option<&str> {
        non_empty(&self.body_schema_uri)
    }

    /// Declared schema file, if non-empty.
    pub fn schema_file(&self) -> Option<&str> {
        non_empty(&self.body_schema_file)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

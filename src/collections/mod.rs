//! # Suite Discovery
//!
//! Walks a directory tree and loads every JSON file that looks like a suite:
//! an array of test cases, each with a `name` and a list of `calls`.
//!
//! Files that do not have the suite shape are ignored silently. Files that
//! have the shape but break the detailed schema are logged and skipped, so
//! one bad suite never hides the others.

pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::Validator;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{Suite, TestCase};
use crate::error::LoadError;

use schema::{SUITE_DETAILED_SCHEMA, SUITE_SHAPE_SCHEMA};

pub struct SuiteLoader {
    root: PathBuf,
    shape: Validator,
    detailed: Validator,
}

impl SuiteLoader {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, LoadError> {
        Ok(Self {
            root: root.into(),
            shape: compile(SUITE_SHAPE_SCHEMA)?,
            detailed: compile(SUITE_DETAILED_SCHEMA)?,
        })
    }

    /// Load every suite under the root, in path order. Only an unreadable
    /// root is an error.
    pub fn load(&self) -> Result<Vec<Suite>, LoadError> {
        let mut files = Vec::new();
        collect_json_files(&self.root, &mut files).map_err(|source| LoadError::Io {
            path: self.root.clone(),
            source,
        })?;
        files.sort();

        let mut suites = Vec::new();
        for path in files {
            match self.load_file(&path) {
                Ok(Some(suite)) => {
                    debug!(path = %path.display(), cases = suite.cases.len(), "loaded suite");
                    suites.push(suite);
                }
                Ok(None) => debug!(path = %path.display(), "not a suite, skipping"),
                Err(err) => warn!("{err}"),
            }
        }
        Ok(suites)
    }

    /// Load one file. `Ok(None)` means the file is not shaped like a suite.
    pub fn load_file(&self, path: &Path) -> Result<Option<Suite>, LoadError> {
        let raw = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let Ok(document) = serde_json::from_slice::<Value>(&raw) else {
            return Ok(None);
        };
        if !self.shape.is_valid(&document) {
            return Ok(None);
        }

        let violations: Vec<String> = self
            .detailed
            .iter_errors(&document)
            .map(|err| err.to_string())
            .collect();
        if !violations.is_empty() {
            return Err(LoadError::Invalid {
                path: path.to_path_buf(),
                violations: violations.join("\n"),
            });
        }

        let cases: Vec<TestCase> =
            serde_json::from_value(document).map_err(|source| LoadError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Some(Suite {
            name: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            directory: self.relative_dir(path),
            cases,
        }))
    }

    fn relative_dir(&self, path: &Path) -> String {
        path.parent()
            .and_then(|dir| dir.strip_prefix(&self.root).ok())
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn compile(source: &str) -> Result<Validator, LoadError> {
    let schema: Value =
        serde_json::from_str(source).map_err(|e| LoadError::Schema(e.to_string()))?;
    jsonschema::options()
        .build(&schema)
        .map_err(|e| LoadError::Schema(e.to_string()))
}

fn collect_json_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if let Err(err) = collect_json_files(&path, files) {
                warn!(path = %path.display(), %err, "skipping unreadable directory");
            }
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    const VALID_SUITE: &str = r#"[
        {
            "name": "list users",
            "calls": [
                {
                    "on": {"method": "get", "url": "/users", "params": {"page": "1"}},
                    "expect": {"statusCode": 200, "contentType": "application/json"},
                    "remember": {"first": "0.id"}
                }
            ]
        },
        {"name": "later", "ignore": "not yet", "calls": []}
    ]"#;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_suites_and_skips_everything_else() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "users/list.json", VALID_SUITE);
        write(root.path(), "config.json", r#"{"not": "a suite"}"#);
        write(root.path(), "broken.json", "[{");
        write(root.path(), "README.md", "# docs");
        write(
            root.path(),
            "bad/extra.json",
            r#"[{"name": "x", "calls": [{"on": {"method": "GET", "url": "/"}, "expect": {"status": 200}}]}]"#,
        );

        let loader = SuiteLoader::new(root.path()).unwrap();
        let suites = loader.load().unwrap();

        assert_eq!(suites.len(), 1);
        let suite = &suites[0];
        assert_eq!(suite.name, "list");
        assert_eq!(suite.directory, "users");
        assert_eq!(suite.cases.len(), 2);
        assert_eq!(suite.cases[0].calls[0].on.method, HttpMethod::Get);
        assert!(suite.cases[1].is_ignored());
    }

    #[test]
    fn suites_are_ordered_by_path() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "b/second.json", VALID_SUITE);
        write(root.path(), "a.json", VALID_SUITE);

        let suites = SuiteLoader::new(root.path()).unwrap().load().unwrap();
        let names: Vec<(&str, &str)> = suites
            .iter()
            .map(|s| (s.name.as_str(), s.directory.as_str()))
            .collect();
        assert_eq!(names, vec![("a", ""), ("second", "b")]);
    }

    #[test]
    fn detailed_schema_rejects_unknown_fields() {
        let root = tempfile::tempdir().unwrap();
        let path = write(
            root.path(),
            "bad.json",
            r#"[{"name": "x", "calls": [{"on": {"method": "GET"}, "expect": {"statsCode": 200}}]}]"#,
        );

        let loader = SuiteLoader::new(root.path()).unwrap();
        let err = loader.load_file(&path).unwrap_err();
        let LoadError::Invalid { violations, .. } = err else {
            panic!("expected a validation error, got {err:?}");
        };
        assert!(violations.lines().count() >= 2, "{violations}");
    }

    #[test]
    fn ignore_and_ignore_reason_are_exclusive() {
        let root = tempfile::tempdir().unwrap();
        let path = write(
            root.path(),
            "both.json",
            r#"[{"name": "x", "ignore": "a", "ignoreReason": "b", "calls": []}]"#,
        );

        let loader = SuiteLoader::new(root.path()).unwrap();
        assert!(matches!(loader.load_file(&path), Err(LoadError::Invalid { .. })));
    }

    #[test]
    fn unknown_method_is_a_parse_error() {
        let root = tempfile::tempdir().unwrap();
        let path = write(
            root.path(),
            "m.json",
            r#"[{"name": "x", "calls": [{"on": {"method": "FETCH", "url": "/"}, "expect": {}}]}]"#,
        );

        let loader = SuiteLoader::new(root.path()).unwrap();
        assert!(matches!(loader.load_file(&path), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn missing_root_is_an_error() {
        let loader = SuiteLoader::new("/definitely/not/a/dir").unwrap();
        assert!(matches!(loader.load(), Err(LoadError::Io { .. })));
    }
}

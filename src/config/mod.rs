use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "http://localhost:8080";

/// Settings threaded through the loader, templater and runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Prefix for root-relative call URLs and schema URIs.
    pub base_host: String,
    /// Directory the suites were loaded from; suite directories are relative
    /// to it.
    pub suite_root: PathBuf,
    /// Dump every request and response at `info` level.
    pub debug: bool,
    pub timeout_ms: Option<u64>,
}

impl RunConfig {
    pub fn new(base_host: impl Into<String>, suite_root: impl Into<PathBuf>) -> Self {
        Self {
            base_host: base_host.into(),
            suite_root: suite_root.into(),
            ..Self::default()
        }
    }

    /// Leave absolute `http(s)://` targets alone, prefix everything else
    /// with the base host.
    pub fn absolute_url(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            return target.to_string();
        }
        format!("{}{}", self.base_host, target)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_host: DEFAULT_HOST.to_string(),
            suite_root: PathBuf::from("."),
            debug: false,
            timeout_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_target_gets_host_prefix() {
        let config = RunConfig::new("http://api.test:9000", ".");
        assert_eq!(config.absolute_url("/users"), "http://api.test:9000/users");
    }

    #[test]
    fn absolute_target_is_kept() {
        let config = RunConfig::default();
        assert_eq!(
            config.absolute_url("https://other.test/x"),
            "https://other.test/x"
        );
        assert_eq!(config.absolute_url("http://o.test"), "http://o.test");
    }
}

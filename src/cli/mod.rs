//! # Command Line
//!
//! `trest [OPTIONS] <DIR>` runs every suite found under `DIR` against a host
//! and exits non-zero when any call fails.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_HOST, RunConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "trest")]
#[command(version, about = "Declarative HTTP API test runner", long_about = None)]
pub struct Cli {
    #[arg(value_name = "DIR", help = "Directory searched recursively for suite files")]
    pub dir: PathBuf,

    #[arg(
        short = 'H',
        long,
        default_value = DEFAULT_HOST,
        value_name = "URL",
        help = "Base host prefixed to relative call URLs"
    )]
    pub host: String,

    #[arg(short, long, help = "Log every request and response")]
    pub debug: bool,

    #[arg(long, value_name = "MS", help = "Per-request timeout in milliseconds")]
    pub timeout: Option<u64>,

    #[arg(
        long,
        default_value = "report",
        value_name = "DIR",
        help = "Where junit.xml is written"
    )]
    pub report_dir: PathBuf,

    #[arg(long, help = "Skip writing the JUnit report")]
    pub no_junit: bool,
}

impl Cli {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            base_host: self.host.trim_end_matches('/').to_string(),
            suite_root: self.dir.clone(),
            debug: self.debug,
            timeout_ms: self.timeout,
        }
    }

    /// `RUST_LOG` wins over this.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug { "trest=debug" } else { "trest=warn" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["trest", "suites"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from("suites"));
        assert_eq!(cli.host, DEFAULT_HOST);
        assert_eq!(cli.report_dir, PathBuf::from("report"));
        assert!(!cli.debug && !cli.no_junit);
        assert_eq!(cli.default_log_filter(), "trest=warn");

        let config = cli.run_config();
        assert_eq!(config.base_host, DEFAULT_HOST);
        assert_eq!(config.timeout_ms, None);
    }

    #[test]
    fn flags_flow_into_run_config() {
        let cli = Cli::try_parse_from([
            "trest",
            "-H",
            "https://api.test/",
            "-d",
            "--timeout",
            "1500",
            "--no-junit",
            "api",
        ])
        .unwrap();

        let config = cli.run_config();
        assert_eq!(config.base_host, "https://api.test");
        assert_eq!(config.suite_root, PathBuf::from("api"));
        assert!(config.debug);
        assert_eq!(config.timeout_ms, Some(1500));
        assert!(cli.no_junit);
        assert_eq!(cli.default_log_filter(), "trest=debug");
    }

    #[test]
    fn directory_is_required() {
        assert!(Cli::try_parse_from(["trest"]).is_err());
    }
}

//! Runs declarative JSON suites of HTTP calls against a live API and reports
//! one result per call.

pub mod cli;
pub mod collections;
pub mod config;
pub mod domain;
pub mod engine;
pub mod environment;
pub mod error;
pub mod http;
pub mod report;
pub mod storage;
pub mod testing;

pub use collections::SuiteLoader;
pub use config::RunConfig;
pub use engine::{RunSummary, SuiteRunner};

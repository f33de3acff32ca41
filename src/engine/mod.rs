//! Suite execution: path lookup, body normalization, request templating,
//! per-call execution and the suite runner.

pub mod body;
pub mod call;
pub mod path;
pub mod runner;
pub mod template;

pub use call::CallExecutor;
pub use runner::{RunSummary, SuiteRunner};

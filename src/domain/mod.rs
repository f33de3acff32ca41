pub mod result;
pub mod types;

pub use result::{Outcome, ResponseSnapshot, TestResult};
pub use types::{Call, Expect, On, Suite, TestCase};

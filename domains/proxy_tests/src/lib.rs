//! Proxy smoke tests: run named cases against a deployed proxy and publish
//! the results as a JUnit artifact and workflow annotations

pub mod cases;
pub mod config;
pub mod error;
pub mod publisher;
pub mod report;
pub mod runner;

pub use cases::{parse_selection, TestCaseName, RUN_ALL};
pub use config::{ProxyTestConfig, DEFAULT_REPORT_PATH};
pub use error::ProxyTestError;
pub use publisher::{report_unavailable, PublishedReport, ReportPublisher};
pub use report::{TestOutcome, TestReport, TestResult};
pub use runner::{SmokeFixture, TestRunner};

//! Errors of the proxy smoke-test flow
//!
//! Individual test case failures are not errors here; they are recorded in
//! the report. These variants stop the flow itself.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyTestError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown test case '{0}'")]
    UnknownCase(String),

    #[error("No test cases selected")]
    EmptySelection,

    #[error("Test report unavailable: {0}")]
    ReportUnavailable(String),

    #[error("Failed to render test report: {0}")]
    Render(#[from] askama::Error),

    #[error("Failed to write test report: {0}")]
    Io(#[from] std::io::Error),
}

impl From<vidpipe_common::Error> for ProxyTestError {
    fn from(err: vidpipe_common::Error) -> Self {
        ProxyTestError::Configuration(err.to_string())
    }
}

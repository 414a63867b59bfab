//! Proxy smoke-test configuration

use std::fmt;
use std::path::PathBuf;

use vidpipe_common::config::{optional_var, required_var, var_or};
use vidpipe_heygen::HeygenConfig;

use crate::cases::{parse_selection, TestCaseName, RUN_ALL};
use crate::error::ProxyTestError;

/// Default location of the JUnit artifact
pub const DEFAULT_REPORT_PATH: &str = "test-results/proxy-tests.xml";

#[derive(Clone)]
pub struct ProxyTestConfig {
    pub proxy_url: String,
    pub api_key: String,
    pub cases: Vec<TestCaseName>,
    pub report_path: PathBuf,
}

impl fmt::Debug for ProxyTestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyTestConfig")
            .field("proxy_url", &self.proxy_url)
            .field("api_key", &"[REDACTED]")
            .field("cases", &self.cases)
            .field("report_path", &self.report_path)
            .finish()
    }
}

impl ProxyTestConfig {
    /// Read `PROXY_URL`, `PROXY_API_KEY`, `PROXY_TESTS` and `REPORT_PATH`.
    ///
    /// The case selection is validated here, before anything runs.
    pub fn from_env() -> Result<Self, ProxyTestError> {
        let proxy_url = required_var("PROXY_URL")?;
        let api_key = required_var("PROXY_API_KEY")?;
        let cases = parse_selection(&optional_var("PROXY_TESTS").unwrap_or_else(|| RUN_ALL.to_string()))?;

        Ok(Self {
            proxy_url,
            api_key,
            cases,
            report_path: PathBuf::from(var_or("REPORT_PATH", DEFAULT_REPORT_PATH)),
        })
    }

    /// Video API settings pointing at the proxy
    pub fn api_config(&self) -> HeygenConfig {
        HeygenConfig::for_endpoint(self.proxy_url.clone(), self.api_key.clone())
    }
}

//! Test results, the aggregated report and its JUnit XML rendering

use std::time::Duration;

use askama::Template;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use vidpipe_common::StepOutputs;

use crate::cases::TestCaseName;

/// Suite name used in the XML report and annotations
pub const SUITE_NAME: &str = "proxy-tests";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    Pass,
    Fail,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub name: TestCaseName,
    pub outcome: TestOutcome,
    pub message: Option<String>,
    pub duration: Duration,
}

impl TestResult {
    pub fn pass(name: TestCaseName, message: impl Into<String>) -> Self {
        Self {
            name,
            outcome: TestOutcome::Pass,
            message: Some(message.into()),
            duration: Duration::ZERO,
        }
    }

    pub fn fail(name: TestCaseName, message: impl Into<String>) -> Self {
        Self {
            name,
            outcome: TestOutcome::Fail,
            message: Some(message.into()),
            duration: Duration::ZERO,
        }
    }

    pub fn error(name: TestCaseName, message: impl Into<String>) -> Self {
        Self {
            name,
            outcome: TestOutcome::Error,
            message: Some(message.into()),
            duration: Duration::ZERO,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn passed(&self) -> bool {
        self.outcome == TestOutcome::Pass
    }
}

/// Ordered results of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestReport {
    pub results: Vec<TestResult>,
    pub started_at: DateTime<Utc>,
}

impl TestReport {
    pub fn new(results: Vec<TestResult>, started_at: DateTime<Utc>) -> Self {
        Self {
            results,
            started_at,
        }
    }

    fn count(&self, outcome: TestOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.count(TestOutcome::Pass)
    }

    pub fn failed(&self) -> usize {
        self.count(TestOutcome::Fail)
    }

    pub fn errors(&self) -> usize {
        self.count(TestOutcome::Error)
    }

    /// True only when at least one case ran and every case passed
    pub fn all_passed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(TestResult::passed)
    }

    pub fn duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} errors ({} total)",
            self.passed(),
            self.failed(),
            self.errors(),
            self.total()
        )
    }

    /// `total`, `passed`, `failed`, `errors` and `report_path`
    pub fn step_outputs(&self, report_path: &str) -> StepOutputs {
        let mut outputs = StepOutputs::new();
        outputs
            .set("total", self.total().to_string())
            .set("passed", self.passed().to_string())
            .set("failed", self.failed().to_string())
            .set("errors", self.errors().to_string())
            .set("report_path", report_path);
        outputs
    }

    /// Render as a JUnit XML document
    pub fn to_junit_xml(&self) -> askama::Result<String> {
        JunitSuite {
            suite: SUITE_NAME,
            total: self.total(),
            failures: self.failed(),
            errors: self.errors(),
            time: seconds(self.duration()),
            timestamp: self.started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            cases: self.results.iter().map(JunitCase::from).collect(),
        }
        .render()
    }
}

#[derive(Template)]
#[template(path = "junit.xml", escape = "html")]
struct JunitSuite {
    suite: &'static str,
    total: usize,
    failures: usize,
    errors: usize,
    time: String,
    timestamp: String,
    cases: Vec<JunitCase>,
}

/// A `<testcase>`; `kind` names the child element and is empty for a pass
struct JunitCase {
    name: TestCaseName,
    time: String,
    kind: &'static str,
    message: String,
}

impl From<&TestResult> for JunitCase {
    fn from(result: &TestResult) -> Self {
        let kind = match result.outcome {
            TestOutcome::Pass => "",
            TestOutcome::Fail => "failure",
            TestOutcome::Error => "error",
        };
        Self {
            name: result.name,
            time: seconds(result.duration),
            kind,
            message: xml_text(result.message.as_deref().unwrap_or_default()),
        }
    }
}

fn seconds(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64())
}

/// Replace characters XML 1.0 cannot carry, even as references.
///
/// Messages can hold raw upstream bodies, terminal colour codes included.
fn xml_text(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => c,
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => char::REPLACEMENT_CHARACTER,
            _ => c,
        })
        .collect()
}

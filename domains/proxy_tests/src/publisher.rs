//! ReportPublisher: JUnit artifact plus workflow annotations
//!
//! Publishing takes the outcome of report generation. A missing report is
//! fatal; a report with non-passing cases is published in full and then
//! reported as a failed run.

use std::fs;
use std::path::{Path, PathBuf};

use vidpipe_common::StepOutputs;

use crate::error::ProxyTestError;
use crate::report::{TestOutcome, TestReport, SUITE_NAME};

/// Where the artifact landed and what was annotated
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedReport {
    pub path: PathBuf,
    pub annotations: Vec<String>,
    pub report: TestReport,
}

impl PublishedReport {
    pub fn all_passed(&self) -> bool {
        self.report.all_passed()
    }

    /// Step outputs with the artifact path filled in
    pub fn step_outputs(&self) -> StepOutputs {
        self.report.step_outputs(&self.path.display().to_string())
    }
}

pub struct ReportPublisher {
    report_path: PathBuf,
}

impl ReportPublisher {
    pub fn new(report_path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: report_path.into(),
        }
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Write the artifact and print annotations to stdout.
    ///
    /// An upstream failure is annotated and returned as `ReportUnavailable`.
    pub fn publish(
        &self,
        report: Result<TestReport, ProxyTestError>,
    ) -> Result<PublishedReport, ProxyTestError> {
        let report = report.map_err(report_unavailable)?;

        self.write_artifact(&report)?;

        let annotations = annotations(&report);
        for line in &annotations {
            println!("{}", line);
        }

        tracing::info!(
            path = %self.report_path.display(),
            total = report.total(),
            passed = report.passed(),
            failed = report.failed(),
            errors = report.errors(),
            "Proxy test report published"
        );

        Ok(PublishedReport {
            path: self.report_path.clone(),
            annotations,
            report,
        })
    }

    fn write_artifact(&self, report: &TestReport) -> Result<(), ProxyTestError> {
        if let Some(parent) = self.report_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.report_path, report.to_junit_xml()?)?;
        Ok(())
    }
}

/// Annotate a failure that left no report to publish
pub fn report_unavailable(err: ProxyTestError) -> ProxyTestError {
    tracing::error!(error = %err, "Proxy test report was not generated");
    println!(
        "{}",
        workflow_command("error", SUITE_NAME, &format!("Report generation failed: {}", err))
    );
    ProxyTestError::ReportUnavailable(err.to_string())
}

/// One annotation per non-passing case, then a summary line
pub fn annotations(report: &TestReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .results
        .iter()
        .filter(|r| r.outcome != TestOutcome::Pass)
        .map(|r| {
            let kind = match r.outcome {
                TestOutcome::Fail => "failed",
                _ => "errored",
            };
            let message = format!(
                "{} {}: {}",
                r.name,
                kind,
                r.message.as_deref().unwrap_or("no details")
            );
            workflow_command("error", &format!("{} {}", SUITE_NAME, r.name), &message)
        })
        .collect();

    let level = if report.all_passed() { "notice" } else { "error" };
    lines.push(workflow_command(level, SUITE_NAME, &report.summary()));
    lines
}

/// Format `::level title=...::message` with workflow-command escaping
pub fn workflow_command(level: &str, title: &str, message: &str) -> String {
    format!(
        "::{} title={}::{}",
        level,
        escape_property(title),
        escape_data(message)
    )
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

//! Step outputs for downstream CI steps
//!
//! Results are written as `key=value` lines to the file named by
//! `GITHUB_OUTPUT`. Multi-line values use the heredoc form
//! (`key<<DELIMITER`). Without `GITHUB_OUTPUT` the lines go to stdout so a
//! local run still shows them.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use uuid::Uuid;

use crate::Result;

/// Environment variable naming the step output file
pub const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";

/// Ordered set of named results produced by a flow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutputs {
    entries: Vec<(String, String)>,
}

impl StepOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing an earlier value for the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render all entries in the step output file format
    pub fn render(&self) -> String {
        let mut rendered = String::new();
        for (key, value) in &self.entries {
            if value.contains('\n') {
                let delimiter = format!("ghadelimiter_{}", Uuid::new_v4().simple());
                rendered.push_str(&format!("{key}<<{delimiter}\n{value}\n{delimiter}\n"));
            } else {
                rendered.push_str(&format!("{key}={value}\n"));
            }
        }
        rendered
    }

    /// Append the rendered entries to `path`
    pub fn append_to(&self, path: &Path) -> Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }

    /// Write to `GITHUB_OUTPUT` when set, otherwise print to stdout
    pub fn emit(&self) -> Result<()> {
        match crate::config::optional_var(OUTPUT_FILE_VAR) {
            Some(path) => {
                tracing::debug!(path = %path, count = self.entries.len(), "Writing step outputs");
                self.append_to(Path::new(&path))
            }
            None => {
                print!("{}", self.render());
                Ok(())
            }
        }
    }
}

//! Named smoke-test cases and selection parsing

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ProxyTestError;

/// Selector that expands to every case
pub const RUN_ALL: &str = "run-all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestCaseName {
    ListTemplates,
    GenerateVideo,
    CheckStatus,
}

impl TestCaseName {
    /// Every case, in execution order
    pub const ALL: [TestCaseName; 3] = [
        TestCaseName::ListTemplates,
        TestCaseName::GenerateVideo,
        TestCaseName::CheckStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestCaseName::ListTemplates => "list-templates",
            TestCaseName::GenerateVideo => "generate-video",
            TestCaseName::CheckStatus => "check-status",
        }
    }
}

impl fmt::Display for TestCaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestCaseName {
    type Err = ProxyTestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestCaseName::ALL
            .into_iter()
            .find(|case| case.as_str() == s)
            .ok_or_else(|| ProxyTestError::UnknownCase(s.to_string()))
    }
}

/// Parse a comma or whitespace separated selection.
///
/// `run-all` expands to every case. Duplicates keep their first position.
/// Any unknown name rejects the whole selection.
pub fn parse_selection(raw: &str) -> Result<Vec<TestCaseName>, ProxyTestError> {
    let mut selected: Vec<TestCaseName> = Vec::new();

    for token in raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let expanded: Vec<TestCaseName> = if token == RUN_ALL {
            TestCaseName::ALL.to_vec()
        } else {
            vec![token.parse()?]
        };
        for case in expanded {
            if !selected.contains(&case) {
                selected.push(case);
            }
        }
    }

    if selected.is_empty() {
        return Err(ProxyTestError::EmptySelection);
    }
    Ok(selected)
}

//! Configuration helpers following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Each integration crate owns
//! its own `*Config::from_env()`; the helpers here keep the error messages
//! and `.env` handling consistent between them.

use std::env;
use std::str::FromStr;

use crate::{Error, Result};

/// Load a `.env` file from the working directory if one exists.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Read a required variable. Blank values count as missing.
pub fn required_var(key: &str) -> Result<String> {
    optional_var(key).ok_or_else(|| Error::Configuration(format!("{} is required", key)))
}

/// Read an optional variable, treating blank values as unset.
pub fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read a variable or fall back to a default.
pub fn var_or(key: &str, default: &str) -> String {
    optional_var(key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to `default` when unset.
///
/// A value that is present but unparsable is a configuration error rather
/// than a silent fallback.
pub fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T> {
    match optional_var(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Configuration(format!("{} has an invalid value: {}", key, raw))),
    }
}

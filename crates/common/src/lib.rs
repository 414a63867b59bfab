//! Shared utilities, configuration, and error handling for Vidpipe
//!
//! This crate provides common functionality used across the Vidpipe workspace:
//! - Environment configuration helpers following 12-factor principles
//! - Error types and handling
//! - Step outputs consumable by downstream CI steps
//! - State machine error types

pub mod config;
pub mod error;
pub mod outputs;
pub mod state;

pub use error::{Error, Result};
pub use outputs::StepOutputs;
pub use state::StateError;

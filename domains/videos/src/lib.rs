//! Videos domain: generation flow (submit, poll, notify) and status dashboard

pub mod dashboard;
pub mod domain;
pub mod error;
pub mod services;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::state::{JobStateMachine, JobStatus, StateError};
pub use error::FlowError;

// Re-export flow services
pub use services::notifier::{NotificationReport, Notifier, SinkOutcome};
pub use services::pipeline::{failure_outputs, GenerationOutcome, GenerationPipeline};
pub use services::poller::{Delay, PollPolicy, Poller, RecordingDelay, TokioDelay};
pub use services::submitter::Submitter;

// Re-export dashboard types
pub use dashboard::{DashboardConfig, DashboardState};

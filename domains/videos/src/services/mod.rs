//! Video generation flow: submit, poll, notify

pub mod notifier;
pub mod pipeline;
pub mod poller;
pub mod submitter;

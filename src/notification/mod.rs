//! Delivery job implementations and the registry that selects between them.
//!
//! The dispatcher never names a concrete job type. It asks the
//! [`jobs::JobRegistry`] for the handler matching the configured identifier,
//! which lets tests and embedders plug in their own delivery.
pub mod jobs;
pub mod slack;

pub use jobs::{JobConstructor, JobRegistry};
pub use slack::SlackWebhookJob;

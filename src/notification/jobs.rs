//! Registry of delivery job implementations, keyed by identifier.
//!
//! The configured `job` string is resolved here to a concrete
//! [`DeliveryHandler`]. Unknown or empty identifiers are an explicit error.

use crate::config::DEFAULT_JOB;
use crate::core::DeliveryHandler;
use crate::error::AlertError;
use crate::notification::slack::SlackWebhookJob;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Builds a fresh handler for a resolved job identifier.
pub type JobConstructor = Arc<dyn Fn() -> Arc<dyn DeliveryHandler> + Send + Sync>;

/// Maps job identifiers to the constructors of their handlers.
#[derive(Clone, Default)]
pub struct JobRegistry {
    constructors: HashMap<String, JobConstructor>,
}

impl JobRegistry {
    /// Creates an empty registry. Every identifier fails to resolve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in Slack webhook job.
    pub fn with_defaults(http_timeout: Duration) -> Self {
        let mut registry = Self::new();
        registry.register(DEFAULT_JOB, move || {
            Arc::new(SlackWebhookJob::new(http_timeout)) as Arc<dyn DeliveryHandler>
        });
        registry
    }

    /// Registers a constructor under `identifier`, replacing any previous one.
    pub fn register<F>(&mut self, identifier: impl Into<String>, constructor: F)
    where
        F: Fn() -> Arc<dyn DeliveryHandler> + Send + Sync + 'static,
    {
        self.constructors
            .insert(identifier.into(), Arc::new(constructor));
    }

    /// Resolves an identifier to a handler.
    ///
    /// # Errors
    /// Returns `AlertError::JobClassNotFound` if the identifier is `None`,
    /// empty, or not registered.
    pub fn resolve(&self, identifier: Option<&str>) -> Result<Arc<dyn DeliveryHandler>, AlertError> {
        let constructor = identifier
            .filter(|id| !id.is_empty())
            .and_then(|id| self.constructors.get(id))
            .ok_or_else(|| AlertError::JobClassNotFound {
                identifier: identifier.map(str::to_string),
            })?;

        let handler = constructor();
        debug!(job = handler.name(), "Resolved delivery job");
        Ok(handler)
    }

    /// The registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRegistry")
            .field("identifiers", &self.identifiers())
            .finish()
    }
}

//! The webhook registry: named targets and global delivery flags.
//!
//! The registry is built once from [`Config`] and only read afterwards. It is
//! passed to the dispatcher explicitly, so independent instances can coexist
//! (e.g. one per test).

use crate::config::Config;
use crate::error::AlertError;
use reqwest::Url;
use std::collections::BTreeMap;
use tracing::debug;

/// Resolves target names to webhook URLs and carries the delivery defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookRegistry {
    webhook_urls: BTreeMap<String, String>,
    enabled: bool,
    job: Option<String>,
    default_queue: String,
    default_sync: bool,
}

impl WebhookRegistry {
    /// Builds the registry from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            webhook_urls: config.webhook_urls.clone(),
            enabled: config.enabled,
            job: config.job.clone(),
            default_queue: config.queue.clone(),
            default_sync: config.sync,
        }
    }

    /// Resolves a target to its webhook URL.
    ///
    /// A target that is itself an absolute URL is used as-is. For a named
    /// target, a missing or empty value yields `Ok(None)`, meaning the alert
    /// is silently skipped. Any other value must be a valid URL.
    ///
    /// # Errors
    /// Returns `AlertError::InvalidWebhookUrl` if the configured value is set
    /// but is not an absolute URL with a host.
    pub fn resolve(&self, target: &str) -> Result<Option<Url>, AlertError> {
        if let Some(url) = parse_webhook_url(target) {
            debug!(target, "Target is a literal webhook URL");
            return Ok(Some(url));
        }

        let configured = match self.webhook_urls.get(target) {
            Some(value) if !value.is_empty() => value.as_str(),
            _ => {
                debug!(target, "No webhook URL configured for target");
                return Ok(None);
            }
        };

        parse_webhook_url(configured)
            .map(Some)
            .ok_or_else(|| AlertError::InvalidWebhookUrl {
                target: target.to_string(),
                url: configured.to_string(),
            })
    }

    /// The global kill switch.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The configured delivery job identifier.
    pub fn job(&self) -> Option<&str> {
        self.job.as_deref()
    }

    pub fn default_queue(&self) -> &str {
        &self.default_queue
    }

    pub fn default_sync(&self) -> bool {
        self.default_sync
    }

    /// Sets (or replaces) the URL of a named target.
    #[must_use]
    pub fn with_webhook(mut self, target: impl Into<String>, url: impl Into<String>) -> Self {
        self.webhook_urls.insert(target.into(), url.into());
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_job(mut self, job: impl Into<String>) -> Self {
        self.job = Some(job.into());
        self
    }

    /// Clears the job identifier, as if it were configured as null.
    #[must_use]
    pub fn without_job(mut self) -> Self {
        self.job = None;
        self
    }

    #[must_use]
    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.default_queue = queue.into();
        self
    }

    #[must_use]
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.default_sync = sync;
        self
    }
}

impl Default for WebhookRegistry {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Parses an absolute webhook URL. Relative references and host-less URLs
/// such as `mailto:` are rejected.
fn parse_webhook_url(value: &str) -> Option<Url> {
    Url::parse(value)
        .ok()
        .filter(|url| url.has_host() && url.host_str().is_some_and(|host| !host.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_default_target() {
        let registry = WebhookRegistry::default().with_webhook("default", "https://x.test");
        let url = registry.resolve("default").unwrap().unwrap();
        assert_eq!(url.as_str(), "https://x.test/");
    }

    #[test]
    fn test_empty_and_missing_targets_are_noops() {
        let registry = WebhookRegistry::default();
        assert!(registry.resolve("default").unwrap().is_none());
        assert!(registry.resolve("marketing").unwrap().is_none());
    }

    #[test]
    fn test_whitespace_only_url_is_rejected() {
        let registry = WebhookRegistry::default().with_webhook("default", "   ");
        let err = registry.resolve("default").unwrap_err();
        assert!(matches!(
            err,
            AlertError::InvalidWebhookUrl { ref url, .. } if url == "   "
        ));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let registry = WebhookRegistry::default().with_webhook("default", "not-an-url");
        let err = registry.resolve("default").unwrap_err();
        assert!(matches!(
            err,
            AlertError::InvalidWebhookUrl { ref target, ref url }
                if target == "default" && url == "not-an-url"
        ));
    }

    #[test]
    fn test_hostless_url_is_rejected() {
        let registry = WebhookRegistry::default().with_webhook("default", "mailto:ops@example.com");
        assert!(registry.resolve("default").is_err());
    }

    #[test]
    fn test_literal_url_target_bypasses_lookup() {
        let registry = WebhookRegistry::default();
        let url = registry
            .resolve("https://hooks.example.com/services/T000/B000/XXXX")
            .unwrap()
            .unwrap();
        assert_eq!(url.host_str(), Some("hooks.example.com"));
    }

    #[test]
    fn test_from_config_copies_flags() {
        let config = Config {
            enabled: false,
            job: None,
            queue: "alerts".to_string(),
            sync: true,
            ..Default::default()
        };
        let registry = WebhookRegistry::from_config(&config);
        assert!(!registry.is_enabled());
        assert_eq!(registry.job(), None);
        assert_eq!(registry.default_queue(), "alerts");
        assert!(registry.default_sync());
        assert!(registry.resolve("default").unwrap().is_none());
    }
}

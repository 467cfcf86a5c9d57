//! Configuration for the API client.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ApiError, Result};

/// Default number of gigs requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Configuration for the `GigbookClient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API server.
    #[serde(default)]
    pub base_url: Option<Url>,

    /// Timeout for requests.
    #[serde(with = "duration_secs", default = "default_timeout")]
    pub timeout: Duration,

    /// Bearer token sent with every request.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Gigs requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Cancel an in-flight gig list request when a newer one starts.
    #[serde(default = "default_supersede_lists")]
    pub supersede_lists: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: default_timeout(),
            access_token: None,
            page_size: default_page_size(),
            supersede_lists: default_supersede_lists(),
        }
    }
}

impl ApiConfig {
    /// Create a new config for the given server.
    pub fn with_url(base_url: Url) -> Self {
        Self {
            base_url: Some(base_url),
            ..Default::default()
        }
    }

    /// Set the timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the bearer token.
    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Enable or disable cancellation of superseded list requests.
    #[must_use]
    pub const fn supersede_lists(mut self, enabled: bool) -> Self {
        self.supersede_lists = enabled;
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::default().overlay_env(|key| std::env::var(key).ok())
    }

    /// Apply `GIGBOOK_*` variables from `lookup` on top of this config.
    ///
    /// Unparseable values are ignored with a warning.
    #[must_use]
    pub fn overlay_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("GIGBOOK_API_URL") {
            match url.parse() {
                Ok(parsed) => self.base_url = Some(parsed),
                Err(e) => tracing::warn!(value = %url, error = %e, "Ignoring invalid GIGBOOK_API_URL"),
            }
        }

        if let Some(token) = lookup("GIGBOOK_ACCESS_TOKEN").filter(|t| !t.trim().is_empty()) {
            self.access_token = Some(token);
        }

        if let Some(secs) = lookup("GIGBOOK_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => self.timeout = Duration::from_secs(secs),
                Err(e) => tracing::warn!(value = %secs, error = %e, "Ignoring invalid GIGBOOK_TIMEOUT_SECS"),
            }
        }

        if let Some(size) = lookup("GIGBOOK_PAGE_SIZE") {
            match size.parse::<u32>() {
                Ok(size) if size > 0 => self.page_size = size,
                _ => tracing::warn!(value = %size, "Ignoring invalid GIGBOOK_PAGE_SIZE"),
            }
        }

        self
    }

    /// The configured base URL, or a config error.
    pub fn require_base_url(&self) -> Result<&Url> {
        self.base_url
            .as_ref()
            .ok_or_else(|| ApiError::config_error("No base URL configured"))
    }

    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ApiError::config_error(format!("failed to read {}: {e}", path.display()))
        })?;

        // JSON by extension, TOML otherwise
        if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)
                .map_err(|e| ApiError::config_error(format!("Failed to parse config: {e}")))
        } else {
            toml::from_str(&content)
                .map_err(|e| ApiError::config_error(format!("Failed to parse config: {e}")))
        }
    }
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

const fn default_supersede_lists() -> bool {
    true
}

/// Serialization helper for Duration as seconds.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

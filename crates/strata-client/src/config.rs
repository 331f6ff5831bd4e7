//! Service configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Connection settings for a [`crate::GenericService`].
///
/// Derives serde so callers can load it from whatever config format they
/// already use; validation happens in [`ServiceConfig::validate`] before a
/// client is built from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Absolute base URL of one content-type endpoint,
    /// e.g. `https://cms.example.com/api/products`.
    pub base_url: String,

    /// Bearer token attached to every request. Empty or placeholder values
    /// (`"0"`, `"undefined"`) are treated as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Headers attached to every request before per-call headers.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,

    /// Transport timeout. No timeout when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Validate the configuration before any network I/O.
    pub fn validate(&self) -> Result<(), Error> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("base_url must not be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base_url `{}` must be absolute (http:// or https://)",
                self.base_url
            )));
        }
        Ok(())
    }
}

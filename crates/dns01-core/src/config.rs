//! Configuration types for the DNS-01 solver
//!
//! The configuration is built once at startup and handed to the solver's
//! constructor. Nothing in this crate reads the environment at call time.

use serde::{Deserialize, Serialize};

/// Production endpoint of the bunny.net REST API
pub const DEFAULT_API_BASE_URL: &str = "https://api.bunny.net";

/// Main solver configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// API group name the webhook is served under
    pub group_name: String,

    /// Provider API key
    /// ⚠️ NEVER log this value
    pub api_key: String,

    /// Base URL of the provider API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout for each HTTP call (in seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Resolve zones but only log the record changes that would be made
    #[serde(default)]
    pub dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverConfig")
            .field("group_name", &self.group_name)
            .field("api_key", &"<REDACTED>")
            .field("api_base_url", &self.api_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl SolverConfig {
    /// Create a new configuration with defaults for everything but the
    /// group name and API key
    pub fn new(group_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            api_key: api_key.into(),
            api_base_url: default_api_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
            dry_run: false,
        }
    }

    /// Override the API base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the HTTP timeout
    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = secs;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.group_name.trim().is_empty() {
            return Err(crate::Error::config("group name cannot be empty"));
        }

        self.credentials().validate()?;

        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "API base URL must use HTTP or HTTPS scheme. Got: {}",
                self.api_base_url
            )));
        }

        if self.http_timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeout must be > 0"));
        }

        Ok(())
    }

    /// The credentials carried by this configuration
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.api_key.clone())
    }

    /// HTTP timeout as a [`std::time::Duration`]
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http_timeout_secs)
    }
}

/// Provider API key, immutable for the life of the process
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<REDACTED>")
            .finish()
    }
}

impl Credentials {
    /// Wrap an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// The raw key, for the authentication header only
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Fail if no key is present
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key.trim().is_empty() {
            return Err(crate::Error::config("API key cannot be empty"));
        }
        Ok(())
    }
}

/// Host-provided context passed to `Solver::initialize`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    /// API group name the host serves the solver under
    #[serde(default)]
    pub group_name: String,

    /// Any additional host data
    #[serde(default)]
    pub extra: serde_json::Value,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

//! ESC client configuration.

use crate::error::{EscError, EscResult};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

/// Default Pulumi Cloud backend.
pub const DEFAULT_BACKEND_URL: &str = "https://api.pulumi.com";

/// Environment variable overriding the backend URL.
pub const BACKEND_URL_ENV: &str = "PULUMI_BACKEND_URL";

/// Environment variable holding the access token.
pub const ACCESS_TOKEN_ENV: &str = "PULUMI_ACCESS_TOKEN";

/// ESC client configuration.
#[derive(Debug, Clone)]
pub struct EscConfig {
    /// Backend address, without the `/api/esc` suffix
    pub backend_url: String,
    /// Pulumi access token
    pub access_token: Option<SecretString>,
    /// User agent sent by transports
    pub user_agent: String,
    /// Request timeout for transports
    pub timeout: Duration,
}

impl Default for EscConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            access_token: None,
            user_agent: format!("esc-sdk-rust/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
        }
    }
}

impl EscConfig {
    /// Create a configuration for a backend.
    #[must_use]
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            ..Default::default()
        }
    }

    /// Read `PULUMI_BACKEND_URL` and `PULUMI_ACCESS_TOKEN`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from a variable lookup. Empty values are
    /// treated as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key| lookup(key).filter(|v: &String| !v.is_empty());
        let mut config = Self::default();
        if let Some(url) = get(BACKEND_URL_ENV) {
            config.backend_url = url;
        }
        config.access_token = get(ACCESS_TOKEN_ENV).map(SecretString::from);
        config
    }

    /// Set the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL of the ESC API.
    #[must_use]
    pub fn server_url(&self) -> String {
        format!("{}/api/esc", self.backend_url.trim_end_matches('/'))
    }

    /// `Authorization` header value, when a token is configured.
    #[must_use]
    pub fn authorization_header(&self) -> Option<SecretString> {
        self.access_token
            .as_ref()
            .map(|token| SecretString::from(format!("token {}", token.expose_secret())))
    }

    /// Check the backend URL.
    ///
    /// # Errors
    ///
    /// Returns [`EscError::InvalidConfig`] unless the backend URL is an
    /// absolute `http` or `https` URL.
    pub fn validate(&self) -> EscResult<()> {
        let url = Url::parse(&self.backend_url)
            .map_err(|e| EscError::invalid_config(format!("backend URL: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(EscError::invalid_config(format!(
                "backend URL scheme must be http or https, got {other}"
            ))),
        }
    }
}

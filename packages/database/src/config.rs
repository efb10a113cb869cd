//! Backend connection settings read from the environment.

use std::time::Duration;

use crate::DbError;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default wait before the single retry of a transient failure.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Where the hosted backend lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub base_url: String,
    /// Anonymous API key sent as `apikey` and bearer token.
    pub api_key: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Wait before retrying a transient failure.
    pub retry_backoff: Duration,
}

impl BackendConfig {
    /// Creates a config with default timeouts.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Sets the retry backoff.
    #[must_use]
    pub const fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Reads `HSO_BACKEND_URL`, `HSO_BACKEND_KEY`, and the optional
    /// `HSO_REQUEST_TIMEOUT_SECS` / `HSO_RETRY_BACKOFF_MS`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the URL or key is missing, or a
    /// numeric setting does not parse.
    pub fn from_env() -> Result<Self, DbError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable lookup.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DbError> {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| DbError::Config {
                    message: format!("{key} must be set"),
                })
        };
        let number = |key: &str| -> Result<Option<u64>, DbError> {
            lookup(key)
                .map(|v| {
                    v.trim().parse::<u64>().map_err(|e| DbError::Config {
                        message: format!("{key}={v:?} is not a number: {e}"),
                    })
                })
                .transpose()
        };

        let base_url = required("HSO_BACKEND_URL")?;
        let api_key = required("HSO_BACKEND_KEY")?;
        let request_timeout = number("HSO_REQUEST_TIMEOUT_SECS")?
            .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs);
        let retry_backoff = number("HSO_RETRY_BACKOFF_MS")?
            .map_or(DEFAULT_RETRY_BACKOFF, Duration::from_millis);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            request_timeout,
            retry_backoff,
        })
    }
}

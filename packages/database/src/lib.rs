#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data access for the HSO dashboard.
//!
//! The dashboard never talks to the hosted backend directly. Every read
//! and write goes through one of the repository traits below, which are
//! implemented by [`rest::RestBackend`] for the hosted `PostgREST`
//! service and by [`memory::MemoryBackend`] for tests and demo mode.

pub mod config;
pub mod memory;
pub mod rest;
pub mod retry;

use async_trait::async_trait;
use hso_database_models::{Announcement, NewAnnouncement, Program};
use hso_incident_models::{IncidentFilter, IncidentId, IncidentRecord, IncidentUpdate};

pub use config::BackendConfig;
pub use memory::MemoryBackend;
pub use rest::RestBackend;

/// Errors that can occur while talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// No row matched the given id.
    #[error("No record with id {id}")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// Payload rejected before it was sent.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what went wrong.
        message: String,
    },

    /// Response had an unexpected shape.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// Backend configuration is missing or malformed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

impl DbError {
    /// Returns `true` if the failure is likely to go away on its own
    /// (connection errors, timeouts, HTTP 429, HTTP 5xx).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Json(_)
            | Self::NotFound { .. }
            | Self::Validation { .. }
            | Self::Conversion { .. }
            | Self::Config { .. } => false,
        }
    }
}

impl From<hso_database_models::InvalidAnnouncementError> for DbError {
    fn from(value: hso_database_models::InvalidAnnouncementError) -> Self {
        Self::Validation {
            message: value.to_string(),
        }
    }
}

/// Read and update access to incident reports.
#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Returns every incident matching all predicates of `filter`. An empty
    /// filter returns every row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot be queried.
    async fn query_incidents(&self, filter: &IncidentFilter)
    -> Result<Vec<IncidentRecord>, DbError>;

    /// Applies a partial update to one incident and returns the updated
    /// row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no incident has this id, or another
    /// [`DbError`] if the backend rejects the update.
    async fn update_incident(
        &self,
        id: &IncidentId,
        update: &IncidentUpdate,
    ) -> Result<IncidentRecord, DbError>;
}

/// Announcements and programs shown on the bulletin pages.
#[async_trait]
pub trait BulletinRepository: Send + Sync {
    /// Returns all announcements in backend order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot be queried.
    async fn list_announcements(&self) -> Result<Vec<Announcement>, DbError>;

    /// Inserts an announcement and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] for blank text, or another
    /// [`DbError`] if the insert fails.
    async fn insert_announcement(
        &self,
        announcement: &NewAnnouncement,
    ) -> Result<Announcement, DbError>;

    /// Returns all programs in backend order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot be queried.
    async fn list_programs(&self) -> Result<Vec<Program>, DbError>;
}

/// Account statistics.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Number of registered accounts.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot be queried.
    async fn count_accounts(&self) -> Result<u64, DbError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_classify_by_code() {
        let status = |status| DbError::Status {
            status,
            body: String::new(),
        };
        assert!(status(429).is_transient());
        assert!(status(500).is_transient());
        assert!(status(503).is_transient());
        assert!(!status(400).is_transient());
        assert!(!status(404).is_transient());
        assert!(
            !DbError::NotFound {
                id: "1".to_string()
            }
            .is_transient()
        );
    }

    #[test]
    fn invalid_announcement_becomes_validation_error() {
        let err = DbError::from(hso_database_models::InvalidAnnouncementError { field: "title" });
        assert!(matches!(err, DbError::Validation { ref message } if message.contains("title")));
    }
}

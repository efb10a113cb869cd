//! Client for the hosted `PostgREST` backend.
//!
//! Tables are addressed as `<base_url>/rest/v1/<table>`. Equality filters
//! are passed as `column=eq.value` query parameters and writes ask for the
//! affected rows back with `Prefer: return=representation`.

use async_trait::async_trait;
use hso_database_models::{AccountRow, Announcement, NewAnnouncement, Program};
use hso_incident_models::{IncidentFilter, IncidentId, IncidentRecord, IncidentUpdate};
use reqwest::Method;

use crate::{
    AccountRepository, BackendConfig, BulletinRepository, DbError, IncidentRepository, retry,
};

const INCIDENTS: &str = "incidents";
const ANNOUNCEMENTS: &str = "announcements";
const PROGRAMS: &str = "programs";
const ACCOUNTS: &str = "Account";

/// Repository implementation backed by the hosted REST API.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl RestBackend {
    /// Builds a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Http`] if the HTTP client cannot be created.
    pub fn new(config: BackendConfig) -> Result<Self, DbError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds a client from `HSO_BACKEND_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the environment is incomplete.
    pub fn from_env() -> Result<Self, DbError> {
        Self::new(BackendConfig::from_env()?)
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{table}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request(&self, method: Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn select_all<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, DbError> {
        let response = retry::send_with_retry(
            || self.request(Method::GET, table).query(params),
            self.config.retry_backoff,
        )
        .await?;
        retry::read_json(response).await
    }
}

#[async_trait]
impl IncidentRepository for RestBackend {
    async fn query_incidents(
        &self,
        filter: &IncidentFilter,
    ) -> Result<Vec<IncidentRecord>, DbError> {
        let mut params = vec![("select", "*".to_string())];
        params.extend(
            filter
                .predicates()
                .map(|(field, value)| (field.column(), format!("eq.{value}"))),
        );
        let rows: Vec<IncidentRecord> = self.select_all(INCIDENTS, &params).await?;
        log::debug!("fetched {} incidents", rows.len());
        Ok(rows)
    }

    async fn update_incident(
        &self,
        id: &IncidentId,
        update: &IncidentUpdate,
    ) -> Result<IncidentRecord, DbError> {
        let params = [("id", format!("eq.{id}"))];
        let response = retry::send_with_retry(
            || {
                self.request(Method::PATCH, INCIDENTS)
                    .query(&params)
                    .header("Prefer", "return=representation")
                    .json(update)
            },
            self.config.retry_backoff,
        )
        .await?;
        let rows: Vec<IncidentRecord> = retry::read_json(response).await?;
        rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            id: id.to_string(),
        })
    }
}

#[async_trait]
impl BulletinRepository for RestBackend {
    async fn list_announcements(&self) -> Result<Vec<Announcement>, DbError> {
        self.select_all(ANNOUNCEMENTS, &[("select", "*".to_string())])
            .await
    }

    async fn insert_announcement(
        &self,
        announcement: &NewAnnouncement,
    ) -> Result<Announcement, DbError> {
        announcement.validate()?;
        let response = retry::send_with_retry(
            || {
                self.request(Method::POST, ANNOUNCEMENTS)
                    .header("Prefer", "return=representation")
                    .json(announcement)
            },
            self.config.retry_backoff,
        )
        .await?;
        let rows: Vec<Announcement> = retry::read_json(response).await?;
        rows.into_iter().next().ok_or_else(|| DbError::Conversion {
            message: "insert returned no announcement row".to_string(),
        })
    }

    async fn list_programs(&self) -> Result<Vec<Program>, DbError> {
        self.select_all(PROGRAMS, &[("select", "*".to_string())])
            .await
    }
}

#[async_trait]
impl AccountRepository for RestBackend {
    async fn count_accounts(&self) -> Result<u64, DbError> {
        let rows: Vec<AccountRow> = self
            .select_all(ACCOUNTS, &[("select", "user_type".to_string())])
            .await?;
        Ok(rows.len() as u64)
    }
}

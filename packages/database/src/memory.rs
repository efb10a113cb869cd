//! In-process backend used by tests and the server's demo mode.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use hso_database_models::{AccountRow, Announcement, NewAnnouncement, Program};
use hso_incident_models::{IncidentFilter, IncidentId, IncidentRecord, IncidentUpdate};
use tokio::sync::RwLock;

use crate::{AccountRepository, BulletinRepository, DbError, IncidentRepository};

/// Repository implementation that keeps every table in memory.
///
/// Rows are returned in insertion order. [`MemoryBackend::fail_next_query`]
/// makes the next read fail once, which is how callers' fallback paths
/// are exercised.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    incidents: RwLock<Vec<IncidentRecord>>,
    announcements: RwLock<Vec<Announcement>>,
    programs: RwLock<Vec<Program>>,
    accounts: RwLock<Vec<AccountRow>>,
    fail_next: AtomicBool,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the incidents table.
    #[must_use]
    pub fn with_incidents(self, rows: Vec<IncidentRecord>) -> Self {
        Self {
            incidents: RwLock::new(rows),
            ..self
        }
    }

    /// Seeds the announcements table.
    #[must_use]
    pub fn with_announcements(self, rows: Vec<Announcement>) -> Self {
        Self {
            announcements: RwLock::new(rows),
            ..self
        }
    }

    /// Seeds the programs table.
    #[must_use]
    pub fn with_programs(self, rows: Vec<Program>) -> Self {
        Self {
            programs: RwLock::new(rows),
            ..self
        }
    }

    /// Seeds the accounts table.
    #[must_use]
    pub fn with_accounts(self, rows: Vec<AccountRow>) -> Self {
        Self {
            accounts: RwLock::new(rows),
            ..self
        }
    }

    /// Makes the next read of any table fail with a transient error.
    pub fn fail_next_query(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Returns a copy of the incidents table.
    pub async fn incidents(&self) -> Vec<IncidentRecord> {
        self.incidents.read().await.clone()
    }

    fn check_injected_failure(&self) -> Result<(), DbError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DbError::Status {
                status: 503,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl IncidentRepository for MemoryBackend {
    async fn query_incidents(
        &self,
        filter: &IncidentFilter,
    ) -> Result<Vec<IncidentRecord>, DbError> {
        self.check_injected_failure()?;
        Ok(self
            .incidents
            .read()
            .await
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn update_incident(
        &self,
        id: &IncidentId,
        update: &IncidentUpdate,
    ) -> Result<IncidentRecord, DbError> {
        let mut incidents = self.incidents.write().await;
        let record = incidents
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| DbError::NotFound { id: id.to_string() })?;
        update.apply_to(record);
        Ok(record.clone())
    }
}

#[async_trait]
impl BulletinRepository for MemoryBackend {
    async fn list_announcements(&self) -> Result<Vec<Announcement>, DbError> {
        self.check_injected_failure()?;
        Ok(self.announcements.read().await.clone())
    }

    async fn insert_announcement(
        &self,
        announcement: &NewAnnouncement,
    ) -> Result<Announcement, DbError> {
        announcement.validate()?;
        let row = Announcement {
            id: uuid::Uuid::new_v4().to_string(),
            title: Some(announcement.title.clone()),
            content: Some(announcement.content.clone()),
            created_by: announcement.created_by.clone(),
            color: Some(announcement.color.to_string()),
            images: announcement.images.clone(),
            created_at: Some(announcement.created_at.clone()),
        };
        self.announcements.write().await.push(row.clone());
        Ok(row)
    }

    async fn list_programs(&self) -> Result<Vec<Program>, DbError> {
        self.check_injected_failure()?;
        Ok(self.programs.read().await.clone())
    }
}

#[async_trait]
impl AccountRepository for MemoryBackend {
    async fn count_accounts(&self) -> Result<u64, DbError> {
        self.check_injected_failure()?;
        Ok(self.accounts.read().await.len() as u64)
    }
}

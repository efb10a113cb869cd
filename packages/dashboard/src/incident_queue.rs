//! A department's queue of incidents waiting to be worked on.
//!
//! The Health and Safety Office dispatches an incident by setting its
//! office and marking it `Ongoing`. The receiving department sees it in
//! its queue, and once the work is done forwards it back to the Health and
//! Safety Office as `Resolved`, optionally with a note on the action taken.

use hso_database::{DbError, IncidentRepository};
use hso_incident_models::{
    IncidentFilter, IncidentId, IncidentRecord, IncidentStatus, IncidentUpdate, Office,
};
use hso_listing::{ListQuery, Page, derive_view_with};

use crate::{LoadState, recover};

/// Status restriction applied on top of a queue search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// Every status.
    #[default]
    All,
    /// Only incidents with this status.
    Only(IncidentStatus),
}

impl StatusFilter {
    /// Parses a filter value: empty or `all` (any case) for [`Self::All`],
    /// otherwise an exact status label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        IncidentStatus::from_label(value).map(Self::Only)
    }

    /// Returns `true` if `record` passes the filter.
    #[must_use]
    pub fn matches(self, record: &IncidentRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => record.status_category() == Some(status),
        }
    }
}

/// Incidents assigned to one office and still in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentQueue {
    office: Office,
    items: Vec<IncidentRecord>,
}

impl DepartmentQueue {
    /// Wraps already-fetched records.
    #[must_use]
    pub const fn from_records(office: Office, items: Vec<IncidentRecord>) -> Self {
        Self { office, items }
    }

    /// Fetches the `Ongoing` incidents assigned to `office`. A failed
    /// fetch is logged and yields an empty queue.
    pub async fn load<R: IncidentRepository + ?Sized>(repo: &R, office: Office) -> LoadState<Self> {
        let filter = IncidentFilter::all()
            .with_status(IncidentStatus::Ongoing)
            .with_office(office);
        let result = repo.query_incidents(&filter).await;
        recover("incidents", result, Vec::new).map(|items| Self::from_records(office, items))
    }

    /// Office that owns the queue.
    #[must_use]
    pub const fn office(&self) -> Office {
        self.office
    }

    /// Every record in the queue, in fetch order.
    #[must_use]
    pub fn items(&self) -> &[IncidentRecord] {
        &self.items
    }

    /// Records matching `search` (name, location, description) and
    /// `status`, in fetch order.
    #[must_use]
    pub fn filter(&self, search: &str, status: StatusFilter) -> Vec<IncidentRecord> {
        self.view(&ListQuery::default().search(search).page(1, usize::MAX), status)
            .items
    }

    /// Paged variant of [`Self::filter`].
    #[must_use]
    pub fn view(&self, query: &ListQuery, status: StatusFilter) -> Page<IncidentRecord> {
        derive_view_with(&self.items, query, |record| status.matches(record))
    }

    /// Marks the incident resolved, hands it back to the Health and Safety
    /// Office, and drops it from the queue.
    ///
    /// A blank `action_taken` note is not sent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the update fails; the queue is left as is.
    pub async fn forward_resolved<R: IncidentRepository + ?Sized>(
        &mut self,
        repo: &R,
        id: &IncidentId,
        action_taken: Option<&str>,
    ) -> Result<IncidentRecord, DbError> {
        let update = IncidentUpdate {
            status: Some(IncidentStatus::Resolved),
            office: Some(Office::HealthAndSafetyOffice.to_string()),
            action_taken: action_taken
                .map(str::trim)
                .filter(|note| !note.is_empty())
                .map(ToString::to_string),
        };
        let updated = repo.update_incident(id, &update).await.inspect_err(|e| {
            log::error!("Error forwarding incident {id}: {e}");
        })?;
        self.items.retain(|record| &record.id != id);
        log::info!(
            "{} forwarded incident {id} to {}",
            self.office.slug(),
            Office::HealthAndSafetyOffice
        );
        Ok(updated)
    }
}

/// Dispatches an incident to `office` and marks it `Ongoing`.
///
/// # Errors
///
/// Returns [`DbError`] if the update fails.
pub async fn assign<R: IncidentRepository + ?Sized>(
    repo: &R,
    id: &IncidentId,
    office: Office,
) -> Result<IncidentRecord, DbError> {
    let update = IncidentUpdate {
        status: Some(IncidentStatus::Ongoing),
        office: Some(office.to_string()),
        action_taken: None,
    };
    let updated = repo.update_incident(id, &update).await?;
    log::info!("assigned incident {id} to {office}");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use hso_database::MemoryBackend;

    use super::*;

    fn report(id: i64, status: &str, office: Office, name: &str, location: &str) -> IncidentRecord {
        let mut record = IncidentRecord::new(id, status, "2024-03-01T08:00:00Z");
        record.office = Some(office.to_string());
        record.name = Some(name.to_string());
        record.location = Some(location.to_string());
        record
    }

    fn backend() -> MemoryBackend {
        MemoryBackend::new().with_incidents(vec![
            report(1, "Ongoing", Office::GeneralServicesDepartment, "Ana", "Gym"),
            report(2, "Ongoing", Office::GeneralServicesDepartment, "Ben", "Library"),
            report(3, "Ongoing", Office::MedicalDentalServices, "Cy", "Clinic"),
            report(4, "Resolved", Office::GeneralServicesDepartment, "Di", "Gym"),
            report(5, "Open", Office::HealthAndSafetyOffice, "Ed", "Canteen"),
        ])
    }

    fn ids(records: &[IncidentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn status_filter_parsing() {
        assert_eq!(StatusFilter::parse(""), Some(StatusFilter::All));
        assert_eq!(StatusFilter::parse("ALL"), Some(StatusFilter::All));
        assert_eq!(
            StatusFilter::parse("Resolved"),
            Some(StatusFilter::Only(IncidentStatus::Resolved))
        );
        assert_eq!(StatusFilter::parse("done"), None);
    }

    #[tokio::test]
    async fn loads_only_ongoing_incidents_for_the_office() {
        let queue = DepartmentQueue::load(&backend(), Office::GeneralServicesDepartment)
            .await
            .into_value()
            .unwrap();

        assert_eq!(ids(queue.items()), vec!["1", "2"]);
        assert_eq!(ids(&queue.filter("gym", StatusFilter::All)), vec!["1"]);
        assert_eq!(ids(&queue.filter("", StatusFilter::All)), vec!["1", "2"]);
        assert!(
            queue
                .filter("", StatusFilter::Only(IncidentStatus::Resolved))
                .is_empty()
        );
    }

    #[tokio::test]
    async fn failed_load_yields_empty_queue() {
        let backend = backend();
        backend.fail_next_query();

        let state = DepartmentQueue::load(&backend, Office::MedicalDentalServices).await;

        assert_eq!(state.label(), "failed");
        assert!(state.value().unwrap().items().is_empty());
    }

    #[tokio::test]
    async fn forwarding_resolves_and_returns_to_hso() {
        let backend = backend();
        let mut queue = DepartmentQueue::load(&backend, Office::GeneralServicesDepartment)
            .await
            .into_value()
            .unwrap();

        let updated = queue
            .forward_resolved(&backend, &IncidentId::from(2), Some("  Fixed the door  "))
            .await
            .unwrap();

        assert_eq!(updated.status.as_deref(), Some("Resolved"));
        assert_eq!(updated.office.as_deref(), Some("Health and Safety Office"));
        assert_eq!(updated.action_taken.as_deref(), Some("Fixed the door"));
        assert_eq!(ids(queue.items()), vec!["1"]);

        let reloaded = DepartmentQueue::load(&backend, Office::GeneralServicesDepartment)
            .await
            .into_value()
            .unwrap();
        assert_eq!(ids(reloaded.items()), vec!["1"]);
    }

    #[tokio::test]
    async fn failed_forward_keeps_the_item() {
        let backend = backend();
        let mut queue = DepartmentQueue::from_records(
            Office::GeneralServicesDepartment,
            vec![report(42, "Ongoing", Office::GeneralServicesDepartment, "Fay", "Lab")],
        );

        let err = queue
            .forward_resolved(&backend, &IncidentId::from(42), None)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(queue.items().len(), 1);
    }

    #[tokio::test]
    async fn assigning_dispatches_to_department() {
        let backend = backend();

        let updated = assign(&backend, &IncidentId::from(5), Office::MedicalDentalServices)
            .await
            .unwrap();

        assert_eq!(updated.status.as_deref(), Some("Ongoing"));
        let queue = DepartmentQueue::load(&backend, Office::MedicalDentalServices)
            .await
            .into_value()
            .unwrap();
        assert_eq!(ids(queue.items()), vec!["3", "5"]);
    }
}

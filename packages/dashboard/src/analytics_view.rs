//! Incident analytics page: fetch every incident, aggregate by month.

use chrono::TimeZone;
use futures::future::{AbortRegistration, Abortable};
use hso_analytics::chart::{monthly_chart, status_chart};
use hso_analytics::compute_monthly_breakdown_in;
use hso_analytics_models::{ChartData, MonthlyBreakdown};
use hso_database::IncidentRepository;
use hso_incident_models::IncidentFilter;
use serde::{Deserialize, Serialize};

use crate::{LoadState, recover};

/// Everything the analytics page renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    /// Monthly counts and totals.
    pub breakdown: MonthlyBreakdown,
    /// Line chart with one series per status.
    pub monthly_chart: ChartData,
    /// Bar chart of the three totals.
    pub status_chart: ChartData,
}

impl From<MonthlyBreakdown> for AnalyticsSnapshot {
    fn from(breakdown: MonthlyBreakdown) -> Self {
        Self {
            monthly_chart: monthly_chart(&breakdown),
            status_chart: status_chart(&breakdown.totals),
            breakdown,
        }
    }
}

/// Fetches all incidents and aggregates them in `tz`.
///
/// A failed fetch is logged and yields the all-zero breakdown.
pub async fn load_breakdown<R, Tz>(repo: &R, tz: &Tz) -> LoadState<MonthlyBreakdown>
where
    R: IncidentRepository + ?Sized,
    Tz: TimeZone,
{
    let result = repo.query_incidents(&IncidentFilter::all()).await;
    recover("incidents", result, Vec::new)
        .map(|records| compute_monthly_breakdown_in(&records, tz))
}

/// [`load_breakdown`] that stops when `registration`'s handle is aborted,
/// e.g. because the page was closed before the fetch finished.
pub async fn load_breakdown_with<R, Tz>(
    repo: &R,
    tz: &Tz,
    registration: AbortRegistration,
) -> LoadState<MonthlyBreakdown>
where
    R: IncidentRepository + ?Sized,
    Tz: TimeZone,
{
    Abortable::new(load_breakdown(repo, tz), registration)
        .await
        .unwrap_or_else(|_aborted| {
            log::debug!("incident fetch aborted");
            LoadState::Cancelled
        })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use futures::future::AbortHandle;
    use hso_database::{DbError, MemoryBackend};
    use hso_incident_models::{IncidentId, IncidentRecord, IncidentStatus, IncidentUpdate};

    use super::*;

    fn seeded() -> MemoryBackend {
        MemoryBackend::new().with_incidents(vec![
            IncidentRecord::new(1, "Open", "2024-01-15T09:00:00Z"),
            IncidentRecord::new(2, "Resolved", "2024-01-20T09:00:00Z"),
            IncidentRecord::new(3, "Ongoing", "2024-02-01T09:00:00Z"),
            IncidentRecord::new(4, "Resolved", "2024-02-10T09:00:00Z"),
        ])
    }

    /// Never answers.
    struct Stalled;

    #[async_trait]
    impl IncidentRepository for Stalled {
        async fn query_incidents(
            &self,
            _filter: &IncidentFilter,
        ) -> Result<Vec<IncidentRecord>, DbError> {
            futures::future::pending().await
        }

        async fn update_incident(
            &self,
            id: &IncidentId,
            _update: &IncidentUpdate,
        ) -> Result<IncidentRecord, DbError> {
            Err(DbError::NotFound { id: id.to_string() })
        }
    }

    #[tokio::test]
    async fn loads_and_aggregates_all_incidents() {
        let state = load_breakdown(&seeded(), &Utc).await;

        let LoadState::Ready(breakdown) = state else {
            panic!("expected ready state");
        };
        assert_eq!(breakdown.totals.resolved, 2);
        assert_eq!(&breakdown.resolved.as_slice()[..2], &[1, 1]);
        assert_eq!(breakdown.ongoing.as_slice()[1], 1);
        assert_eq!(breakdown.open.as_slice()[0], 1);
    }

    #[tokio::test]
    async fn fetch_failure_falls_back_to_zeroes() {
        let backend = seeded();
        backend.fail_next_query();

        let state = load_breakdown(&backend, &Utc).await;

        assert_eq!(state.label(), "failed");
        assert_eq!(state.value(), Some(&MonthlyBreakdown::empty()));
    }

    #[tokio::test]
    async fn aborting_before_completion_cancels() {
        let (handle, registration) = AbortHandle::new_pair();
        let load = load_breakdown_with(&Stalled, &Utc, registration);
        let abort = async {
            tokio::task::yield_now().await;
            handle.abort();
        };

        let (state, ()) = futures::future::join(load, abort).await;

        assert_eq!(state, LoadState::Cancelled);
    }

    #[tokio::test]
    async fn unaborted_load_completes() {
        let (_handle, registration) = AbortHandle::new_pair();
        let state = load_breakdown_with(&seeded(), &Utc, registration).await;
        assert!(state.is_ready());
    }

    #[test]
    fn snapshot_carries_both_charts() {
        let records = [IncidentRecord::new(1, "Ongoing", "2024-03-03T00:00:00Z")];
        let snapshot = AnalyticsSnapshot::from(compute_monthly_breakdown_in(&records, &Utc));

        assert_eq!(snapshot.monthly_chart.datasets.len(), 3);
        assert_eq!(snapshot.status_chart.labels.len(), 3);
        assert_eq!(snapshot.breakdown.totals.get(IncidentStatus::Ongoing), 1);
    }
}

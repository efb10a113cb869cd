//! Headline counters on the landing dashboard.

use chrono::TimeZone;
use hso_analytics::compute_monthly_breakdown_in;
use hso_analytics_models::StatusTotals;
use hso_database::{AccountRepository, IncidentRepository};
use hso_incident_models::IncidentFilter;
use serde::{Deserialize, Serialize};

use crate::{LoadState, recover};

/// Counters shown on the landing dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Registered accounts.
    pub total_users: u64,
    /// Incidents per status.
    pub totals: StatusTotals,
}

/// Fetches the account count and incident totals concurrently.
///
/// Each fetch degrades to zero on its own when it fails, so a broken
/// accounts table does not hide the incident counters. The result is
/// [`LoadState::Failed`] if either fetch failed, with the partial summary
/// as its fallback and one `what: reason` entry per failed fetch.
pub async fn load_summary<I, A, Tz>(
    incidents: &I,
    accounts: &A,
    tz: &Tz,
) -> LoadState<DashboardSummary>
where
    I: IncidentRepository + ?Sized,
    A: AccountRepository + ?Sized,
    Tz: TimeZone,
{
    let (records, users) = futures::future::join(
        incidents.query_incidents(&IncidentFilter::all()),
        accounts.count_accounts(),
    )
    .await;

    let totals = recover("incidents", records, Vec::new)
        .map(|records| compute_monthly_breakdown_in(&records, tz).totals);
    let users = recover("accounts", users, || 0);

    let failures: Vec<String> = [("incidents", totals.error()), ("accounts", users.error())]
        .into_iter()
        .filter_map(|(what, reason)| reason.map(|reason| format!("{what}: {reason}")))
        .collect();

    let summary = DashboardSummary {
        total_users: users.into_value().unwrap_or_default(),
        totals: totals.into_value().unwrap_or_default(),
    };

    if failures.is_empty() {
        LoadState::Ready(summary)
    } else {
        LoadState::Failed {
            fallback: summary,
            reason: failures.join("; "),
        }
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the HSO dashboard server.
//!
//! Response bodies wrap the dashboard view types with the load status of
//! the data behind them, so a client can show a "failed to load" notice
//! while still rendering the empty fallback.

use hso_dashboard::LoadState;
use hso_dashboard::analytics_view::AnalyticsSnapshot;
use hso_dashboard::summary::DashboardSummary;
use hso_listing::Page;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable description.
    pub error: String,
}

/// How the data behind a response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLoadStatus {
    /// `ready`, `failed`, or `cancelled`.
    pub status: String,
    /// Failure reason when `status` is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<&LoadState<T>> for ApiLoadStatus {
    fn from(state: &LoadState<T>) -> Self {
        Self {
            status: state.label().to_string(),
            error: state.error().map(ToString::to_string),
        }
    }
}

/// `GET /api/analytics/monthly` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnalytics {
    /// Load status of the incident list.
    #[serde(flatten)]
    pub load: ApiLoadStatus,
    /// Breakdown and charts.
    #[serde(flatten)]
    pub snapshot: AnalyticsSnapshot,
}

/// `GET /api/dashboard/summary` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    /// `failed` if either the incident or the account fetch failed.
    #[serde(flatten)]
    pub load: ApiLoadStatus,
    /// Counters, zeroed for whichever fetch failed.
    #[serde(flatten)]
    pub summary: DashboardSummary,
}

/// A page of items plus the load status of the list it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiListing<T> {
    /// Load status of the underlying list.
    #[serde(flatten)]
    pub load: ApiLoadStatus,
    /// The requested page.
    #[serde(flatten)]
    pub page: Page<T>,
}

/// Query parameters for `GET /api/incidents`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentQueryParams {
    /// Exact status label.
    pub status: Option<String>,
    /// Office slug (`hso`, `gsd`, `mds`) or full name.
    pub office: Option<String>,
}

/// Query parameters for `GET /api/queue/{office}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueQueryParams {
    /// Search over name, location, and description.
    pub search: Option<String>,
    /// `all` or an exact status label.
    pub status: Option<String>,
    /// One-based page number.
    pub page: Option<usize>,
    /// Page size.
    pub per_page: Option<usize>,
}

/// Query parameters for `GET /api/announcements`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementQueryParams {
    /// Search over title and content.
    pub search: Option<String>,
    /// `recent`, `oldest`, or a color.
    pub filter: Option<String>,
    /// One-based page number.
    pub page: Option<usize>,
    /// Page size; defaults to the configured announcements per page.
    pub per_page: Option<usize>,
}

/// Query parameters for `GET /api/programs`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramQueryParams {
    /// Search over title and description.
    pub search: Option<String>,
    /// `newest` or `oldest`.
    pub sort: Option<String>,
    /// One-based page number.
    pub page: Option<usize>,
    /// Page size; defaults to the configured programs per page.
    pub per_page: Option<usize>,
}

/// Body of `POST /api/queue/{office}/{id}/forward`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardRequest {
    /// Note describing what was done.
    #[serde(default)]
    pub action_taken: Option<String>,
}

/// Body of `POST /api/incidents/{id}/assign`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRequest {
    /// Office slug or full name.
    pub office: String,
}

#[cfg(test)]
mod tests {
    use hso_analytics_models::MonthlyBreakdown;

    use super::*;

    #[test]
    fn analytics_response_flattens_status_and_snapshot() {
        let state = LoadState::Failed {
            fallback: MonthlyBreakdown::empty(),
            reason: "timeout".to_string(),
        };
        let body = ApiAnalytics {
            load: ApiLoadStatus::from(&state),
            snapshot: AnalyticsSnapshot::from(MonthlyBreakdown::empty()),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "timeout");
        assert_eq!(json["breakdown"]["totals"]["open"], 0);
        assert_eq!(json["monthlyChart"]["labels"][0], "January");
    }

    #[test]
    fn summary_response_flattens_counters() {
        let state = LoadState::Failed {
            fallback: DashboardSummary::default(),
            reason: "accounts: timeout".to_string(),
        };
        let body = ApiSummary {
            load: ApiLoadStatus::from(&state),
            summary: DashboardSummary::default(),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "accounts: timeout");
        assert_eq!(json["totalUsers"], 0);
        assert_eq!(json["totals"]["resolved"], 0);
    }

    #[test]
    fn ready_listing_omits_error() {
        let state: LoadState<Vec<u8>> = LoadState::Ready(vec![1]);
        let body = ApiListing {
            load: ApiLoadStatus::from(&state),
            page: Page {
                items: vec![1_u8],
                page: 1,
                per_page: 8,
                total_items: 1,
                total_pages: 1,
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "ready");
        assert!(json.get("error").is_none());
        assert_eq!(json["totalPages"], 1);
    }
}

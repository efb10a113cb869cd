#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident analytics result types.
//!
//! [`MonthlyBreakdown`] is what the dashboard's charts and counters are
//! rendered from. [`ChartData`] is the dataset shape the charting surface
//! consumes directly.

use hso_incident_models::IncidentStatus;
use serde::{Deserialize, Serialize};

/// Number of calendar months in a [`MonthlySeries`].
pub const MONTHS_PER_YEAR: usize = 12;

/// Month names used as chart labels, January first.
pub const MONTH_LABELS: [&str; MONTHS_PER_YEAR] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Per-month counts. Index 0 is January, index 11 is December.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlySeries([u64; MONTHS_PER_YEAR]);

impl MonthlySeries {
    /// Twelve zeros.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self([0; MONTHS_PER_YEAR])
    }

    /// Wraps an existing array of counts.
    #[must_use]
    pub const fn from_counts(counts: [u64; MONTHS_PER_YEAR]) -> Self {
        Self(counts)
    }

    /// Adds one to the slot for `month0` (zero-based). Out-of-range months
    /// are ignored.
    pub fn increment(&mut self, month0: usize) {
        if let Some(slot) = self.0.get_mut(month0) {
            *slot += 1;
        }
    }

    /// Returns the count for `month0`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, month0: usize) -> Option<u64> {
        self.0.get(month0).copied()
    }

    /// Sum of all twelve slots.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// The twelve counts as a slice.
    #[must_use]
    pub const fn as_slice(&self) -> &[u64] {
        &self.0
    }
}

/// Scalar count of incidents per status category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusTotals {
    /// Incidents with status `Resolved`.
    pub resolved: u64,
    /// Incidents with status `Ongoing`.
    pub ongoing: u64,
    /// Incidents with status `Open`.
    pub open: u64,
}

impl StatusTotals {
    /// Returns the total for a single status.
    #[must_use]
    pub const fn get(&self, status: IncidentStatus) -> u64 {
        match status {
            IncidentStatus::Resolved => self.resolved,
            IncidentStatus::Ongoing => self.ongoing,
            IncidentStatus::Open => self.open,
        }
    }

    /// Sum across the three categories. Records with unrecognized statuses
    /// are not included.
    #[must_use]
    pub const fn grand_total(&self) -> u64 {
        self.resolved + self.ongoing + self.open
    }
}

/// Monthly counts per status category plus their scalar totals.
///
/// Totals are always derived from the series, so `series(s).total() ==
/// totals.get(s)` for every status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    /// Resolved incidents per month.
    pub resolved: MonthlySeries,
    /// Ongoing incidents per month.
    pub ongoing: MonthlySeries,
    /// Open incidents per month.
    pub open: MonthlySeries,
    /// Scalar totals of the three series.
    pub totals: StatusTotals,
}

impl MonthlyBreakdown {
    /// All-zero breakdown.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            resolved: MonthlySeries::zeroed(),
            ongoing: MonthlySeries::zeroed(),
            open: MonthlySeries::zeroed(),
            totals: StatusTotals {
                resolved: 0,
                ongoing: 0,
                open: 0,
            },
        }
    }

    /// Builds a breakdown from its three series, deriving the totals.
    #[must_use]
    pub fn from_series(
        resolved: MonthlySeries,
        ongoing: MonthlySeries,
        open: MonthlySeries,
    ) -> Self {
        Self {
            resolved,
            ongoing,
            open,
            totals: StatusTotals {
                resolved: resolved.total(),
                ongoing: ongoing.total(),
                open: open.total(),
            },
        }
    }

    /// Returns the series for `status`.
    #[must_use]
    pub const fn series(&self, status: IncidentStatus) -> &MonthlySeries {
        match status {
            IncidentStatus::Resolved => &self.resolved,
            IncidentStatus::Ongoing => &self.ongoing,
            IncidentStatus::Open => &self.open,
        }
    }
}

/// Chart payload: shared labels plus one or more datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    /// X-axis labels.
    pub labels: Vec<String>,
    /// Series drawn against the labels.
    pub datasets: Vec<ChartDataset>,
}

/// A single series in a [`ChartData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    /// Legend label.
    pub label: String,
    /// One value per chart label.
    pub data: Vec<u64>,
    /// Fill color.
    pub background_color: ChartColor,
    /// Stroke color.
    pub border_color: ChartColor,
    /// Whether the area under a line is filled.
    pub fill: bool,
}

/// A CSS color for a whole dataset, or one per data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartColor {
    /// Same color for every point.
    Single(String),
    /// One color per point, in label order.
    PerPoint(Vec<String>),
}

impl From<&str> for ChartColor {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

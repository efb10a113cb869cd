//! Chart datasets for the analytics and dashboard pages.

use hso_analytics_models::{
    ChartColor, ChartData, ChartDataset, MONTH_LABELS, MonthlyBreakdown, StatusTotals,
};
use hso_incident_models::IncidentStatus;

/// `(fill, stroke)` colors for a status.
const fn status_colors(status: IncidentStatus) -> (&'static str, &'static str) {
    match status {
        IncidentStatus::Resolved => ("rgba(75, 192, 192, 0.5)", "rgba(75, 192, 192, 1)"),
        IncidentStatus::Ongoing => ("rgba(255, 206, 86, 0.5)", "rgba(255, 206, 86, 1)"),
        IncidentStatus::Open => ("rgba(255, 99, 132, 0.5)", "rgba(255, 99, 132, 1)"),
    }
}

/// Legend label for a status series.
fn series_label(status: IncidentStatus) -> String {
    format!("{status} Reports")
}

/// One filled dataset per status across the twelve months.
#[must_use]
pub fn monthly_chart(breakdown: &MonthlyBreakdown) -> ChartData {
    let datasets = IncidentStatus::all()
        .iter()
        .map(|status| {
            let (background, border) = status_colors(*status);
            ChartDataset {
                label: series_label(*status),
                data: breakdown.series(*status).as_slice().to_vec(),
                background_color: background.into(),
                border_color: border.into(),
                fill: true,
            }
        })
        .collect();

    ChartData {
        labels: MONTH_LABELS.iter().map(ToString::to_string).collect(),
        datasets,
    }
}

/// A single dataset with one bar per status total.
#[must_use]
pub fn status_chart(totals: &StatusTotals) -> ChartData {
    let statuses = IncidentStatus::all();

    ChartData {
        labels: statuses.iter().map(ToString::to_string).collect(),
        datasets: vec![ChartDataset {
            label: "Reports".to_string(),
            data: statuses.iter().map(|s| totals.get(*s)).collect(),
            background_color: ChartColor::PerPoint(
                statuses
                    .iter()
                    .map(|s| status_colors(*s).0.to_string())
                    .collect(),
            ),
            border_color: ChartColor::PerPoint(
                statuses
                    .iter()
                    .map(|s| status_colors(*s).1.to_string())
                    .collect(),
            ),
            fill: false,
        }],
    }
}

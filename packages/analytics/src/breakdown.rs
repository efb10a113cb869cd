//! Monthly status breakdown of incident records.

use chrono::{Local, TimeZone};
use hso_analytics_models::{MonthlyBreakdown, MonthlySeries};
use hso_incident_models::{IncidentRecord, IncidentStatus};
use hso_listing::timestamp::month_index;

/// Buckets incidents by status and creation month, as seen from the local
/// time zone of the process.
///
/// See [`compute_monthly_breakdown_in`].
#[must_use]
pub fn compute_monthly_breakdown<'a, I>(records: I) -> MonthlyBreakdown
where
    I: IntoIterator<Item = &'a IncidentRecord>,
{
    compute_monthly_breakdown_in(records, &Local)
}

/// Buckets incidents by status and creation month, as seen from `tz`.
///
/// Single pass, order-independent, and blind to `id` (duplicates count
/// twice). Records are left out of every series and total when:
///
/// - the status is missing or not one of `Resolved`, `Ongoing`, `Open`;
/// - `created_at` is missing or cannot be parsed into a month.
///
/// Neither case is an error.
#[must_use]
pub fn compute_monthly_breakdown_in<'a, I, Tz>(records: I, tz: &Tz) -> MonthlyBreakdown
where
    I: IntoIterator<Item = &'a IncidentRecord>,
    Tz: TimeZone,
{
    let mut resolved = MonthlySeries::zeroed();
    let mut ongoing = MonthlySeries::zeroed();
    let mut open = MonthlySeries::zeroed();
    let mut skipped = 0usize;

    for record in records {
        let Some(status) = record.status_category() else {
            continue;
        };

        let Some(month) = record
            .created_at
            .as_deref()
            .and_then(|raw| month_index(raw, tz))
        else {
            log::debug!(
                "Skipping incident {}: unparseable created_at {:?}",
                record.id,
                record.created_at
            );
            skipped += 1;
            continue;
        };

        match status {
            IncidentStatus::Resolved => resolved.increment(month),
            IncidentStatus::Ongoing => ongoing.increment(month),
            IncidentStatus::Open => open.increment(month),
        }
    }

    if skipped > 0 {
        log::debug!("Monthly breakdown skipped {skipped} incident(s) with bad timestamps");
    }

    MonthlyBreakdown::from_series(resolved, ongoing, open)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str, status: &str, created_at: &str) -> IncidentRecord {
        IncidentRecord::new(id, status, created_at)
    }

    fn sample() -> Vec<IncidentRecord> {
        vec![
            record("1", "Open", "2024-01-15T08:00:00Z"),
            record("2", "Resolved", "2024-01-20T08:00:00Z"),
            record("3", "Ongoing", "2024-02-01T08:00:00Z"),
            record("4", "Resolved", "2024-02-10T08:00:00Z"),
        ]
    }

    #[test]
    fn empty_input_is_all_zero() {
        let breakdown = compute_monthly_breakdown_in(&Vec::<IncidentRecord>::new(), &Utc);
        assert_eq!(breakdown, MonthlyBreakdown::empty());
        assert_eq!(breakdown.resolved.as_slice(), &[0; 12]);
        assert_eq!(breakdown.totals.grand_total(), 0);
    }

    #[test]
    fn buckets_the_reference_scenario() {
        let breakdown = compute_monthly_breakdown_in(&sample(), &Utc);

        assert_eq!(
            breakdown.open.as_slice(),
            &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            breakdown.resolved.as_slice(),
            &[1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            breakdown.ongoing.as_slice(),
            &[0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(breakdown.totals.open, 1);
        assert_eq!(breakdown.totals.resolved, 2);
        assert_eq!(breakdown.totals.ongoing, 1);
    }

    #[test]
    fn march_resolved_touches_exactly_one_slot() {
        let breakdown =
            compute_monthly_breakdown_in(&[record("9", "Resolved", "2024-03-18T10:00:00Z")], &Utc);
        let mut expected = MonthlySeries::zeroed();
        expected.increment(2);
        assert_eq!(breakdown.resolved, expected);
        assert_eq!(breakdown.ongoing, MonthlySeries::zeroed());
        assert_eq!(breakdown.open, MonthlySeries::zeroed());
    }

    #[test]
    fn unrecognized_statuses_count_nowhere() {
        let breakdown = compute_monthly_breakdown_in(
            &[
                record("1", "Cancelled", "2024-03-18T10:00:00Z"),
                record("2", "resolved", "2024-03-18T10:00:00Z"),
                record("3", "", "2024-03-18T10:00:00Z"),
            ],
            &Utc,
        );
        assert_eq!(breakdown, MonthlyBreakdown::empty());

        let mut missing = record("4", "Open", "2024-03-18T10:00:00Z");
        missing.status = None;
        assert_eq!(
            compute_monthly_breakdown_in(&[missing], &Utc),
            MonthlyBreakdown::empty()
        );
    }

    #[test]
    fn malformed_timestamps_are_skipped() {
        let mut no_timestamp = record("3", "Open", "");
        no_timestamp.created_at = None;
        let records = vec![
            record("1", "Open", "not a date"),
            record("2", "Resolved", "2024-06-01T00:00:00Z"),
            no_timestamp,
        ];
        let breakdown = compute_monthly_breakdown_in(&records, &Utc);
        assert_eq!(breakdown.totals.open, 0);
        assert_eq!(breakdown.totals.resolved, 1);
        assert_eq!(breakdown.resolved.get(5), Some(1));
    }

    #[test]
    fn order_does_not_matter() {
        let records = sample();
        let expected = compute_monthly_breakdown_in(&records, &Utc);

        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(compute_monthly_breakdown_in(&reversed, &Utc), expected);

        for shift in 1..records.len() {
            let mut rotated = records.clone();
            rotated.rotate_left(shift);
            assert_eq!(compute_monthly_breakdown_in(&rotated, &Utc), expected);
        }
    }

    #[test]
    fn duplicate_ids_count_independently() {
        let mut records = sample();
        records.push(record("2", "Resolved", "2024-01-20T08:00:00Z"));
        let breakdown = compute_monthly_breakdown_in(&records, &Utc);
        assert_eq!(breakdown.totals.resolved, 3);
        assert_eq!(breakdown.resolved.get(0), Some(2));
    }

    #[test]
    fn totals_always_match_series_sums() {
        let mut records = sample();
        records.extend([
            record("5", "Open", "2023-12-31T23:00:00Z"),
            record("6", "Ongoing", "2024-07-04"),
            record("7", "Unknown", "2024-07-04"),
            record("8", "Resolved", "garbage"),
        ]);
        let breakdown = compute_monthly_breakdown_in(&records, &Utc);
        for status in IncidentStatus::all() {
            assert_eq!(
                breakdown.series(*status).as_slice().iter().sum::<u64>(),
                breakdown.totals.get(*status)
            );
        }
    }

    #[test]
    fn local_zone_entry_point_counts_every_valid_record() {
        // Month placement depends on the host zone; the totals do not.
        let breakdown = compute_monthly_breakdown(&sample());
        assert_eq!(breakdown.totals.grand_total(), 4);
    }

    mod properties {
        use chrono::Utc;
        use proptest::prelude::*;

        use super::*;

        /// `(status, month, day, dated)`; undated rows get an unparseable
        /// timestamp.
        type Row = (&'static str, u32, u32, bool);

        fn row_strategy() -> impl Strategy<Value = Row> {
            (
                prop_oneof![
                    Just("Open"),
                    Just("Ongoing"),
                    Just("Resolved"),
                    Just("Cancelled"),
                ],
                1..=12_u32,
                1..=28_u32,
                any::<bool>(),
            )
        }

        fn to_record((status, month, day, dated): &Row) -> IncidentRecord {
            let created_at = if *dated {
                format!("2024-{month:02}-{day:02}T12:00:00Z")
            } else {
                "not a date".to_string()
            };
            IncidentRecord::new("p", status, &created_at)
        }

        fn shuffled_rows() -> impl Strategy<Value = (Vec<Row>, Vec<Row>)> {
            prop::collection::vec(row_strategy(), 0..200)
                .prop_flat_map(|rows| (Just(rows.clone()), Just(rows).prop_shuffle()))
        }

        proptest! {
            #[test]
            fn every_counted_record_lands_in_its_month(
                rows in prop::collection::vec(row_strategy(), 0..200)
            ) {
                let records: Vec<IncidentRecord> = rows.iter().map(to_record).collect();
                let breakdown = compute_monthly_breakdown_in(&records, &Utc);

                for status in IncidentStatus::all() {
                    let mut expected = MonthlySeries::zeroed();
                    for (label, month, _, dated) in &rows {
                        if *dated && IncidentStatus::from_label(label) == Some(*status) {
                            expected.increment(usize::try_from(*month).unwrap() - 1);
                        }
                    }
                    prop_assert_eq!(breakdown.series(*status), &expected);
                    prop_assert_eq!(
                        breakdown.series(*status).total(),
                        breakdown.totals.get(*status)
                    );
                }

                let counted = rows
                    .iter()
                    .filter(|(label, _, _, dated)| *dated && *label != "Cancelled")
                    .count();
                prop_assert_eq!(breakdown.totals.grand_total(), u64::try_from(counted).unwrap());
            }

            #[test]
            fn any_permutation_gives_the_same_breakdown((rows, shuffled) in shuffled_rows()) {
                let records: Vec<IncidentRecord> = rows.iter().map(to_record).collect();
                let permuted: Vec<IncidentRecord> = shuffled.iter().map(to_record).collect();
                prop_assert_eq!(
                    compute_monthly_breakdown_in(&records, &Utc),
                    compute_monthly_breakdown_in(&permuted, &Utc)
                );
            }
        }
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident analytics aggregation.
//!
//! Turns a raw list of incident records into per-status monthly counts and
//! totals ([`compute_monthly_breakdown`]), and shapes the result into chart
//! datasets ([`chart`]). Everything here is a pure function of its input:
//! fetching the records, and deciding what to show when that fails, is the
//! caller's job.

pub mod breakdown;
pub mod chart;

pub use breakdown::{compute_monthly_breakdown, compute_monthly_breakdown_in};

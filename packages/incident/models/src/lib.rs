#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident status taxonomy, office definitions, and incident record types.
//!
//! Incidents are reported to the Health and Safety Office, dispatched to a
//! downstream department, and tracked through a three-stage resolution
//! workflow. The record type mirrors the `incidents` table of the hosted
//! backend and keeps `status` and `created_at` raw so that rows with
//! unexpected values still load.

use hso_listing::Listable;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Resolution stage of an incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum IncidentStatus {
    /// Reported but not yet assigned to a department.
    Open,
    /// Assigned and being worked on.
    Ongoing,
    /// Closed out by the assigned department.
    Resolved,
}

impl IncidentStatus {
    /// Matches a raw status label exactly (case-sensitive).
    ///
    /// Returns `None` for anything outside the three known labels.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }

    /// Returns all variants in bucket order (Resolved, Ongoing, Open).
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Resolved, Self::Ongoing, Self::Open]
    }
}

/// Offices that incidents can be assigned to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Office {
    /// Receives reports and dispatches them.
    #[serde(rename = "Health and Safety Office")]
    #[strum(serialize = "Health and Safety Office")]
    HealthAndSafetyOffice,
    /// Facilities, grounds, and maintenance.
    #[serde(rename = "General Services Department")]
    #[strum(serialize = "General Services Department")]
    GeneralServicesDepartment,
    /// Campus clinic.
    #[serde(rename = "Medical and Dental Services")]
    #[strum(serialize = "Medical and Dental Services")]
    MedicalDentalServices,
}

impl Office {
    /// Returns the short route slug used for the office's pages (`hso`,
    /// `gsd`, `mds`).
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::HealthAndSafetyOffice => "hso",
            Self::GeneralServicesDepartment => "gsd",
            Self::MedicalDentalServices => "mds",
        }
    }

    /// Looks an office up by its slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|office| office.slug().eq_ignore_ascii_case(slug))
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::HealthAndSafetyOffice,
            Self::GeneralServicesDepartment,
            Self::MedicalDentalServices,
        ]
    }
}

/// Opaque incident identifier.
///
/// The backend may hand out numeric or textual keys; both are kept as
/// their textual form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct IncidentId(String);

impl IncidentId {
    /// Wraps a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IncidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IncidentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<i64> for IncidentId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for IncidentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        row_id::deserialize(deserializer).map(Self)
    }
}

/// Backend primary keys, numeric or textual, read as their textual form.
///
/// Usable as `#[serde(deserialize_with = "hso_incident_models::row_id::deserialize")]`
/// on any `String` key column.
pub mod row_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    /// Deserializes a numeric or string key into its decimal or raw text.
    ///
    /// # Errors
    ///
    /// * If the value is neither a string nor an integer
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        })
    }
}

/// A row of the `incidents` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Primary key.
    pub id: IncidentId,
    /// Raw status label. See [`IncidentRecord::status_category`].
    #[serde(default)]
    pub status: Option<String>,
    /// Raw creation timestamp as stored by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Name of the reporter.
    #[serde(default)]
    pub name: Option<String>,
    /// Where the incident was observed.
    #[serde(default)]
    pub location: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Office currently responsible for the incident.
    #[serde(default)]
    pub office: Option<String>,
    /// Public URL of the attached photo.
    #[serde(default)]
    pub image: Option<String>,
    /// Date the reporter observed the incident.
    #[serde(default)]
    pub date_observed: Option<String>,
    /// Time the reporter observed the incident.
    #[serde(default)]
    pub time_observed: Option<String>,
    /// Note left by the department that handled the incident.
    #[serde(default)]
    pub action_taken: Option<String>,
}

impl IncidentRecord {
    /// Creates a record with only the fields the analytics care about.
    #[must_use]
    pub fn new(id: impl Into<IncidentId>, status: &str, created_at: &str) -> Self {
        Self {
            id: id.into(),
            status: Some(status.to_string()),
            created_at: Some(created_at.to_string()),
            name: None,
            location: None,
            description: None,
            office: None,
            image: None,
            date_observed: None,
            time_observed: None,
            action_taken: None,
        }
    }

    /// Returns the status category, or `None` if the label is missing or
    /// unrecognized.
    #[must_use]
    pub fn status_category(&self) -> Option<IncidentStatus> {
        self.status.as_deref().and_then(IncidentStatus::from_label)
    }
}

impl Listable for IncidentRecord {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.name.as_deref(),
            self.location.as_deref(),
            self.description.as_deref(),
        ]
        .into_iter()
        .flatten()
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

/// Column an [`IncidentFilter`] predicate compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentField {
    /// `id` column.
    Id,
    /// `status` column.
    Status,
    /// `office` column.
    Office,
}

impl IncidentField {
    /// Returns the backend column name.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Status => "status",
            Self::Office => "office",
        }
    }

    fn value_of(self, record: &IncidentRecord) -> Option<&str> {
        match self {
            Self::Id => Some(record.id.as_str()),
            Self::Status => record.status.as_deref(),
            Self::Office => record.office.as_deref(),
        }
    }
}

/// A conjunction of field-equality predicates. No predicates selects
/// every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentFilter {
    predicates: Vec<(IncidentField, String)>,
}

impl IncidentFilter {
    /// Selects all incidents.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Adds an equality predicate on an arbitrary field.
    #[must_use]
    pub fn with(mut self, field: IncidentField, value: impl Into<String>) -> Self {
        self.predicates.push((field, value.into()));
        self
    }

    /// Adds `status = <status>`.
    #[must_use]
    pub fn with_status(self, status: IncidentStatus) -> Self {
        self.with(IncidentField::Status, status.as_ref())
    }

    /// Adds `office = <office>`.
    #[must_use]
    pub fn with_office(self, office: Office) -> Self {
        self.with(IncidentField::Office, office.as_ref())
    }

    /// Returns the predicates in insertion order.
    pub fn predicates(&self) -> impl Iterator<Item = (IncidentField, &str)> {
        self.predicates.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Returns `true` if no predicates are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Evaluates the filter against a record in memory.
    #[must_use]
    pub fn matches(&self, record: &IncidentRecord) -> bool {
        self.predicates
            .iter()
            .all(|(field, value)| field.value_of(record) == Some(value.as_str()))
    }
}

/// Partial update of an incident's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentUpdate {
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
    /// New assigned office.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
    /// Action-taken note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
}

impl IncidentUpdate {
    /// Returns `true` if the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.office.is_none() && self.action_taken.is_none()
    }

    /// Applies the set fields to `record`.
    pub fn apply_to(&self, record: &mut IncidentRecord) {
        if let Some(status) = self.status {
            record.status = Some(status.to_string());
        }
        if let Some(office) = &self.office {
            record.office = Some(office.clone());
        }
        if let Some(note) = &self.action_taken {
            record.action_taken = Some(note.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_match_exactly() {
        assert_eq!(IncidentStatus::from_label("Open"), Some(IncidentStatus::Open));
        assert_eq!(
            IncidentStatus::from_label("Ongoing"),
            Some(IncidentStatus::Ongoing)
        );
        assert_eq!(
            IncidentStatus::from_label("Resolved"),
            Some(IncidentStatus::Resolved)
        );
        assert_eq!(IncidentStatus::from_label("resolved"), None);
        assert_eq!(IncidentStatus::from_label("Cancelled"), None);
        assert_eq!(IncidentStatus::from_label(""), None);
    }

    #[test]
    fn office_labels_roundtrip() {
        for office in Office::all() {
            let label = office.to_string();
            assert_eq!(label.parse::<Office>().unwrap(), *office);
            assert_eq!(Office::from_slug(office.slug()), Some(*office));
        }
        assert_eq!(
            Office::GeneralServicesDepartment.as_ref(),
            "General Services Department"
        );
        assert_eq!(Office::from_slug("GSD"), Some(Office::GeneralServicesDepartment));
        assert_eq!(Office::from_slug("unknown"), None);
    }

    #[test]
    fn record_accepts_numeric_ids_and_missing_fields() {
        let record: IncidentRecord =
            serde_json::from_str(r#"{"id": 42, "status": "Open", "created_at": null}"#).unwrap();
        assert_eq!(record.id.as_str(), "42");
        assert_eq!(record.status_category(), Some(IncidentStatus::Open));
        assert!(record.created_at.is_none());
        assert!(record.office.is_none());

        let record: IncidentRecord = serde_json::from_str(r#"{"id": "a-b"}"#).unwrap();
        assert_eq!(record.id, IncidentId::new("a-b"));
        assert_eq!(record.status_category(), None);
    }

    #[test]
    fn search_covers_name_location_and_description() {
        let mut record = IncidentRecord::new("3", "Ongoing", "2024-04-01");
        record.name = Some("Dana".to_string());
        record.location = Some("Gym lobby".to_string());
        let fields: Vec<&str> = record.search_fields().collect();
        assert_eq!(fields, vec!["Dana", "Gym lobby"]);
        assert_eq!(Listable::created_at(&record), Some("2024-04-01"));
    }

    #[test]
    fn filter_matches_all_predicates() {
        let mut record = IncidentRecord::new("1", "Ongoing", "2024-01-01");
        record.office = Some("General Services Department".to_string());

        assert!(IncidentFilter::all().matches(&record));
        assert!(
            IncidentFilter::all()
                .with_status(IncidentStatus::Ongoing)
                .with_office(Office::GeneralServicesDepartment)
                .matches(&record)
        );
        assert!(
            !IncidentFilter::all()
                .with_status(IncidentStatus::Ongoing)
                .with_office(Office::MedicalDentalServices)
                .matches(&record)
        );

        let cols: Vec<_> = IncidentFilter::all()
            .with_office(Office::HealthAndSafetyOffice)
            .with_status(IncidentStatus::Open)
            .predicates()
            .map(|(f, v)| (f.column(), v.to_string()))
            .collect();
        assert_eq!(
            cols,
            vec![
                ("office", "Health and Safety Office".to_string()),
                ("status", "Open".to_string()),
            ]
        );
    }

    #[test]
    fn update_skips_unset_fields() {
        let update = IncidentUpdate {
            status: Some(IncidentStatus::Resolved),
            ..IncidentUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"status": "Resolved"})
        );
        assert!(IncidentUpdate::default().is_empty());

        let mut record = IncidentRecord::new("7", "Ongoing", "2024-05-01");
        IncidentUpdate {
            status: Some(IncidentStatus::Resolved),
            office: Some("Health and Safety Office".to_string()),
            action_taken: Some("Replaced the light fixture".to_string()),
        }
        .apply_to(&mut record);
        assert_eq!(record.status.as_deref(), Some("Resolved"));
        assert_eq!(record.office.as_deref(), Some("Health and Safety Office"));
        assert_eq!(
            record.action_taken.as_deref(),
            Some("Replaced the light fixture")
        );
    }
}

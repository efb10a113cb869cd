#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Row types for the bulletin tables of the hosted backend.
//!
//! These mirror the `announcements`, `programs`, and `Account` tables as
//! the backend returns them. Incident rows live in `hso_incident_models`.

use hso_incident_models::row_id;
use hso_listing::Listable;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Color code attached to an announcement, from the color legend.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AnnouncementColor {
    /// Important
    Red,
    /// Urgent
    Orange,
    /// Warning
    Yellow,
    /// General info
    Green,
    /// Informational
    Blue,
}

impl AnnouncementColor {
    /// Legend text shown next to the color.
    #[must_use]
    pub const fn legend(self) -> &'static str {
        match self {
            Self::Red => "Important",
            Self::Orange => "Urgent",
            Self::Yellow => "Warning",
            Self::Green => "General Info",
            Self::Blue => "Informational",
        }
    }

    /// Tailwind text class used to render the color.
    #[must_use]
    pub const fn text_class(self) -> &'static str {
        match self {
            Self::Red => "text-red-600",
            Self::Orange => "text-orange-600",
            Self::Yellow => "text-yellow-600",
            Self::Green => "text-green-600",
            Self::Blue => "text-blue-600",
        }
    }

    /// Parses a Tailwind text class (`text-red-600`) back into a color.
    #[must_use]
    pub fn from_text_class(class: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|color| color.text_class() == class)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Red, Self::Orange, Self::Yellow, Self::Green, Self::Blue]
    }
}

/// A row of the `announcements` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Primary key (textual form).
    #[serde(deserialize_with = "row_id::deserialize")]
    pub id: String,
    /// Headline.
    #[serde(default)]
    pub title: Option<String>,
    /// Body text.
    #[serde(default)]
    pub content: Option<String>,
    /// Author's user id.
    #[serde(default)]
    pub created_by: Option<String>,
    /// Raw color code; see [`Announcement::color_code`].
    #[serde(default)]
    pub color: Option<String>,
    /// Public URL of the first attached image.
    #[serde(default)]
    pub images: Option<String>,
    /// Raw creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Announcement {
    /// Returns the parsed color code, if recognized. Older rows store the
    /// Tailwind class (`text-red-600`) instead of the color name.
    #[must_use]
    pub fn color_code(&self) -> Option<AnnouncementColor> {
        let raw = self.color.as_deref()?;
        raw.parse()
            .ok()
            .or_else(|| AnnouncementColor::from_text_class(raw))
    }
}

impl Listable for Announcement {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.title.as_deref(), self.content.as_deref()]
            .into_iter()
            .flatten()
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

/// Payload for inserting an announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnnouncement {
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Author's user id.
    #[serde(default)]
    pub created_by: Option<String>,
    /// Color code.
    pub color: AnnouncementColor,
    /// URL of an already-hosted image.
    #[serde(default)]
    pub images: Option<String>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

impl NewAnnouncement {
    /// Checks that the title and content are not blank.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAnnouncementError`] naming the first blank field.
    pub fn validate(&self) -> Result<(), InvalidAnnouncementError> {
        if self.title.trim().is_empty() {
            return Err(InvalidAnnouncementError { field: "title" });
        }
        if self.content.trim().is_empty() {
            return Err(InvalidAnnouncementError { field: "content" });
        }
        Ok(())
    }
}

/// Error returned when a [`NewAnnouncement`] is missing required text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("announcement {field} must not be blank")]
pub struct InvalidAnnouncementError {
    /// Name of the blank field.
    pub field: &'static str,
}

/// A row of the `programs` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Primary key (textual form).
    #[serde(deserialize_with = "row_id::deserialize")]
    pub id: String,
    /// Program name.
    #[serde(default)]
    pub title: Option<String>,
    /// What the program is about.
    #[serde(default)]
    pub what: Option<String>,
    /// Who the program is for.
    #[serde(default)]
    pub who: Option<String>,
    /// Public URL of the program image.
    #[serde(default)]
    pub images: Option<String>,
    /// Raw creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Listable for Program {
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        [self.title.as_deref(), self.what.as_deref()]
            .into_iter()
            .flatten()
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

/// The only `Account` column the dashboard reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRow {
    /// Role of the account (office staff, department, ...).
    #[serde(default)]
    pub user_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_text_classes_roundtrip() {
        for color in AnnouncementColor::all() {
            assert_eq!(AnnouncementColor::from_text_class(color.text_class()), Some(*color));
            assert_eq!(color.to_string().parse::<AnnouncementColor>().unwrap(), *color);
        }
        assert_eq!(AnnouncementColor::Orange.legend(), "Urgent");
        assert_eq!(AnnouncementColor::from_text_class("text-purple-600"), None);
    }

    #[test]
    fn announcement_rows_tolerate_numeric_ids_and_nulls() {
        let row: Announcement = serde_json::from_str(
            r#"{"id": 12, "title": "Drill", "content": null, "color": "red", "created_at": "2024-05-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(row.id, "12");
        assert_eq!(row.color_code(), Some(AnnouncementColor::Red));
        assert_eq!(row.search_fields().collect::<Vec<_>>(), vec!["Drill"]);

        let row: Announcement = serde_json::from_str(r#"{"id": "x", "color": "purple"}"#).unwrap();
        assert_eq!(row.color_code(), None);

        let row: Announcement =
            serde_json::from_str(r#"{"id": "y", "color": "text-green-600"}"#).unwrap();
        assert_eq!(row.color_code(), Some(AnnouncementColor::Green));
    }

    #[test]
    fn program_search_uses_title_and_what() {
        let row: Program = serde_json::from_str(
            r#"{"id": 1, "title": "First Aid", "what": "CPR basics", "who": "Staff"}"#,
        )
        .unwrap();
        assert_eq!(
            row.search_fields().collect::<Vec<_>>(),
            vec!["First Aid", "CPR basics"]
        );
    }

    #[test]
    fn new_announcement_requires_text() {
        let mut payload = NewAnnouncement {
            title: "Fire drill".to_string(),
            content: "Friday 10am".to_string(),
            created_by: None,
            color: AnnouncementColor::Yellow,
            images: None,
            created_at: "2024-05-01T00:00:00Z".to_string(),
        };
        assert!(payload.validate().is_ok());

        payload.content = "   ".to_string();
        assert_eq!(
            payload.validate(),
            Err(InvalidAnnouncementError { field: "content" })
        );

        payload.title = String::new();
        assert_eq!(payload.validate().unwrap_err().field, "title");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["color"], "yellow");
    }

    #[test]
    fn invalid_announcement_error_reports_the_field() {
        let err: Box<dyn std::error::Error> = Box::new(InvalidAnnouncementError { field: "title" });
        assert_eq!(err.to_string(), "announcement title must not be blank");
    }

    #[test]
    fn program_ids_accept_negative_and_large_numbers() {
        let row: Program = serde_json::from_str(r#"{"id": -4}"#).unwrap();
        assert_eq!(row.id, "-4");
        let row: Program = serde_json::from_str(r#"{"id": 18446744073709551615}"#).unwrap();
        assert_eq!(row.id, "18446744073709551615");
        assert!(serde_json::from_str::<Program>(r#"{"id": true}"#).is_err());
    }
}

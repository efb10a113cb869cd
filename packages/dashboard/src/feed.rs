//! Announcement and program listings.

use std::str::FromStr;

use hso_database::BulletinRepository;
use hso_database_models::{Announcement, AnnouncementColor, Program};
use hso_listing::{ListQuery, Page, SortOrder, derive_view, derive_view_with};
use serde::{Deserialize, Serialize};

use crate::{LoadState, recover};

/// The announcement page's filter select.
///
/// `Recent` and `Oldest` sort by creation time. Picking a color keeps
/// only announcements of that color in backend order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AnnouncementFilter {
    /// Newest first.
    #[default]
    Recent,
    /// Oldest first.
    Oldest,
    /// Only this color.
    Color(AnnouncementColor),
}

impl FromStr for AnnouncementFilter {
    type Err = strum::ParseError;

    /// Accepts `recent`, `oldest`, a color name, or a color's text class.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recent" => Ok(Self::Recent),
            "oldest" => Ok(Self::Oldest),
            other => other
                .parse()
                .ok()
                .or_else(|| AnnouncementColor::from_text_class(other))
                .map(Self::Color)
                .ok_or(strum::ParseError::VariantNotFound),
        }
    }
}

/// Sort select on the program page.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProgramSort {
    /// Newest first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
}

impl From<ProgramSort> for SortOrder {
    fn from(value: ProgramSort) -> Self {
        match value {
            ProgramSort::Newest => Self::Newest,
            ProgramSort::Oldest => Self::Oldest,
        }
    }
}

/// One page of announcements for `search` and `filter`.
#[must_use]
pub fn announcement_page(
    items: &[Announcement],
    search: &str,
    filter: AnnouncementFilter,
    page: usize,
    per_page: usize,
) -> Page<Announcement> {
    let query = ListQuery::default().search(search).page(page, per_page);
    match filter {
        AnnouncementFilter::Recent => derive_view(items, &query.sorted(SortOrder::Newest)),
        AnnouncementFilter::Oldest => derive_view(items, &query.sorted(SortOrder::Oldest)),
        AnnouncementFilter::Color(color) => derive_view_with(items, &query, |item| {
            item.color_code() == Some(color)
        }),
    }
}

/// One page of programs for `search`, sorted by `sort`.
#[must_use]
pub fn program_page(
    items: &[Program],
    search: &str,
    sort: ProgramSort,
    page: usize,
    per_page: usize,
) -> Page<Program> {
    let query = ListQuery::default()
        .search(search)
        .sorted(sort.into())
        .page(page, per_page);
    derive_view(items, &query)
}

/// Fetches every announcement; failures are logged and yield an empty
/// list.
pub async fn load_announcements<R: BulletinRepository + ?Sized>(
    repo: &R,
) -> LoadState<Vec<Announcement>> {
    recover("announcements", repo.list_announcements().await, Vec::new)
}

/// Fetches every program; failures are logged and yield an empty list.
pub async fn load_programs<R: BulletinRepository + ?Sized>(repo: &R) -> LoadState<Vec<Program>> {
    recover("programs", repo.list_programs().await, Vec::new)
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived list views for the dashboard pages.
//!
//! Every list on the dashboard (announcements, programs, a department's
//! incident queue) is shown through the same pipeline: an optional extra
//! predicate, a case-insensitive search, an optional sort by creation
//! time, and a page cut. [`derive_view`] runs that pipeline as a pure
//! function of the source list and a [`ListQuery`]; the source list is
//! never modified.

pub mod timestamp;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page size used when none is configured.
pub const DEFAULT_PER_PAGE: usize = 8;

/// An item that can be searched and sorted by creation time.
pub trait Listable {
    /// Text fields the search term is matched against. Missing fields are
    /// simply not yielded.
    fn search_fields(&self) -> impl Iterator<Item = &str>;

    /// Raw creation timestamp, if any.
    fn created_at(&self) -> Option<&str>;
}

/// Sort direction on creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recent first.
    Newest,
    /// Oldest first.
    Oldest,
}

/// Search, sort, and page parameters for [`derive_view`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuery {
    /// Case-insensitive substring; empty matches everything.
    pub search: String,
    /// Sort order, or `None` to keep source order.
    pub sort: Option<SortOrder>,
    /// One-based page number. `0` is treated as `1`.
    pub page: usize,
    /// Items per page. `0` is treated as `1`.
    pub per_page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ListQuery {
    /// Sets the search term.
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub const fn sorted(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    /// Sets the page number and size.
    #[must_use]
    pub const fn page(mut self, page: usize, per_page: usize) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }
}

/// One page of a derived view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// One-based page number actually served.
    pub page: usize,
    /// Page size actually used.
    pub per_page: usize,
    /// Number of items across all pages.
    pub total_items: usize,
    /// Number of pages (`0` when there are no items).
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Converts the items while keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Returns `true` if `item` contains `needle` (already lowercased) in any of
/// its search fields. An empty needle matches everything.
fn matches_search<T: Listable>(item: &T, needle: &str) -> bool {
    needle.is_empty()
        || item
            .search_fields()
            .any(|field| field.to_lowercase().contains(needle))
}

/// Orders parsed creation times. Unparseable times go last in either
/// direction.
fn compare_created(
    a: Option<&DateTime<Utc>>,
    b: Option<&DateTime<Utc>>,
    order: SortOrder,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Newest => b.cmp(a),
            SortOrder::Oldest => a.cmp(b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Runs search, sort, and pagination over `items`.
#[must_use]
pub fn derive_view<T: Listable + Clone>(items: &[T], query: &ListQuery) -> Page<T> {
    derive_view_with(items, query, |_| true)
}

/// Like [`derive_view`], with an extra `predicate` applied before the
/// search.
#[must_use]
pub fn derive_view_with<T, P>(items: &[T], query: &ListQuery, predicate: P) -> Page<T>
where
    T: Listable + Clone,
    P: Fn(&T) -> bool,
{
    let needle = query.search.trim().to_lowercase();

    let mut selected: Vec<&T> = items
        .iter()
        .filter(|item| predicate(item))
        .filter(|item| matches_search(*item, &needle))
        .collect();

    if let Some(order) = query.sort {
        let mut keyed: Vec<(Option<DateTime<Utc>>, &T)> = selected
            .into_iter()
            .map(|item| {
                let key = item
                    .created_at()
                    .and_then(|raw| timestamp::parse_in(raw, &Utc));
                (key, item)
            })
            .collect();
        keyed.sort_by(|(a, _), (b, _)| compare_created(a.as_ref(), b.as_ref(), order));
        selected = keyed.into_iter().map(|(_, item)| item).collect();
    }

    let per_page = query.per_page.max(1);
    let page = query.page.max(1);
    let total_items = selected.len();
    let start = (page - 1).saturating_mul(per_page);

    Page {
        items: selected
            .into_iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect(),
        page,
        per_page,
        total_items,
        total_pages: total_items.div_ceil(per_page),
    }
}

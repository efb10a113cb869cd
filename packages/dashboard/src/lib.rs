#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! View state for the dashboard pages.
//!
//! Each page fetches its data through a repository trait from
//! `hso_database`, derives what it displays with pure functions, and
//! recovers from fetch failures by falling back to an empty view so that
//! the page still renders.

pub mod analytics_view;
pub mod feed;
pub mod incident_queue;
pub mod settings;
pub mod summary;

/// Outcome of loading a view's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    /// Data loaded.
    Ready(T),
    /// The fetch failed; `fallback` is the empty view to render instead.
    Failed {
        /// Value to display in place of the real data.
        fallback: T,
        /// Why the fetch failed.
        reason: String,
    },
    /// The view went away before the fetch finished.
    Cancelled,
}

impl<T> LoadState<T> {
    /// Returns the value to render, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(value) | Self::Failed {
                fallback: value, ..
            } => Some(value),
            Self::Cancelled => None,
        }
    }

    /// Consumes the state, returning the value to render, if any.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Ready(value) | Self::Failed {
                fallback: value, ..
            } => Some(value),
            Self::Cancelled => None,
        }
    }

    /// Returns `true` if the data loaded.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Short label for the state (`ready`, `failed`, `cancelled`).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ready(_) => "ready",
            Self::Failed { .. } => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the failure reason, if the fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { reason, .. } => Some(reason),
            Self::Ready(_) | Self::Cancelled => None,
        }
    }

    /// Converts the loaded value.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            Self::Ready(value) => LoadState::Ready(f(value)),
            Self::Failed { fallback, reason } => LoadState::Failed {
                fallback: f(fallback),
                reason,
            },
            Self::Cancelled => LoadState::Cancelled,
        }
    }
}

/// Turns a fetch result into a [`LoadState`], logging failures and
/// substituting `fallback`.
fn recover<T, E: std::fmt::Display>(
    what: &str,
    result: Result<T, E>,
    fallback: impl FnOnce() -> T,
) -> LoadState<T> {
    match result {
        Ok(value) => LoadState::Ready(value),
        Err(e) => {
            log::error!("Error fetching {what}: {e}");
            LoadState::Failed {
                fallback: fallback(),
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_state_still_renders_fallback() {
        let state = recover::<Vec<u8>, _>("rows", Err("timeout"), Vec::new);
        assert_eq!(state.label(), "failed");
        assert_eq!(state.error(), Some("timeout"));
        assert_eq!(state.value(), Some(&Vec::new()));

        let mapped = state.map(|rows| rows.len());
        assert_eq!(mapped.into_value(), Some(0));
    }

    #[test]
    fn cancelled_state_has_no_value() {
        let state: LoadState<u8> = LoadState::Cancelled;
        assert_eq!(state.value(), None);
        assert!(!state.is_ready());
        assert!(LoadState::Ready(1).is_ready());
    }
}

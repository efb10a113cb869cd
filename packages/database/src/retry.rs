//! Single-retry policy for backend requests.
//!
//! Every request made by [`crate::rest::RestBackend`] goes through
//! [`send_with_retry`]. A transient failure (connection error, timeout,
//! HTTP 429, HTTP 5xx) is retried exactly once after the configured
//! backoff. Other 4xx responses are permanent and returned immediately.

use std::time::Duration;

use crate::DbError;

/// Number of retries after the first attempt.
pub const MAX_RETRIES: u32 = 1;

/// Maximum length of the response body kept in a [`DbError::Status`].
const BODY_PREVIEW_LEN: usize = 500;

/// Sends the request built by `build_request`, retrying once on a
/// transient failure.
///
/// The closure is called on each attempt since a
/// [`reqwest::RequestBuilder`] is consumed by `send()`. Returns the
/// response only for a success status.
///
/// # Errors
///
/// Returns [`DbError::Http`] if no response arrived, or
/// [`DbError::Status`] for a non-success status, after the retry budget is
/// spent.
#[allow(clippy::future_not_send)]
pub async fn send_with_retry<F>(
    build_request: F,
    backoff: Duration,
) -> Result<reqwest::Response, DbError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;
    loop {
        match send_once(&build_request).await {
            Ok(response) => return Ok(response),
            Err(e) if e.is_transient() && attempt < MAX_RETRIES => {
                attempt += 1;
                log::warn!("transient backend error ({e}), retry {attempt}/{MAX_RETRIES} in {backoff:?}");
                tokio::time::sleep(backoff).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[allow(clippy::future_not_send)]
async fn send_once<F>(build_request: &F) -> Result<reqwest::Response, DbError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = build_request().send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > BODY_PREVIEW_LEN {
        let mut end = BODY_PREVIEW_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    Err(DbError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Reads the response body and decodes it as JSON.
///
/// # Errors
///
/// Returns [`DbError::Http`] if the body cannot be read, or
/// [`DbError::Json`] if it is not valid JSON for `T`.
pub async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, DbError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        log::error!(
            "failed to decode backend response ({e}); received {} bytes",
            text.len()
        );
        DbError::Json(e)
    })
}

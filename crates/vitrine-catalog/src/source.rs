//! Per-source fetching with a single failure-absorption policy.
//!
//! A fetch against one collection either yields its data or a
//! [`SourceError`]. Read paths pass that result through
//! [`absorb_source_error`], which logs and substitutes an empty value, so one
//! unavailable collection only ever shrinks a response.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use vitrine_db::{Collection, DbError};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("store error: {0}")]
    Store(#[from] DbError),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Runs one store call under `limit`, turning a timeout into a
/// [`SourceError`].
///
/// # Errors
///
/// Returns [`SourceError::Store`] if the call fails or
/// [`SourceError::Timeout`] if it does not finish in time.
pub async fn fetch_with_timeout<T, F>(limit: Duration, fetch: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, DbError>>,
{
    match tokio::time::timeout(limit, fetch).await {
        Ok(result) => result.map_err(SourceError::from),
        Err(_) => Err(SourceError::Timeout(limit)),
    }
}

/// Unwraps a source result, replacing a failure with `T::default()`.
pub fn absorb_source_error<T: Default>(
    collection: Collection,
    result: Result<T, SourceError>,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                collection = %collection,
                error = %e,
                "source fetch failed; substituting empty result"
            );
            T::default()
        }
    }
}

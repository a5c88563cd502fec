//! Bounded fan-out fetching
//!
//! At most `limit` fetches are in flight at any instant; the whole batch is
//! awaited before returning. Items whose fetch yields `None` are dropped.
//! The first error aborts the batch and cancels the fetches still running.

use futures::{StreamExt, TryStreamExt, future, stream};
use std::future::Future;
use tracing::debug;

use crate::errors::CatalogResult;
use crate::models::CatalogEntryDetails;
use crate::sources::CatalogClient;
use crate::utils::{RawId, normalize_ids};

/// Run `fetch` for every input with at most `limit` running concurrently.
///
/// Output order follows completion order; callers that need determinism
/// sort afterwards. A `limit` of 0 is treated as 1.
pub async fn fetch_bounded<I, T, E, F, Fut>(inputs: I, limit: usize, fetch: F) -> Result<Vec<T>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    stream::iter(inputs)
        .map(fetch)
        .buffer_unordered(limit.max(1))
        .try_filter_map(future::ok)
        .try_collect()
        .await
}

/// Fetch full details for each id, ascending by id.
///
/// Ids are normalized first; unconvertible values are skipped and entries
/// the catalog does not know are dropped. Duplicated ids are fetched once
/// per occurrence.
pub async fn fetch_details_bounded<I>(
    client: &dyn CatalogClient,
    ids: I,
    limit: usize,
) -> CatalogResult<Vec<CatalogEntryDetails>>
where
    I: IntoIterator,
    I::Item: Into<RawId>,
{
    let ids: Vec<_> = normalize_ids(ids).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let requested = ids.len();
    let mut details = fetch_bounded(ids, limit, |id| client.details_by_id(id)).await?;
    details.sort_by_key(|d| d.id);

    debug!(
        "Fetched {} of {} requested details (limit {})",
        details.len(),
        requested,
        limit.max(1)
    );

    Ok(details)
}

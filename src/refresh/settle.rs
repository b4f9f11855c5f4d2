use std::fmt::Display;
use std::future::Future;

use futures_util::future::join_all;

/// Run every job concurrently and wait for all of them.
///
/// A failed job yields `T::default()` for its key and is logged; it never
/// cancels or fails its siblings. Output order matches input order.
pub async fn settle_all<K, T, E, F>(jobs: impl IntoIterator<Item = (K, F)>) -> Vec<(K, T)>
where
    K: Display,
    T: Default,
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    join_all(jobs.into_iter().map(|(key, job)| async move {
        match job.await {
            Ok(value) => (key, value),
            Err(err) => {
                tracing::warn!(%key, error = %err, "Job failed; using empty result");
                (key, T::default())
            }
        }
    }))
    .await
}

//! Single-commit-point execution of multi-entity changes.

use futures::future::BoxFuture;

use super::traits::{BaseStore, StoreTx};
use crate::common::LifecycleResult;

/// Run `work` against one unit of work and commit only if it succeeds.
///
/// On any error the unit of work is dropped, so none of the writes made by
/// `work` become visible.
///
/// ```ignore
/// let accepted = run_atomically(store, |tx| Box::pin(accept(tx, request_id, now))).await?;
/// ```
pub async fn run_atomically<T, F>(store: &dyn BaseStore, work: F) -> LifecycleResult<T>
where
    T: Send,
    F: for<'t> FnOnce(&'t mut dyn StoreTx) -> BoxFuture<'t, LifecycleResult<T>> + Send,
{
    let mut tx = store.begin().await?;
    let value = work(&mut *tx).await?;
    tx.commit().await?;
    Ok(value)
}

/// Run a read-only closure against a unit of work that is never committed.
pub async fn read_only<T, F>(store: &dyn BaseStore, work: F) -> LifecycleResult<T>
where
    T: Send,
    F: for<'t> FnOnce(&'t mut dyn StoreTx) -> BoxFuture<'t, LifecycleResult<T>> + Send,
{
    let mut tx = store.begin().await?;
    work(&mut *tx).await
}

//! Transactional units of work

use std::future::Future;
use std::pin::Pin;

use tracing::warn;

use crate::error::StoreError;
use crate::executor::TransactionScope;
use crate::pool::Store;

/// The boxed future a unit of work returns, borrowing its transaction scope
pub type UnitOfWork<'t, R> = Pin<Box<dyn Future<Output = Result<R, StoreError>> + Send + 't>>;

/// Runs a unit of work inside a single transaction
///
/// Begins a transaction, hands the unit of work a [`TransactionScope`]
/// (which implements [`Executor`](crate::executor::Executor), so repository
/// operations participate unchanged), commits when the unit returns `Ok`,
/// and rolls back on `Err`, propagating the unit's error to the caller
/// unchanged. A failure of the rollback itself is logged, never substituted
/// for the original error.
///
/// Nested top-level transactions are not supported: a unit of work must run
/// everything through the scope it was given.
///
/// # Example
///
/// ```rust,ignore
/// use store_db::{repository, run_in_transaction};
///
/// let moved = run_in_transaction(&store, |tx| {
///     Box::pin(async move {
///         repository::create(tx, &entry, false).await?;
///         repository::delete_by_pk(tx, &stale).await
///     })
/// })
/// .await?;
/// ```
pub async fn run_in_transaction<R, F>(store: &Store, unit_of_work: F) -> Result<R, StoreError>
where
    R: Send,
    F: for<'t> FnOnce(&'t mut TransactionScope) -> UnitOfWork<'t, R> + Send,
{
    let mut scope = TransactionScope::begin(store).await?;

    match unit_of_work(&mut scope).await {
        Ok(value) => {
            scope.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = scope.rollback().await {
                warn!(%rollback_error, "rollback failed after unit-of-work error");
            }
            Err(error)
        }
    }
}

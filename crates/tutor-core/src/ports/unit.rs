use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::Aggregate;
use crate::error::UnitError;

/// Lifecycle of a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Open,
    Saved,
    Failed,
}

/// Pending inserts, updates and removals of one aggregate type, committed
/// atomically by [`UnitOfWork::save`].
///
/// An aggregate may sit in at most one of the three pending sets.
#[async_trait]
pub trait UnitOfWork<A: Aggregate>: Send + Sync {
    /// Register a new aggregate to insert.
    fn add(&mut self, aggregate: A) -> Result<(), UnitError>;

    /// Register a changed aggregate to update.
    fn alter(&mut self, aggregate: A) -> Result<(), UnitError>;

    /// Register a persisted aggregate to delete.
    fn remove(&mut self, aggregate: A) -> Result<(), UnitError>;

    /// Flush every pending change inside one transaction.
    ///
    /// Commits only when every statement succeeded; on error or cancellation
    /// the transaction is rolled back and the unit moves to
    /// [`UnitState::Failed`].
    async fn save(&mut self, cancel: &CancellationToken) -> Result<(), UnitError>;

    fn state(&self) -> UnitState;
}

/// Hands out fresh units of work, one per business operation.
pub trait Uniter<A: Aggregate>: Send + Sync {
    type Unit: UnitOfWork<A>;

    fn unit(&self) -> Self::Unit;
}

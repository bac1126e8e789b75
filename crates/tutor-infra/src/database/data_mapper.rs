//! Data mapper contract shared by every aggregate type.

use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, DbErr};
use thiserror::Error;
use uuid::Uuid;

use tutor_core::domain::Aggregate;
use tutor_core::error::UnitError;

/// Failures while turning aggregates into statements or running them.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("Statement failed: {0}")]
    Db(#[from] DbErr),

    #[error("{kind} {id} changed or vanished before the unit was saved")]
    Stale { kind: &'static str, id: Uuid },

    #[error("Row mapping failed: {0}")]
    Mapping(String),
}

impl From<MapperError> for UnitError {
    fn from(err: MapperError) -> Self {
        match err {
            MapperError::Db(e) => UnitError::Storage(e.to_string()),
            MapperError::Stale { kind, id } => UnitError::Stale { kind, id },
            MapperError::Mapping(message) => UnitError::Mapping(message),
        }
    }
}

/// Moves aggregates of type `A` between memory and their tables.
///
/// Mappers never own a connection. Every call borrows the transaction of the
/// unit of work being saved, so a failure part way through a batch is undone
/// by that unit's rollback.
#[async_trait]
pub trait DataMapper<A: Aggregate>: Send + Sync {
    /// Insert each aggregate's root row, then its child rows.
    async fn insert(
        &self,
        txn: &DatabaseTransaction,
        aggregates: &[A],
    ) -> Result<(), MapperError>;

    /// Update each root row and reconcile its children against the stored
    /// state read through `txn`.
    async fn update(
        &self,
        txn: &DatabaseTransaction,
        aggregates: &[A],
    ) -> Result<(), MapperError>;

    /// Delete each aggregate's child rows, then its root row.
    async fn delete(
        &self,
        txn: &DatabaseTransaction,
        aggregates: &[A],
    ) -> Result<(), MapperError>;
}

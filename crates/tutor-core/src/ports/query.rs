use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Account;
use crate::error::RepoError;

/// A read against committed storage.
///
/// Queries are side-effect free and never join a unit of work's transaction.
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Accounts matching the query, posts included, in a stable order.
    async fn execute(&self) -> Result<Vec<Account>, RepoError>;
}

/// Builds bound queries so repositories stay storage-agnostic.
pub trait Queryer: Send + Sync {
    /// Lookup of a single account by id.
    fn by_id(&self, id: Uuid) -> Box<dyn AccountQuery>;

    /// Every stored account.
    fn all(&self) -> Box<dyn AccountQuery>;
}

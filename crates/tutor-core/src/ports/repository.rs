use async_trait::async_trait;
use uuid::Uuid;

use super::AccountQuery;
use crate::domain::Account;
use crate::error::RepoError;

/// Set-like view over every account, keyed by identity.
///
/// Mutations are only registered with a unit of work; nothing is written
/// until that unit is saved.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by id. `Ok(None)` when it does not exist.
    async fn get(&self, id: Uuid) -> Result<Option<Account>, RepoError>;

    /// Register a new account. Fails when the id is already taken.
    async fn add(&mut self, account: Account) -> Result<(), RepoError>;

    /// Insert or replace an account.
    async fn put(&mut self, account: Account) -> Result<(), RepoError>;

    /// Register the stored copy of `account` for removal.
    async fn remove(&mut self, account: &Account) -> Result<(), RepoError>;

    /// Run an arbitrary query against committed state.
    async fn find(&self, query: &dyn AccountQuery) -> Result<Vec<Account>, RepoError>;

    /// Number of stored accounts.
    async fn size(&self) -> Result<usize, RepoError>;
}

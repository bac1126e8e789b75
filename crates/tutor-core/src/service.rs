//! Account application service.
//!
//! Each operation is one business transaction: a fresh unit of work, a
//! repository bound to it, then a save.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::{Account, Aggregate};
use crate::error::DomainError;
use crate::ports::{AccountRepository, Queryer, UnitOfWork, Uniter};
use crate::repository::UnitAccountRepository;

/// Operations the application offers for accounts.
pub struct AccountService<W> {
    uniter: W,
    queryer: Arc<dyn Queryer>,
}

impl<W> AccountService<W>
where
    W: Uniter<Account>,
{
    pub fn new(uniter: W, queryer: Arc<dyn Queryer>) -> Self {
        Self { uniter, queryer }
    }

    /// Retrieve an existing account.
    pub async fn get(&self, id: Uuid) -> Result<Account, DomainError> {
        let mut unit = self.uniter.unit();
        let repository = UnitAccountRepository::new(&mut unit, self.queryer.as_ref());
        repository
            .get(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: Account::KIND,
                id,
            })
    }

    /// Every stored account.
    pub async fn list(&self) -> Result<Vec<Account>, DomainError> {
        let mut unit = self.uniter.unit();
        let repository = UnitAccountRepository::new(&mut unit, self.queryer.as_ref());
        let query = self.queryer.all();
        Ok(repository.find(query.as_ref()).await?)
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        let mut unit = self.uniter.unit();
        let repository = UnitAccountRepository::new(&mut unit, self.queryer.as_ref());
        Ok(repository.size().await?)
    }

    /// Create a new account.
    pub async fn create(
        &self,
        account: Account,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        let account_id = account.id();
        let mut unit = self.uniter.unit();
        UnitAccountRepository::new(&mut unit, self.queryer.as_ref())
            .add(account)
            .await?;
        unit.save(cancel).await?;
        tracing::info!(account_id = %account_id, "Account created");
        Ok(())
    }

    /// Insert or replace an account, posts included.
    pub async fn put(&self, account: Account, cancel: &CancellationToken) -> Result<(), DomainError> {
        let account_id = account.id();
        let mut unit = self.uniter.unit();
        UnitAccountRepository::new(&mut unit, self.queryer.as_ref())
            .put(account)
            .await?;
        unit.save(cancel).await?;
        tracing::info!(account_id = %account_id, "Account stored");
        Ok(())
    }

    /// Delete an existing account and all of its posts.
    pub async fn delete(
        &self,
        account: &Account,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        let mut unit = self.uniter.unit();
        UnitAccountRepository::new(&mut unit, self.queryer.as_ref())
            .remove(account)
            .await?;
        unit.save(cancel).await?;
        tracing::info!(account_id = %account.id(), "Account deleted");
        Ok(())
    }
}

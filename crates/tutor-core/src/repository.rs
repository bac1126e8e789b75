//! Unit-of-work backed account repository.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Account;
use crate::error::RepoError;
use crate::ports::{AccountQuery, AccountRepository, Queryer, UnitOfWork};

/// Account repository bound to one unit of work.
///
/// Every mutation first checks committed state through the [`Queryer`]; the
/// unit then carries the change until it is saved.
pub struct UnitAccountRepository<'a, U, Q: ?Sized> {
    unit: &'a mut U,
    queryer: &'a Q,
}

impl<'a, U, Q> UnitAccountRepository<'a, U, Q>
where
    U: UnitOfWork<Account>,
    Q: Queryer + ?Sized,
{
    pub fn new(unit: &'a mut U, queryer: &'a Q) -> Self {
        Self { unit, queryer }
    }

    fn register_new(&mut self, account: Account) -> Result<(), RepoError> {
        tracing::debug!(account_id = %account.id(), "Registering new account");
        self.unit.add(account)?;
        Ok(())
    }
}

#[async_trait]
impl<U, Q> AccountRepository for UnitAccountRepository<'_, U, Q>
where
    U: UnitOfWork<Account>,
    Q: Queryer + ?Sized,
{
    async fn get(&self, id: Uuid) -> Result<Option<Account>, RepoError> {
        let query = self.queryer.by_id(id);
        let matches = self.find(query.as_ref()).await?;
        Ok(matches.into_iter().next())
    }

    async fn add(&mut self, account: Account) -> Result<(), RepoError> {
        if self.get(account.id()).await?.is_some() {
            return Err(RepoError::AlreadyExists { id: account.id() });
        }
        self.register_new(account)
    }

    async fn put(&mut self, mut account: Account) -> Result<(), RepoError> {
        match self.get(account.id()).await? {
            None => self.register_new(account),
            Some(persisted) => {
                account.restore_created_at(&persisted);
                tracing::debug!(account_id = %account.id(), "Registering altered account");
                self.unit.alter(account)?;
                Ok(())
            }
        }
    }

    async fn remove(&mut self, account: &Account) -> Result<(), RepoError> {
        let Some(persisted) = self.get(account.id()).await? else {
            return Err(RepoError::NotFound { id: account.id() });
        };
        tracing::debug!(account_id = %persisted.id(), "Registering account removal");
        self.unit.remove(persisted)?;
        Ok(())
    }

    async fn find(&self, query: &dyn AccountQuery) -> Result<Vec<Account>, RepoError> {
        query.execute().await
    }

    async fn size(&self) -> Result<usize, RepoError> {
        let query = self.queryer.all();
        Ok(self.find(query.as_ref()).await?.len())
    }
}

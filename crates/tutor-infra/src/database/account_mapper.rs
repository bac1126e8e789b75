//! Account aggregate mapper.

use async_trait::async_trait;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use tutor_core::domain::{Account, Aggregate, Post};

use super::data_mapper::{DataMapper, MapperError};
use super::entity::account::{self, Entity as AccountEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::queries::load_accounts;
use super::reconcile::reconcile;

/// Maps [`Account`] onto the `accounts` table and its posts onto `posts`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountDataMapper;

impl AccountDataMapper {
    pub fn new() -> Self {
        Self
    }

    /// Stored state of one account, read inside the caller's transaction.
    pub async fn find(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
    ) -> Result<Option<Account>, DbErr> {
        let mut matches = load_accounts(txn, AccountEntity::find_by_id(id)).await?;
        Ok(matches.pop())
    }

    async fn insert_post(&self, txn: &DatabaseTransaction, post: &Post) -> Result<(), DbErr> {
        PostEntity::insert(post::ActiveModel::from(post))
            .exec_without_returning(txn)
            .await?;
        Ok(())
    }

    async fn update_post(&self, txn: &DatabaseTransaction, post: &Post) -> Result<(), DbErr> {
        let mut changes = post::ActiveModel::from(post);
        changes.id = NotSet;

        PostEntity::update_many()
            .set(changes)
            .filter(post::Column::Id.eq(post.id()))
            .exec(txn)
            .await?;
        Ok(())
    }

    async fn delete_post(&self, txn: &DatabaseTransaction, post: &Post) -> Result<(), DbErr> {
        PostEntity::delete_by_id(post.id()).exec(txn).await?;
        Ok(())
    }
}

fn ensure_owned(account: &Account) -> Result<(), MapperError> {
    match account.posts().iter().find(|p| p.author_id() != account.id()) {
        Some(stray) => Err(MapperError::Mapping(format!(
            "post {} belongs to {}, not to account {}",
            stray.id(),
            stray.author_id(),
            account.id()
        ))),
        None => Ok(()),
    }
}

#[async_trait]
impl DataMapper<Account> for AccountDataMapper {
    async fn insert(
        &self,
        txn: &DatabaseTransaction,
        accounts: &[Account],
    ) -> Result<(), MapperError> {
        for account in accounts {
            ensure_owned(account)?;
            tracing::debug!(
                account_id = %account.id(),
                posts = account.posts().len(),
                "Inserting account"
            );

            AccountEntity::insert(account::ActiveModel::from(account))
                .exec_without_returning(txn)
                .await?;
            for post in account.posts() {
                self.insert_post(txn, post).await?;
            }
        }
        Ok(())
    }

    async fn update(
        &self,
        txn: &DatabaseTransaction,
        accounts: &[Account],
    ) -> Result<(), MapperError> {
        for account in accounts {
            ensure_owned(account)?;

            let before = self
                .find(txn, account.id())
                .await?
                .ok_or(MapperError::Stale {
                    kind: Account::KIND,
                    id: account.id(),
                })?;

            let mut root = account::ActiveModel::from(account);
            root.id = NotSet;
            let result = AccountEntity::update_many()
                .set(root)
                .filter(account::Column::Id.eq(account.id()))
                .exec(txn)
                .await?;
            if result.rows_affected == 0 {
                return Err(MapperError::Stale {
                    kind: Account::KIND,
                    id: account.id(),
                });
            }

            let changes = reconcile(before.posts(), account.posts());
            tracing::debug!(
                account_id = %account.id(),
                updates = changes.updates.len(),
                inserts = changes.inserts.len(),
                deletes = changes.deletes.len(),
                "Reconciling posts"
            );

            for post in changes.updates {
                self.update_post(txn, post).await?;
            }
            for post in changes.inserts {
                self.insert_post(txn, post).await?;
            }
            for post in changes.deletes {
                self.delete_post(txn, post).await?;
            }
        }
        Ok(())
    }

    async fn delete(
        &self,
        txn: &DatabaseTransaction,
        accounts: &[Account],
    ) -> Result<(), MapperError> {
        for account in accounts {
            tracing::debug!(account_id = %account.id(), "Deleting account");

            PostEntity::delete_many()
                .filter(post::Column::AuthorId.eq(account.id()))
                .exec(txn)
                .await?;
            let result = AccountEntity::delete_by_id(account.id()).exec(txn).await?;
            if result.rows_affected == 0 {
                return Err(MapperError::Stale {
                    kind: Account::KIND,
                    id: account.id(),
                });
            }
        }
        Ok(())
    }
}

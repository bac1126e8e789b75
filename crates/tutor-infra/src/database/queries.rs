//! Account queries over committed storage.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Select,
};
use uuid::Uuid;

use tutor_core::domain::Account;
use tutor_core::error::RepoError;
use tutor_core::ports::{AccountQuery, Queryer};

use super::entity::account::{self, Entity as AccountEntity};
use super::entity::post::{self, Entity as PostEntity};

/// Load whole aggregates for the root rows selected by `select`.
///
/// Roots come back ordered by creation time then id; each account's posts
/// use the same ordering. Posts are selected through a subquery over the
/// same root filter, never through a bound id list.
pub(crate) async fn load_accounts<C>(
    db: &C,
    select: Select<AccountEntity>,
) -> Result<Vec<Account>, DbErr>
where
    C: ConnectionTrait,
{
    let owners = select
        .clone()
        .select_only()
        .column(account::Column::Id)
        .into_query();

    let roots = select
        .order_by_asc(account::Column::CreatedAt)
        .order_by_asc(account::Column::Id)
        .all(db)
        .await?;
    if roots.is_empty() {
        return Ok(Vec::new());
    }

    let rows = PostEntity::find()
        .filter(post::Column::AuthorId.in_subquery(owners))
        .order_by_asc(post::Column::CreatedAt)
        .order_by_asc(post::Column::Id)
        .all(db)
        .await?;

    let mut posts: HashMap<Uuid, Vec<post::Model>> = HashMap::new();
    for row in rows {
        posts.entry(row.author_id).or_default().push(row);
    }

    Ok(roots
        .into_iter()
        .map(|root| {
            let owned = posts.remove(&root.id).unwrap_or_default();
            root.into_account(owned)
        })
        .collect())
}

/// Lookup of one account by id.
pub struct FindAccountById {
    db: DbConn,
    id: Uuid,
}

impl FindAccountById {
    pub fn new(db: DbConn, id: Uuid) -> Self {
        Self { db, id }
    }
}

#[async_trait]
impl AccountQuery for FindAccountById {
    async fn execute(&self) -> Result<Vec<Account>, RepoError> {
        tracing::debug!(account_id = %self.id, "Finding account by id");

        load_accounts(&self.db, AccountEntity::find_by_id(self.id))
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }
}

/// Every stored account.
pub struct FindAllAccounts {
    db: DbConn,
}

impl FindAllAccounts {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountQuery for FindAllAccounts {
    async fn execute(&self) -> Result<Vec<Account>, RepoError> {
        load_accounts(&self.db, AccountEntity::find())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))
    }
}

/// Queryer backed by the shared connection pool.
#[derive(Clone)]
pub struct SqlQueryer {
    db: DbConn,
}

impl SqlQueryer {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

impl Queryer for SqlQueryer {
    fn by_id(&self, id: Uuid) -> Box<dyn AccountQuery> {
        Box::new(FindAccountById::new(self.db.clone(), id))
    }

    fn all(&self) -> Box<dyn AccountQuery> {
        Box::new(FindAllAccounts::new(self.db.clone()))
    }
}

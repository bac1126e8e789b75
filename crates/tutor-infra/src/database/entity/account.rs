//! Account entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;
use tutor_core::domain::{Account, AccountParameters};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub given_name: String,
    pub surname: String,
    #[sea_orm(column_name = "primary_credential", unique)]
    pub username: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Rehydrate the aggregate from its root row and its post rows.
    pub fn into_account(self, posts: Vec<super::post::Model>) -> Account {
        Account::reconstitute(AccountParameters {
            id: self.id,
            given_name: self.given_name,
            surname: self.surname,
            username: self.username,
            posts: posts.into_iter().map(Into::into).collect(),
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
            deleted_at: self.deleted_at.map(Into::into),
        })
    }
}

/// Conversion from the domain root to a SeaORM ActiveModel. Posts are mapped
/// separately.
impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: Set(account.id()),
            given_name: Set(account.given_name().to_owned()),
            surname: Set(account.surname().to_owned()),
            username: Set(account.username().to_owned()),
            created_at: Set(account.created_at().into()),
            updated_at: Set(account.updated_at().into()),
            deleted_at: Set(account.deleted_at().map(Into::into)),
        }
    }
}

//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;
use tutor_core::domain::{Post, PostParameters};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub draft: bool,
    #[sea_orm(column_name = "like_count")]
    pub likes: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AuthorId",
        to = "super::account::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post. Stored rows are trusted.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Post::reconstitute(PostParameters {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            content: model.content,
            draft: model.draft,
            likes: model.likes,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            deleted_at: model.deleted_at.map(Into::into),
        })
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<&Post> for ActiveModel {
    fn from(post: &Post) -> Self {
        Self {
            id: Set(post.id()),
            author_id: Set(post.author_id()),
            title: Set(post.title().to_owned()),
            content: Set(post.content().to_owned()),
            draft: Set(post.is_draft()),
            likes: Set(post.likes()),
            created_at: Set(post.created_at().into()),
            updated_at: Set(post.updated_at().into()),
            deleted_at: Set(post.deleted_at().map(Into::into)),
        }
    }
}

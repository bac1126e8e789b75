use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Identified;
use super::timestamps::{self, check_created, check_deleted, check_updated};
use crate::error::ValidationError;

/// Post entity - a piece of writing owned by exactly one account.
///
/// `author_id` is a plain identifier back to the owning account. Posts are
/// only reachable through [`crate::domain::Account`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    id: Uuid,
    author_id: Uuid,
    title: String,
    content: String,
    draft: bool,
    likes: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Raw post state, either from a caller (validated by [`Post::new`]) or from
/// storage (trusted by [`Post::reconstitute`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostParameters {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub draft: bool,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Build a post, rejecting negative likes and misordered timestamps.
    pub fn new(parameters: PostParameters) -> Result<Self, ValidationError> {
        if parameters.likes < 0 {
            return Err(ValidationError::NegativeLikes);
        }
        check_created(parameters.created_at)?;
        check_updated(parameters.created_at, parameters.updated_at)?;
        if let Some(deleted_at) = parameters.deleted_at {
            check_deleted(parameters.created_at, parameters.updated_at, deleted_at)?;
        }
        Ok(Self::reconstitute(parameters))
    }

    /// Rehydrate a post from trusted storage without validation.
    pub fn reconstitute(parameters: PostParameters) -> Self {
        Self {
            id: parameters.id,
            author_id: parameters.author_id,
            title: parameters.title,
            content: parameters.content,
            draft: parameters.draft,
            likes: parameters.likes,
            created_at: parameters.created_at,
            updated_at: parameters.updated_at,
            deleted_at: parameters.deleted_at,
        }
    }

    /// Start a new draft with a generated id. The author is stamped when the
    /// post is attached to an account.
    pub fn draft(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = timestamps::now();
        Self {
            id: Uuid::new_v4(),
            author_id: Uuid::nil(),
            title: title.into(),
            content: content.into(),
            draft: true,
            likes: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn author_id(&self) -> Uuid {
        self.author_id
    }

    pub(crate) fn set_author_id(&mut self, author_id: Uuid) {
        self.author_id = author_id;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn is_draft(&self) -> bool {
        self.draft
    }

    pub fn set_draft(&mut self, draft: bool) {
        self.draft = draft;
    }

    /// Turn a draft into a published post.
    pub fn publish(&mut self) -> Result<(), ValidationError> {
        if !self.draft {
            return Err(ValidationError::PostAlreadyPublished);
        }
        self.draft = false;
        Ok(())
    }

    pub fn likes(&self) -> i32 {
        self.likes
    }

    pub fn set_likes(&mut self, likes: i32) -> Result<(), ValidationError> {
        if likes < 0 {
            return Err(ValidationError::NegativeLikes);
        }
        self.likes = likes;
        Ok(())
    }

    pub fn inc_likes(&mut self) {
        self.likes = self.likes.saturating_add(1);
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) -> Result<(), ValidationError> {
        check_created(created_at)?;
        self.created_at = created_at;
        Ok(())
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_updated_at(&mut self, updated_at: DateTime<Utc>) -> Result<(), ValidationError> {
        check_updated(self.created_at, updated_at)?;
        self.updated_at = updated_at;
        Ok(())
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn set_deleted_at(&mut self, deleted_at: DateTime<Utc>) -> Result<(), ValidationError> {
        check_deleted(self.created_at, self.updated_at, deleted_at)?;
        self.deleted_at = Some(deleted_at);
        Ok(())
    }

    /// Snapshot of the post state, the inverse of [`Post::reconstitute`].
    pub fn to_parameters(&self) -> PostParameters {
        PostParameters {
            id: self.id,
            author_id: self.author_id,
            title: self.title.clone(),
            content: self.content.clone(),
            draft: self.draft,
            likes: self.likes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

/// Deserialized posts go through the same validation as [`Post::new`].
impl<'de> Deserialize<'de> for Post {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let parameters = PostParameters::deserialize(deserializer)?;
        Post::new(parameters).map_err(serde::de::Error::custom)
    }
}

impl Identified for Post {
    fn identity(&self) -> Uuid {
        self.id
    }
}

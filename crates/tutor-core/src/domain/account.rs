use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::timestamps::{self, check_created, check_deleted, check_updated};
use super::{Aggregate, Identified, Post};
use crate::error::ValidationError;

/// Account aggregate root. Owns its posts exclusively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    id: Uuid,
    given_name: String,
    surname: String,
    username: String,
    posts: Vec<Post>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Raw account state used to build or rehydrate an [`Account`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountParameters {
    pub id: Uuid,
    pub given_name: String,
    pub surname: String,
    pub username: String,
    #[serde(default)]
    pub posts: Vec<Post>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Build an account, validating the timestamp ordering rules.
    ///
    /// Posts in `parameters` are attached through [`Account::add_posts`], so
    /// they come out stamped with this account's id.
    pub fn new(mut parameters: AccountParameters) -> Result<Self, ValidationError> {
        check_created(parameters.created_at)?;
        check_updated(parameters.created_at, parameters.updated_at)?;
        if let Some(deleted_at) = parameters.deleted_at {
            check_deleted(parameters.created_at, parameters.updated_at, deleted_at)?;
        }

        let posts = std::mem::take(&mut parameters.posts);
        let mut account = Self::reconstitute(parameters);
        account.add_posts(posts);
        Ok(account)
    }

    /// Rehydrate an account from trusted storage without validation.
    pub fn reconstitute(parameters: AccountParameters) -> Self {
        Self {
            id: parameters.id,
            given_name: parameters.given_name,
            surname: parameters.surname,
            username: parameters.username,
            posts: parameters.posts,
            created_at: parameters.created_at,
            updated_at: parameters.updated_at,
            deleted_at: parameters.deleted_at,
        }
    }

    /// Register a brand new account with a generated id and current timestamps.
    pub fn register(
        given_name: impl Into<String>,
        surname: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        let now = timestamps::now();
        Self {
            id: Uuid::new_v4(),
            given_name: given_name.into(),
            surname: surname.into(),
            username: username.into(),
            posts: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn given_name(&self) -> &str {
        &self.given_name
    }

    pub fn set_given_name(&mut self, given_name: impl Into<String>) {
        self.given_name = given_name.into();
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn set_surname(&mut self, surname: impl Into<String>) {
        self.surname = surname.into();
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) -> Result<(), ValidationError> {
        check_created(created_at)?;
        self.created_at = created_at;
        Ok(())
    }

    /// Take the creation time from a persisted copy of this account.
    pub fn restore_created_at(&mut self, persisted: &Account) {
        self.created_at = persisted.created_at;
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

    /// Posts owned by this account, in insertion order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Attach a post, stamping it with this account's id.
    pub fn add_post(&mut self, mut post: Post) {
        post.set_author_id(self.id);
        self.posts.push(post);
    }

    pub fn add_posts(&mut self, posts: impl IntoIterator<Item = Post>) {
        for post in posts {
            self.add_post(post);
        }
    }

    /// Identity-only membership test; content is ignored.
    pub fn has_post(&self, post: &Post) -> bool {
        self.post(post.id()).is_some()
    }

    pub fn post(&self, id: Uuid) -> Option<&Post> {
        self.posts.iter().find(|p| p.id() == id)
    }

    pub fn post_mut(&mut self, id: Uuid) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id() == id)
    }

    /// Detach a post from the account and hand it back.
    pub fn remove_post(&mut self, id: Uuid) -> Option<Post> {
        let index = self.posts.iter().position(|p| p.id() == id)?;
        Some(self.posts.remove(index))
    }

    /// Snapshot of the account state, the inverse of [`Account::reconstitute`].
    pub fn to_parameters(&self) -> AccountParameters {
        AccountParameters {
            id: self.id,
            given_name: self.given_name.clone(),
            surname: self.surname.clone(),
            username: self.username.clone(),
            posts: self.posts.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

impl Identified for Account {
    fn identity(&self) -> Uuid {
        self.id
    }
}

impl Aggregate for Account {
    const KIND: &'static str = "Account";
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap()
    }

    fn parameters() -> AccountParameters {
        AccountParameters {
            id: Uuid::new_v4(),
            given_name: "Ada".to_owned(),
            surname: "Lovelace".to_owned(),
            username: "ada".to_owned(),
            posts: Vec::new(),
            created_at: at(8),
            updated_at: at(9),
            deleted_at: None,
        }
    }

    #[test]
    fn test_valid_timestamp_triples_accepted() {
        let triples = [
            (at(8), at(8), None),
            (at(8), at(9), None),
            (at(8), at(9), Some(at(9))),
            (at(8), at(9), Some(at(10))),
            (at(8), Utc::now(), None),
        ];
        for (created_at, updated_at, deleted_at) in triples {
            let result = Account::new(AccountParameters {
                created_at,
                updated_at,
                deleted_at,
                ..parameters()
            });
            assert!(result.is_ok(), "{created_at} {updated_at} {deleted_at:?}");
        }
    }

    #[test]
    fn test_invalid_timestamp_triples_rejected() {
        let future = Utc::now() + Duration::hours(2);
        let cases = [
            (future, future, None, ValidationError::FutureCreatedAt),
            (at(8), future, None, ValidationError::FutureUpdatedAt),
            (at(9), at(8), None, ValidationError::UpdatedBeforeCreated),
            (at(8), at(9), Some(future), ValidationError::FutureDeletedAt),
            (
                at(8),
                at(9),
                Some(at(7)),
                ValidationError::DeletedBeforeCreatedOrUpdated,
            ),
            (
                at(8),
                at(10),
                Some(at(9)),
                ValidationError::DeletedBeforeCreatedOrUpdated,
            ),
        ];
        for (created_at, updated_at, deleted_at, expected) in cases {
            let result = Account::new(AccountParameters {
                created_at,
                updated_at,
                deleted_at,
                ..parameters()
            });
            assert_eq!(result, Err(expected));
        }
    }

    #[test]
    fn test_add_post_stamps_author() {
        let mut account = Account::new(parameters()).unwrap();
        let post = Post::draft("First", "Hello");
        let post_id = post.id();

        account.add_post(post);

        assert_eq!(account.posts().len(), 1);
        assert_eq!(account.posts()[0].author_id(), account.id());
        assert_eq!(account.post(post_id).map(Post::title), Some("First"));
    }

    #[test]
    fn test_new_stamps_posts_from_parameters() {
        let posts = vec![Post::draft("a", "1"), Post::draft("b", "2")];
        let account = Account::new(AccountParameters {
            posts,
            ..parameters()
        })
        .unwrap();

        assert!(account.posts().iter().all(|p| p.author_id() == account.id()));
    }

    #[test]
    fn test_has_post_compares_identity_only() {
        let mut account = Account::new(parameters()).unwrap();
        let post = Post::draft("Original", "Body");
        account.add_post(post.clone());

        let mut edited = post.clone();
        edited.set_title("Completely different");
        edited.set_content("Also different");
        assert!(account.has_post(&edited));

        let stranger = Post::draft("Original", "Body");
        assert!(!account.has_post(&stranger));
    }

    #[test]
    fn test_remove_post() {
        let mut account = Account::new(parameters()).unwrap();
        let post = Post::draft("Gone soon", "Body");
        let post_id = post.id();
        account.add_post(post);

        let removed = account.remove_post(post_id).unwrap();
        assert_eq!(removed.id(), post_id);
        assert!(account.posts().is_empty());
        assert!(account.remove_post(post_id).is_none());
    }

    #[test]
    fn test_setters_apply_ordering_rules() {
        let mut account = Account::new(parameters()).unwrap();
        assert_eq!(
            account.set_updated_at(at(7)),
            Err(ValidationError::UpdatedBeforeCreated)
        );
        assert_eq!(account.updated_at(), at(9));

        account.set_deleted_at(at(11)).unwrap();
        assert_eq!(account.deleted_at(), Some(at(11)));
    }

    #[test]
    fn test_restore_created_at() {
        let persisted = Account::new(parameters()).unwrap();
        let mut incoming = Account::reconstitute(AccountParameters {
            id: persisted.id(),
            created_at: at(9),
            ..parameters()
        });

        incoming.restore_created_at(&persisted);
        assert_eq!(incoming.created_at(), at(8));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "author_id": Uuid::new_v4(),
            "title": "t",
            "content": "c",
            "draft": false,
            "likes": -2,
            "created_at": at(8),
            "updated_at": at(9),
            "deleted_at": null,
        });
        assert!(serde_json::from_value::<Post>(json).is_err());
    }
}

//! Domain-level error types.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::ports::UnitState;

/// Invariant violations raised while building or mutating an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("creation time cannot be in the future")]
    FutureCreatedAt,

    #[error("modification time cannot be in the future")]
    FutureUpdatedAt,

    #[error("modification time cannot be prior to creation time")]
    UpdatedBeforeCreated,

    #[error("deletion time cannot be in the future")]
    FutureDeletedAt,

    #[error("deletion time cannot be prior to creation or modification time")]
    DeletedBeforeCreatedOrUpdated,

    #[error("likes cannot be negative")]
    NegativeLikes,

    #[error("post is already published")]
    PostAlreadyPublished,
}

/// Unit of work failures. Raised on registration or while saving.
#[derive(Debug, Error)]
pub enum UnitError {
    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Row mapping failed: {0}")]
    Mapping(String),

    #[error("{kind} {id} changed or vanished before the unit was saved")]
    Stale { kind: &'static str, id: Uuid },

    #[error("Aggregate {id} is already registered with another operation")]
    AlreadyRegistered { id: Uuid },

    #[error("Unit of work is closed ({0:?})")]
    Closed(UnitState),

    #[error("Save was cancelled")]
    Cancelled,

    #[error("Save timed out after {0:?}")]
    TimedOut(Duration),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Account {id} already exists")]
    AlreadyExists { id: Uuid },

    #[error("Account {id} not found")]
    NotFound { id: Uuid },

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// Errors surfaced by application services.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

//! Ordering rules shared by every timestamped entity.

use chrono::{DateTime, SubsecRound, Utc};

use crate::error::ValidationError;

/// Current time at microsecond precision, the finest a `timestamptz` column
/// keeps.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub(crate) fn check_created(created_at: DateTime<Utc>) -> Result<(), ValidationError> {
    if created_at > Utc::now() {
        return Err(ValidationError::FutureCreatedAt);
    }
    Ok(())
}

pub(crate) fn check_updated(
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if updated_at > Utc::now() {
        return Err(ValidationError::FutureUpdatedAt);
    }
    if updated_at < created_at {
        return Err(ValidationError::UpdatedBeforeCreated);
    }
    Ok(())
}

pub(crate) fn check_deleted(
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if deleted_at > Utc::now() {
        return Err(ValidationError::FutureDeletedAt);
    }
    if deleted_at < created_at || deleted_at < updated_at {
        return Err(ValidationError::DeletedBeforeCreatedOrUpdated);
    }
    Ok(())
}

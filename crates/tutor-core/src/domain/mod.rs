//! Domain entities - the core business objects.

mod account;
mod post;
mod timestamps;

pub use account::{Account, AccountParameters};
pub use post::{Post, PostParameters};

use uuid::Uuid;

/// Anything compared by identity rather than by content.
pub trait Identified {
    fn identity(&self) -> Uuid;
}

/// A consistency boundary persisted and loaded as one unit.
pub trait Aggregate: Identified + Clone + Send + Sync + 'static {
    /// Name used in logs and error messages.
    const KIND: &'static str;
}

//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod query;
mod repository;
mod unit;

pub use query::{AccountQuery, Queryer};
pub use repository::AccountRepository;
pub use unit::{UnitOfWork, UnitState, Uniter};

//! Relational persistence: pool, table mappings, queries and data mappers.

mod account_mapper;
mod connections;
mod data_mapper;
pub mod entity;
mod queries;
mod reconcile;

pub use account_mapper::AccountDataMapper;
pub use connections::{DatabaseConfig, connect};
pub use data_mapper::{DataMapper, MapperError};
pub use queries::{FindAccountById, FindAllAccounts, SqlQueryer};
pub use reconcile::{ChildChanges, reconcile};

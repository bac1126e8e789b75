//! Table mappings. Each entity names its table, key column and column types.

pub mod account;
pub mod post;

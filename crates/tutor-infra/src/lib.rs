//! # Tutor Infrastructure
//!
//! Concrete implementations of the ports defined in `tutor-core`, backed by
//! SeaORM.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL driver
//! - `sqlite` - SQLite driver

pub mod database;
pub mod unit;

pub use database::{AccountDataMapper, DatabaseConfig, SqlQueryer, connect};
pub use unit::{SqlUniter, SqlUnit, UnitConfig};

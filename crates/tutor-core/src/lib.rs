//! # Tutor Core
//!
//! The domain layer of the account service.
//! Aggregates, error taxonomy, persistence ports and the storage-agnostic
//! repository and service built on top of them. No database dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod repository;
pub mod service;

pub use error::{DomainError, RepoError, UnitError, ValidationError};
pub use repository::UnitAccountRepository;
pub use service::AccountService;

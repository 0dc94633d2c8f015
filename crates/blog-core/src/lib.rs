//! # Blog Core
//!
//! The domain layer of the blog backend: entities, the read-visibility and
//! mutation-access policy, pagination, repository ports and the service
//! that ties them together. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod policy;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
pub use service::{BlogService, Repositories};

//! Data layer for the sso service
//!
//! Storage contracts consumed by the domain service, their MongoDB
//! implementation, the persisted entities, and data-specific errors.

pub mod entities;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod repositories;

pub use entities::*;
pub use error::*;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryStorage;
pub use repositories::*;

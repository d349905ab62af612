//! code_repository 上下文的仓储
//!
mod namespace;
mod repository;

pub use namespace::{InMemoryNamespaceRepository, NamespaceRepository};
pub use repository::{InMemoryRepositoryRepository, RepositoryRepository};

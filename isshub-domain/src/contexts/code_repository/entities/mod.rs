//! code_repository 上下文的实体
//!
mod namespace;
mod repository;

pub use namespace::{Namespace, NamespaceId, NamespaceKind};
pub use repository::{Repository, RepositoryId};

//! code_repository 上下文：命名空间与代码仓库
//!
pub mod entities;
pub mod repositories;

use crate::diagram::{ContextDiagram, RepositorySchema};
use entities::{Namespace, Repository};
use repositories::{InMemoryNamespaceRepository, InMemoryRepositoryRepository};

pub const NAME: &str = "code_repository";

/// 本上下文的实体与仓储图
pub fn diagram() -> ContextDiagram {
    ContextDiagram::new(NAME)
        .entity::<Namespace>()
        .entity::<Repository>()
        .repository(
            RepositorySchema::contract(InMemoryNamespaceRepository::NAME, "Namespace")
                .with_operation(
                    "for_namespace(namespace: Option<NamespaceId>) → Iterator<Namespace>",
                ),
        )
        .repository(
            RepositorySchema::contract(InMemoryRepositoryRepository::NAME, "Repository")
                .with_operation("for_namespace(namespace: NamespaceId) → Iterator<Repository>"),
        )
}

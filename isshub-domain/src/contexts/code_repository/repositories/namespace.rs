use crate::contexts::code_repository::entities::{Namespace, NamespaceId};
use crate::error::{RepositoryResult, RepositoryScope};
use crate::repository::{InMemoryConfig, InMemoryRepository, Repository, UniqueConstraint};

/// Namespace 实体的仓储
pub trait NamespaceRepository: Repository<Entity = Namespace> {
    /// 直接位于 `namespace` 下的命名空间；`None` 表示没有父命名空间的
    fn for_namespace(&self, namespace: Option<&NamespaceId>) -> impl Iterator<Item = &Namespace>;
}

/// 内存中的 Namespace 仓储：同一父命名空间（包括没有父命名空间）下名称唯一
#[derive(Debug)]
pub struct InMemoryNamespaceRepository {
    inner: InMemoryRepository<Namespace>,
}

impl InMemoryNamespaceRepository {
    pub const NAME: &'static str = "InMemoryNamespaceRepository";

    pub fn new() -> Self {
        Self::with_config(InMemoryConfig::default())
    }

    pub fn with_config(config: InMemoryConfig) -> Self {
        Self {
            inner: InMemoryRepository::with_config(Self::NAME, config)
                .unique_by(UniqueConstraint::new(same_name_and_parent, describe)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for InMemoryNamespaceRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn same_name_and_parent(candidate: &Namespace, existing: &Namespace) -> bool {
    candidate.namespace == existing.namespace && candidate.name == existing.name
}

fn describe(namespace: &Namespace) -> String {
    match &namespace.namespace {
        Some(parent) => format!("name={} and namespace={}", namespace.name, parent),
        None => format!("name={} and namespace=None", namespace.name),
    }
}

impl Repository for InMemoryNamespaceRepository {
    type Entity = Namespace;

    fn scope(&self) -> RepositoryScope {
        self.inner.scope()
    }

    fn exists(&self, identifier: &NamespaceId) -> bool {
        self.inner.exists(identifier)
    }

    fn add(&mut self, entity: Namespace) -> RepositoryResult<Namespace> {
        self.inner.add(entity)
    }

    fn get(&self, identifier: &NamespaceId) -> RepositoryResult<Namespace> {
        self.inner.get(identifier)
    }

    fn update(&mut self, entity: Namespace) -> RepositoryResult<Namespace> {
        self.inner.update(entity)
    }

    fn delete(&mut self, entity: &Namespace) -> RepositoryResult<()> {
        self.inner.delete(entity)
    }
}

impl NamespaceRepository for InMemoryNamespaceRepository {
    fn for_namespace(&self, namespace: Option<&NamespaceId>) -> impl Iterator<Item = &Namespace> {
        self.inner
            .iter()
            .filter(move |entity| entity.namespace.as_ref() == namespace)
    }
}

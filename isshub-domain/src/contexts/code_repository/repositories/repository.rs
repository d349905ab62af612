use crate::contexts::code_repository::entities::{NamespaceId, Repository, RepositoryId};
use crate::error::{RepositoryResult, RepositoryScope};
use crate::repository::{
    InMemoryConfig, InMemoryRepository, Repository as EntityRepository, UniqueConstraint,
};

/// Repository 实体的仓储
pub trait RepositoryRepository: EntityRepository<Entity = Repository> {
    /// 位于 `namespace` 下的代码仓库
    fn for_namespace(&self, namespace: &NamespaceId) -> impl Iterator<Item = &Repository>;
}

/// 内存中的 Repository 仓储：同一命名空间下名称唯一
#[derive(Debug)]
pub struct InMemoryRepositoryRepository {
    inner: InMemoryRepository<Repository>,
}

impl InMemoryRepositoryRepository {
    pub const NAME: &'static str = "InMemoryRepositoryRepository";

    pub fn new() -> Self {
        Self::with_config(InMemoryConfig::default())
    }

    pub fn with_config(config: InMemoryConfig) -> Self {
        Self {
            inner: InMemoryRepository::with_config(Self::NAME, config).unique_by(
                UniqueConstraint::new(
                    |candidate: &Repository, existing: &Repository| {
                        candidate.namespace == existing.namespace && candidate.name == existing.name
                    },
                    |repository: &Repository| {
                        format!(
                            "name={} and namespace={}",
                            repository.name, repository.namespace
                        )
                    },
                ),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for InMemoryRepositoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRepository for InMemoryRepositoryRepository {
    type Entity = Repository;

    fn scope(&self) -> RepositoryScope {
        self.inner.scope()
    }

    fn exists(&self, identifier: &RepositoryId) -> bool {
        self.inner.exists(identifier)
    }

    fn add(&mut self, entity: Repository) -> RepositoryResult<Repository> {
        self.inner.add(entity)
    }

    fn get(&self, identifier: &RepositoryId) -> RepositoryResult<Repository> {
        self.inner.get(identifier)
    }

    fn update(&mut self, entity: Repository) -> RepositoryResult<Repository> {
        self.inner.update(entity)
    }

    fn delete(&mut self, entity: &Repository) -> RepositoryResult<()> {
        self.inner.delete(entity)
    }
}

impl RepositoryRepository for InMemoryRepositoryRepository {
    fn for_namespace(&self, namespace: &NamespaceId) -> impl Iterator<Item = &Repository> {
        self.inner
            .iter()
            .filter(move |entity| entity.namespace == *namespace)
    }
}

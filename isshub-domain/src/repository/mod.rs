//! 仓储抽象
//!
//! 每个仓储通过关联类型 `Entity` 绑定唯一的实体类型（未绑定即无法编译）；
//! 错误通过 `RepositoryScope` 区分所属仓储。
//!
mod in_memory;

pub use in_memory::{FailedUpdate, InMemoryConfig, InMemoryRepository, UniqueConstraint};

use crate::entity::Identifiable;
use crate::error::{RepositoryResult, RepositoryScope};

/// 仓储契约
pub trait Repository {
    type Entity: Identifiable;

    /// 错误作用域：`仓储名[实体名]`
    fn scope(&self) -> RepositoryScope;

    fn exists(&self, identifier: &<Self::Entity as Identifiable>::Id) -> bool;

    /// 校验后加入；标识或领域唯一键冲突时返回 Uniqueness
    fn add(&mut self, entity: Self::Entity) -> RepositoryResult<Self::Entity>;

    fn get(
        &self,
        identifier: &<Self::Entity as Identifiable>::Id,
    ) -> RepositoryResult<Self::Entity>;

    /// 校验后替换同标识的实体；不存在时返回 NotFound
    fn update(&mut self, entity: Self::Entity) -> RepositoryResult<Self::Entity>;

    fn delete(&mut self, entity: &Self::Entity) -> RepositoryResult<()>;
}

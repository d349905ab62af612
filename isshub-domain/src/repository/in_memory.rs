//! 内存仓储
//!
//! 以 `identifier -> 实体` 的映射保存实体；领域唯一键通过 `UniqueConstraint` 叠加。
//! `update` 的顺序固定为：校验 → 删除旧实体 → 加入新实体（此时旧实体已不在集合中，
//! 领域唯一键的检查不会与其自身冲突）。加入失败时按 `InMemoryConfig::on_failed_update`
//! 恢复或丢弃旧实体。
//!
use super::Repository;
use crate::entity::{Identifiable, Lookup};
use crate::error::{RepositoryError, RepositoryResult, RepositoryScope};
use bon::Builder;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace, warn};

/// `update` 在删除旧实体后加入失败时的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailedUpdate {
    /// 放回旧实体，集合保持不变
    #[default]
    Restore,
    /// 旧实体保持删除状态
    Discard,
}

/// 内存仓储配置
#[derive(Debug, Clone, Builder)]
pub struct InMemoryConfig {
    #[builder(default)]
    pub on_failed_update: FailedUpdate,
    /// 集合的初始容量
    #[builder(default)]
    pub initial_capacity: usize,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            on_failed_update: FailedUpdate::Restore,
            initial_capacity: 0,
        }
    }
}

/// 领域唯一键：`conflicts(候选, 已有)` 为真即冲突，`describe` 用于错误信息
pub struct UniqueConstraint<E> {
    conflicts: fn(&E, &E) -> bool,
    describe: fn(&E) -> String,
}

impl<E> UniqueConstraint<E> {
    pub fn new(conflicts: fn(&E, &E) -> bool, describe: fn(&E) -> String) -> Self {
        Self { conflicts, describe }
    }
}

impl<E> Clone for UniqueConstraint<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for UniqueConstraint<E> {}

/// 通用内存仓储
pub struct InMemoryRepository<E: Identifiable> {
    scope: RepositoryScope,
    collection: HashMap<E::Id, E>,
    constraints: Vec<UniqueConstraint<E>>,
    config: InMemoryConfig,
}

impl<E: Identifiable> InMemoryRepository<E> {
    pub const NAME: &'static str = "InMemoryRepository";

    pub fn new() -> Self {
        Self::named(Self::NAME)
    }

    /// 以给定仓储名作为错误作用域
    pub fn named(name: &'static str) -> Self {
        Self::with_config(name, InMemoryConfig::default())
    }

    pub fn with_config(name: &'static str, config: InMemoryConfig) -> Self {
        Self {
            scope: RepositoryScope::new(name, E::NAME),
            collection: HashMap::with_capacity(config.initial_capacity),
            constraints: Vec::new(),
            config,
        }
    }

    /// 追加领域唯一键
    pub fn unique_by(mut self, constraint: UniqueConstraint<E>) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn config(&self) -> &InMemoryConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.collection.values()
    }

    fn not_found(&self, identifier: &E::Id) -> RepositoryError {
        RepositoryError::not_found(
            self.scope,
            format!("Unable to find one with identifier={identifier}"),
        )
    }

    fn ensure_unique(&self, entity: &E) -> RepositoryResult<()> {
        if self.collection.contains_key(entity.identifier()) {
            return Err(RepositoryError::uniqueness(
                self.scope,
                format!("One already exists with identifier={}", entity.identifier()),
            ));
        }
        for constraint in &self.constraints {
            if self
                .collection
                .values()
                .any(|existing| (constraint.conflicts)(entity, existing))
            {
                return Err(RepositoryError::uniqueness(
                    self.scope,
                    format!("One already exists with {}", (constraint.describe)(entity)),
                ));
            }
        }
        Ok(())
    }
}

impl<E: Identifiable> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Identifiable> fmt::Debug for InMemoryRepository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("scope", &self.scope)
            .field("len", &self.collection.len())
            .field("constraints", &self.constraints.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<E: Identifiable> Lookup<E> for InMemoryRepository<E> {
    fn find(&self, predicate: &dyn Fn(&E) -> bool) -> Option<&E> {
        self.collection.values().find(|e| predicate(e))
    }

    fn resolve(&self, identifier: &E::Id) -> Option<&E>
    where
        E: Identifiable,
    {
        self.collection.get(identifier)
    }
}

impl<E: Identifiable + Clone> Repository for InMemoryRepository<E> {
    type Entity = E;

    fn scope(&self) -> RepositoryScope {
        self.scope
    }

    fn exists(&self, identifier: &E::Id) -> bool {
        self.collection.contains_key(identifier)
    }

    fn add(&mut self, entity: E) -> RepositoryResult<E> {
        let identifier = *entity.identifier();
        trace!(scope = %self.scope, %identifier, "validating entity before add");
        entity.validate_in(&*self).inspect_err(|err| {
            warn!(scope = %self.scope, %identifier, error = %err, "invalid entity");
        })?;
        self.ensure_unique(&entity).inspect_err(|err| {
            warn!(scope = %self.scope, %identifier, error = %err, "add rejected");
        })?;

        self.collection.insert(identifier, entity.clone());
        debug!(scope = %self.scope, %identifier, "entity added");
        Ok(entity)
    }

    fn get(&self, identifier: &E::Id) -> RepositoryResult<E> {
        self.collection
            .get(identifier)
            .cloned()
            .ok_or_else(|| self.not_found(identifier))
    }

    fn update(&mut self, entity: E) -> RepositoryResult<E> {
        let identifier = *entity.identifier();
        entity.validate_in(&*self).inspect_err(|err| {
            warn!(scope = %self.scope, %identifier, error = %err, "invalid entity");
        })?;

        let Some(previous) = self.collection.remove(&identifier) else {
            return Err(self.not_found(&identifier));
        };

        match self.add(entity) {
            Ok(entity) => {
                debug!(scope = %self.scope, %identifier, "entity updated");
                Ok(entity)
            }
            Err(err) => {
                match self.config.on_failed_update {
                    FailedUpdate::Restore => {
                        self.collection.insert(identifier, previous);
                        warn!(
                            scope = %self.scope,
                            %identifier,
                            "update failed, previous entity restored"
                        );
                    }
                    FailedUpdate::Discard => {
                        warn!(scope = %self.scope, %identifier, "update failed, entity removed");
                    }
                }
                Err(err)
            }
        }
    }

    fn delete(&mut self, entity: &E) -> RepositoryResult<()> {
        let identifier = entity.identifier();
        match self.collection.remove(identifier) {
            Some(_) => {
                debug!(scope = %self.scope, %identifier, "entity deleted");
                Ok(())
            }
            None => Err(self.not_found(identifier)),
        }
    }
}

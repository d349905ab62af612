//! 领域层统一错误定义
//!
//! - `ValidationError`：字段赋值与实体校验失败（类型、空值、语义、冻结字段、未知字段）
//! - `RepositoryError`：仓储操作失败，携带所属仓储的 `RepositoryScope`，
//!   便于区分不同仓储抛出的同类错误
//!
use crate::field::Value;
use std::fmt;
use thiserror::Error;

/// 校验错误：错误种类即变体本身，`field` 为 `Entity.field` 形式的展示名
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be of type {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
    #[error("{field} cannot be None")]
    NullNotAllowed { field: String },
    #[error("{field} {reason}")]
    SemanticViolation { field: String, reason: String },
    #[error("{field} is frozen and cannot be modified")]
    FrozenFieldWrite { field: String },
    #[error("{field} is not a declared field")]
    UnknownField { field: String },
}

impl ValidationError {
    pub fn type_mismatch(
        entity: &str,
        field: &str,
        expected: impl fmt::Display,
        found: &Value,
    ) -> Self {
        Self::TypeMismatch {
            field: display_name(entity, field),
            expected: expected.to_string(),
            found: found.type_name().to_string(),
        }
    }

    pub fn null_not_allowed(entity: &str, field: &str) -> Self {
        Self::NullNotAllowed {
            field: display_name(entity, field),
        }
    }

    pub fn semantic(entity: &str, field: &str, reason: impl Into<String>) -> Self {
        Self::SemanticViolation {
            field: display_name(entity, field),
            reason: reason.into(),
        }
    }

    pub fn frozen(entity: &str, field: &str) -> Self {
        Self::FrozenFieldWrite {
            field: display_name(entity, field),
        }
    }

    pub fn unknown_field(entity: &str, field: &str) -> Self {
        Self::UnknownField {
            field: display_name(entity, field),
        }
    }

    /// 出错字段的展示名
    pub fn field(&self) -> &str {
        match self {
            Self::TypeMismatch { field, .. }
            | Self::NullNotAllowed { field }
            | Self::SemanticViolation { field, .. }
            | Self::FrozenFieldWrite { field }
            | Self::UnknownField { field } => field,
        }
    }

    /// 类型违例：类型不符或必填字段为空
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. } | Self::NullNotAllowed { .. })
    }

    /// 语义违例：类型正确但违反领域规则
    pub fn is_value_error(&self) -> bool {
        matches!(self, Self::SemanticViolation { .. })
    }
}

fn display_name(entity: &str, field: &str) -> String {
    format!("{entity}.{field}")
}

/// 校验结果类型别名
pub type ValidationResult<T> = Result<T, ValidationError>;

/// 仓储错误的作用域：仓储名 + 实体名，显示为 `Repository[Entity]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepositoryScope {
    repository: &'static str,
    entity: &'static str,
}

impl RepositoryScope {
    pub const fn new(repository: &'static str, entity: &'static str) -> Self {
        Self { repository, entity }
    }

    pub fn repository(&self) -> &'static str {
        self.repository
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }
}

impl fmt::Display for RepositoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.repository, self.entity)
    }
}

/// 仓储错误
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("not found in {scope}: {reason}")]
    NotFound {
        scope: RepositoryScope,
        reason: String,
    },
    #[error("uniqueness violated in {scope}: {reason}")]
    Uniqueness {
        scope: RepositoryScope,
        reason: String,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl RepositoryError {
    pub fn not_found(scope: RepositoryScope, reason: impl Into<String>) -> Self {
        Self::NotFound {
            scope,
            reason: reason.into(),
        }
    }

    pub fn uniqueness(scope: RepositoryScope, reason: impl Into<String>) -> Self {
        Self::Uniqueness {
            scope,
            reason: reason.into(),
        }
    }

    /// 产生该错误的仓储；校验错误不属于任何仓储
    pub fn scope(&self) -> Option<RepositoryScope> {
        match self {
            Self::NotFound { scope, .. } | Self::Uniqueness { scope, .. } => Some(*scope),
            Self::Validation(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_uniqueness(&self) -> bool {
        matches!(self, Self::Uniqueness { .. })
    }

    /// 是否为指定仓储的 NotFound
    pub fn is_not_found_in(&self, scope: RepositoryScope) -> bool {
        self.is_not_found() && self.scope() == Some(scope)
    }

    /// 是否为指定仓储的唯一性冲突
    pub fn is_uniqueness_in(&self, scope: RepositoryScope) -> bool {
        self.is_uniqueness() && self.scope() == Some(scope)
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// 仓储结果类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    // 测试展示名与错误分类
    #[test]
    fn test_validation_error_kinds() {
        let err = ValidationError::type_mismatch("Namespace", "name", "str", &Value::Integer(1));
        assert_eq!(err.field(), "Namespace.name");
        assert!(err.is_type_error());
        assert!(!err.is_value_error());
        assert_eq!(err.to_string(), "Namespace.name must be of type str, got int");

        let err = ValidationError::null_not_allowed("Namespace", "name");
        assert!(err.is_type_error());

        let err = ValidationError::semantic("Namespace", "namespace", "cannot be in a loop");
        assert!(err.is_value_error());
        assert_eq!(err.to_string(), "Namespace.namespace cannot be in a loop");

        let err = ValidationError::frozen("Namespace", "identifier");
        assert!(!err.is_type_error() && !err.is_value_error());
    }

    // 测试作用域显示与按作用域匹配
    #[test]
    fn test_repository_scope() {
        let ns = RepositoryScope::new("InMemoryNamespaceRepository", "Namespace");
        let repo = RepositoryScope::new("InMemoryRepositoryRepository", "Repository");
        assert_eq!(ns.to_string(), "InMemoryNamespaceRepository[Namespace]");

        let err = RepositoryError::not_found(ns, "Unable to find one with identifier=x");
        assert!(err.is_not_found_in(ns));
        assert!(!err.is_not_found_in(repo));
        assert!(!err.is_uniqueness_in(ns));
        assert_eq!(err.scope(), Some(ns));

        let err: RepositoryError = ValidationError::frozen("Namespace", "identifier").into();
        assert_eq!(err.scope(), None);
        assert!(err.as_validation().is_some());
    }
}

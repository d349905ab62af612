//! 字段描述与动态值
//!
//! 每个实体类型拥有一张静态的 `FieldDescriptor` 表（由 `#[entity]` 生成），
//! 记录字段名、类型标签、必填/可选、冻结与关系标签；
//! `Value` 是字段值的动态表示，用于按名称读写字段与关键字式构造。
//!
use crate::entity::Identifier;
use crate::error::{ValidationError, ValidationResult};
use crate::validation::validate_uuid;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// 字段的类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Boolean,
    Integer,
    Float,
    Text,
    Uuid,
    Enum {
        name: &'static str,
        variants: &'static [&'static str],
    },
    /// 指向另一实体（按标识引用）
    Reference { entity: &'static str },
}

impl FieldType {
    /// 引用或枚举字段指向的目标名
    pub fn target(&self) -> Option<&'static str> {
        match self {
            Self::Enum { name, .. } => Some(*name),
            Self::Reference { entity } => Some(*entity),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("bool"),
            Self::Integer => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Text => f.write_str("str"),
            Self::Uuid => f.write_str("UUID"),
            Self::Enum { name, .. } => f.write_str(name),
            Self::Reference { entity } => f.write_str(entity),
        }
    }
}

/// 字段值的动态表示
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    Variant {
        enumeration: &'static str,
        name: &'static str,
    },
    Reference {
        entity: &'static str,
        identifier: Uuid,
    },
}

impl Value {
    /// 值的类型名，与 `FieldType` 的显示保持一致
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "None",
            Self::Boolean(_) => "bool",
            Self::Integer(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "str",
            Self::Uuid(_) => "UUID",
            Self::Variant { enumeration, .. } => *enumeration,
            Self::Reference { entity, .. } => *entity,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// 可作为实体字段存储的 Rust 类型
pub trait FieldValue: Sized {
    const FIELD_TYPE: FieldType;

    fn to_value(&self) -> Value;

    /// 类型不符时返回 None
    fn from_value(value: &Value) -> Option<Self>;

    /// 类型自带的语义检查，随 `validate()` 执行
    fn check(&self, entity: &str, field: &str) -> ValidationResult<()> {
        let _ = (entity, field);
        Ok(())
    }
}

impl FieldValue for bool {
    const FIELD_TYPE: FieldType = FieldType::Boolean;

    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl FieldValue for i64 {
    const FIELD_TYPE: FieldType = FieldType::Integer;

    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }

    // 布尔值不视为整数
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl FieldValue for f64 {
    const FIELD_TYPE: FieldType = FieldType::Float;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl FieldValue for String {
    const FIELD_TYPE: FieldType = FieldType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FieldValue for Uuid {
    const FIELD_TYPE: FieldType = FieldType::Uuid;

    fn to_value(&self) -> Value {
        Value::Uuid(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Uuid(u) => Some(*u),
            _ => None,
        }
    }
}

/// 字段声明
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    pub frozen: bool,
    /// 关系的描述性标签，仅供文档/图表使用
    pub relation: Option<&'static str>,
}

impl FieldDescriptor {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: true,
            frozen: false,
            relation: None,
        }
    }

    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            required: false,
            frozen: false,
            relation: None,
        }
    }

    /// 仅可在构造时赋值
    pub const fn frozen(self) -> Self {
        Self {
            frozen: true,
            ..self
        }
    }

    pub const fn with_relation(self, label: &'static str) -> Self {
        Self {
            relation: Some(label),
            ..self
        }
    }
}

/// 字符串无法解析为枚举变体
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{value:?} is not a valid {enumeration}")]
pub struct UnknownVariant {
    enumeration: &'static str,
    value: String,
}

impl UnknownVariant {
    pub fn new(enumeration: &'static str, value: &str) -> Self {
        Self {
            enumeration,
            value: value.to_string(),
        }
    }
}

// ---- 供 #[entity] 生成代码使用 ----

#[doc(hidden)]
pub fn coerce_required<T: FieldValue>(
    entity: &str,
    field: &str,
    value: Value,
) -> ValidationResult<T> {
    if value.is_null() {
        return Err(ValidationError::null_not_allowed(entity, field));
    }
    T::from_value(&value)
        .ok_or_else(|| ValidationError::type_mismatch(entity, field, T::FIELD_TYPE, &value))
}

#[doc(hidden)]
pub fn coerce_optional<T: FieldValue>(
    entity: &str,
    field: &str,
    value: Value,
) -> ValidationResult<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    coerce_required(entity, field, value).map(Some)
}

#[doc(hidden)]
pub fn coerce_identifier<I: Identifier>(
    entity: &str,
    field: &str,
    value: Value,
) -> ValidationResult<I> {
    match value {
        Value::Null => Err(ValidationError::null_not_allowed(entity, field)),
        Value::Uuid(uuid) => Ok(I::from_uuid(uuid)),
        other => Err(ValidationError::type_mismatch(entity, field, FieldType::Uuid, &other)),
    }
}

#[doc(hidden)]
pub fn check_identifier<I: Identifier>(
    entity: &str,
    field: &str,
    identifier: &I,
) -> ValidationResult<()> {
    validate_uuid(&Value::Uuid(identifier.as_uuid()), false, &format!("{entity}.{field}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 测试必填字段的转换：空值与类型不符
    #[test]
    fn test_coerce_required() {
        let name: String = coerce_required("Namespace", "name", Value::from("acme")).unwrap();
        assert_eq!(name, "acme");

        let err = coerce_required::<String>("Namespace", "name", Value::Null).unwrap_err();
        assert!(matches!(err, ValidationError::NullNotAllowed { .. }));

        let err = coerce_required::<String>("Namespace", "name", Value::from(1)).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { .. }));
    }

    // 测试可选字段接受空值
    #[test]
    fn test_coerce_optional() {
        let value: Option<String> =
            coerce_optional("Namespace", "description", Value::Null).unwrap();
        assert!(value.is_none());
        let value: Option<String> =
            coerce_optional("Namespace", "description", Value::from(Some("desc"))).unwrap();
        assert_eq!(value.as_deref(), Some("desc"));
        assert!(coerce_optional::<String>("Namespace", "description", Value::from(true)).is_err());
    }

    // 测试布尔值不能作为整数
    #[test]
    fn test_bool_is_not_integer() {
        assert_eq!(i64::from_value(&Value::Integer(3)), Some(3));
        assert_eq!(i64::from_value(&Value::Boolean(true)), None);
    }

    // 测试描述符构造
    #[test]
    fn test_descriptor_builders() {
        let d = FieldDescriptor::required("identifier", FieldType::Uuid).frozen();
        assert!(d.required && d.frozen && d.relation.is_none());

        let d = FieldDescriptor::optional("namespace", FieldType::Reference { entity: "Namespace" })
            .with_relation("may belongs to");
        assert!(!d.required && !d.frozen);
        assert_eq!(d.relation, Some("may belongs to"));
        assert_eq!(d.ty.target(), Some("Namespace"));
        assert_eq!(d.ty.to_string(), "Namespace");
    }
}

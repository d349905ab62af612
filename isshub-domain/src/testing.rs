//! 实体字段检查工具（供测试使用）
//!
//! 工厂函数接收覆盖的字段值（`Attrs`），与随机生成的合法默认值合并后构造实体。
//! 每项检查都分别在“构造时给定值”和“构造后赋值再校验”两条路径上断言结果。
//! 失败时 panic。
//!
use crate::entity::Entity;
use crate::error::{ValidationError, ValidationResult};
use crate::field::Value;
use uuid::Uuid;

/// 关键字式构造的字段值
pub type Attrs = Vec<(&'static str, Value)>;

/// 期望的检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Valid,
    TypeError,
    ValueError,
}

impl Expected {
    fn matches(self, result: &ValidationResult<()>) -> bool {
        match (self, result) {
            (Self::Valid, Ok(())) => true,
            (Self::TypeError, Err(err)) => err.is_type_error(),
            (Self::ValueError, Err(err)) => err.is_value_error(),
            _ => false,
        }
    }
}

/// 值及其期望结果
pub type ValuesValidation = Vec<(Value, Expected)>;

pub fn integer_only() -> ValuesValidation {
    vec![
        (Value::from("foo"), Expected::TypeError),
        (Value::from(-123), Expected::ValueError),
        (Value::from(-1.5), Expected::TypeError),
        (Value::from(-1), Expected::ValueError),
        (Value::from(-0.001), Expected::TypeError),
        (Value::from(0.001), Expected::TypeError),
        (Value::from(1), Expected::Valid),
        (Value::from(1.5), Expected::TypeError),
        (Value::from(123), Expected::Valid),
        (Value::from(true), Expected::TypeError),
    ]
}

pub fn positive_integer_only() -> ValuesValidation {
    let mut values = integer_only();
    values.push((Value::from(0), Expected::ValueError));
    values
}

pub fn string_only() -> ValuesValidation {
    vec![
        (Value::from("foo"), Expected::Valid),
        (Value::from(1), Expected::TypeError),
        (Value::from(-0.1), Expected::TypeError),
    ]
}

pub fn uuid4_only() -> ValuesValidation {
    vec![
        (Value::from("foo"), Expected::TypeError),
        (Value::from(1), Expected::TypeError),
        (Value::from(Uuid::nil()), Expected::TypeError),
        (Value::from(Uuid::new_v4().to_string()), Expected::TypeError),
        (Value::from(Uuid::new_v4()), Expected::Valid),
    ]
}

/// 用 `overrides` 覆盖 `defaults` 中的同名字段
pub fn merge(defaults: Attrs, overrides: Attrs) -> Attrs {
    let mut merged: Attrs = defaults
        .into_iter()
        .filter(|(name, _)| !overrides.iter().any(|(other, _)| other == name))
        .collect();
    merged.extend(overrides);
    merged
}

/// 断言实体声明了 `field` 且可读取
pub fn check_field<E: Entity>(entity: &E, field: &str) {
    assert!(E::field(field).is_some(), "{} has no field {field}", E::NAME);
    assert!(entity.get_attr(field).is_ok(), "{}.{field} cannot be read", E::NAME);
}

/// 断言 `field` 取 `value` 时得到 `expected`
///
/// # Panics
/// 工厂无法构造默认实体，或结果与期望不符时
pub fn check_field_value<E, F>(factory: F, field: &'static str, value: Value, expected: Expected)
where
    E: Entity,
    F: Fn(Attrs) -> ValidationResult<E>,
{
    let created = factory(vec![(field, value.clone())]).map(drop);
    assert!(
        expected.matches(&created),
        "creating {}.{field} with {value:?}: expected {expected:?}, got {created:?}",
        E::NAME
    );

    let mut entity = default_entity(&factory);
    let updated = match entity.set_attr(field, value.clone()) {
        Err(ValidationError::FrozenFieldWrite { .. }) => return,
        // 类型不符在赋值时即被拒绝
        Err(err) => Err(err),
        Ok(()) => entity.validate(),
    };
    assert!(
        expected.matches(&updated),
        "updating {}.{field} with {value:?}: expected {expected:?}, got {updated:?}",
        E::NAME
    );
}

/// 对一组值逐一执行 `check_field_value`
pub fn check_field_values<E, F>(factory: F, field: &'static str, values: ValuesValidation)
where
    E: Entity,
    F: Fn(Attrs) -> ValidationResult<E>,
{
    for (value, expected) in values {
        check_field_value(&factory, field, value, expected);
    }
}

/// 断言 `field` 不接受空值
pub fn check_field_not_nullable<E, F>(factory: F, field: &'static str)
where
    E: Entity,
    F: Fn(Attrs) -> ValidationResult<E>,
{
    check_field_value(factory, field, Value::Null, Expected::TypeError);
}

/// 断言 `field` 接受空值
pub fn check_field_nullable<E, F>(factory: F, field: &'static str)
where
    E: Entity,
    F: Fn(Attrs) -> ValidationResult<E>,
{
    check_field_value(factory, field, Value::Null, Expected::Valid);
}

fn default_entity<E, F>(factory: &F) -> E
where
    E: Entity,
    F: Fn(Attrs) -> ValidationResult<E>,
{
    factory(Vec::new())
        .unwrap_or_else(|err| panic!("factory cannot build a valid {}: {err}", E::NAME))
}

//! 标量校验辅助函数
//!
//! 作用于动态值 `Value`，`display_name` 用于错误信息（如 `Namespace.identifier`）。
//! 布尔值不被视为整数。
//!
use crate::error::{ValidationError, ValidationResult};
use crate::field::{FieldType, Value};
use uuid::Uuid;

/// 校验正整数
/// - `Null` 且 `none_allowed` 时通过，否则为 `NullNotAllowed`
/// - 非整数（包括布尔值）为 `TypeMismatch`
/// - `value <= 0` 为 `SemanticViolation`
pub fn validate_positive_integer(
    value: &Value,
    none_allowed: bool,
    display_name: &str,
) -> ValidationResult<()> {
    match value {
        Value::Null if none_allowed => Ok(()),
        Value::Null => Err(ValidationError::NullNotAllowed {
            field: display_name.to_string(),
        }),
        Value::Integer(n) if *n > 0 => Ok(()),
        Value::Integer(_) => Err(ValidationError::SemanticViolation {
            field: display_name.to_string(),
            reason: "must be a positive integer".to_string(),
        }),
        other => Err(ValidationError::TypeMismatch {
            field: display_name.to_string(),
            expected: FieldType::Integer.to_string(),
            found: other.type_name().to_string(),
        }),
    }
}

/// 校验 UUID v4
/// - `Null` 的处理同上
/// - 非 UUID 或版本不是 4 均为 `TypeMismatch`
pub fn validate_uuid(
    value: &Value,
    none_allowed: bool,
    display_name: &str,
) -> ValidationResult<()> {
    match value {
        Value::Null if none_allowed => Ok(()),
        Value::Null => Err(ValidationError::NullNotAllowed {
            field: display_name.to_string(),
        }),
        Value::Uuid(uuid) if is_v4(uuid) => Ok(()),
        Value::Uuid(uuid) => Err(ValidationError::TypeMismatch {
            field: display_name.to_string(),
            expected: "UUID (version 4)".to_string(),
            found: format!("UUID (version {})", uuid.get_version_num()),
        }),
        other => Err(ValidationError::TypeMismatch {
            field: display_name.to_string(),
            expected: "UUID (version 4)".to_string(),
            found: other.type_name().to_string(),
        }),
    }
}

fn is_v4(uuid: &Uuid) -> bool {
    uuid.get_version_num() == 4
}

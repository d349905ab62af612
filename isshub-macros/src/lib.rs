//! isshub 领域模型过程宏
//!
//! - `#[entity]`：把具名字段结构体声明为实体，生成字段描述表、校验、动态读写与构建器
//! - `#[entity_id]`：把 `struct XxxId(Uuid)` 声明为实体标识
//! - `#[field_enum]`：把单元枚举声明为可作为字段类型的枚举
//!
use proc_macro::TokenStream;

mod entity;
mod entity_id;
mod field_enum;
mod utils;

/// 实体宏
///
/// ```ignore
/// #[entity(id = NamespaceId)]
/// pub struct Namespace {
///     pub name: String,
///     #[field(relation = "may belongs to", validate = Self::validate_namespace)]
///     pub namespace: Option<NamespaceId>,
/// }
/// ```
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 实体标识宏（包装 `Uuid` 的 tuple struct）
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}

/// 字段枚举宏
#[proc_macro_attribute]
pub fn field_enum(attr: TokenStream, item: TokenStream) -> TokenStream {
    field_enum::expand(attr, item)
}

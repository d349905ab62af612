//! isshub 领域层（isshub-domain）
//!
//! 以限界上下文组织的领域模型：
//! - 实体（`entity`）与字段的动态值层（`field`），由 `isshub-macros` 中的属性宏生成实现
//! - 字段校验（`validation`）与统一的错误类型（`error`）
//! - 按实体绑定的仓储契约及其内存实现（`repository`）
//! - 各上下文的实体与仓储（`contexts`），目前为 `code_repository`
//! - 上下文的 Graphviz 图（`diagram`）
//! - 实体字段检查工具（`testing`）
//!
//! 典型用法：
//! 1. 用 `#[entity_id]` 定义标识，用 `#[entity(id = ...)]` 定义实体；
//! 2. 通过 `Entity::builder()` 或 `Entity::from_attrs` 构造，二者均在构造后校验；
//! 3. 将实体交给该上下文的仓储存取。
//!
extern crate self as isshub_domain;

pub mod contexts;
pub mod diagram;
pub mod entity;
pub mod error;
pub mod field;
pub mod repository;
pub mod testing;
pub mod validation;

pub use uuid;

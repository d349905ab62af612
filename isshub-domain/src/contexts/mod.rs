//! 领域上下文（bounded contexts）
//!
pub mod code_repository;

use crate::diagram::ContextDiagram;

/// 所有上下文的图
pub fn diagrams() -> Vec<ContextDiagram> {
    vec![code_repository::diagram()]
}

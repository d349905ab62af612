//! 领域上下文图（Graphviz dot）
//!
//! 从实体的字段描述表生成实体图：每个实体、每个枚举各一个 record 节点，
//! 引用与枚举字段生成带关系标签的连线（无标签时为 `(1)` / `(0..1)`）；
//! 仓储图列出每个仓储的操作。
//!
use crate::entity::{Entity, EntitySchema};
use crate::field::FieldType;
use std::collections::BTreeSet;
use thiserror::Error;

const ALIGN_LEFT: &str = "\\l";

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("{entity}.{field} : {target} - not a valid entity in context {context}")]
    UnknownEntity {
        context: &'static str,
        entity: &'static str,
        field: &'static str,
        target: &'static str,
    },
}

/// 仓储在图中的描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySchema {
    pub name: &'static str,
    pub entity: &'static str,
    pub operations: Vec<String>,
}

impl RepositorySchema {
    /// 带有通用 CRUD 操作的仓储
    pub fn contract(name: &'static str, entity: &'static str) -> Self {
        Self {
            name,
            entity,
            operations: vec![
                format!("add(entity: {entity}) → {entity}"),
                format!("delete(entity: {entity}) → ()"),
                format!("exists(identifier: {entity}Id) → bool"),
                format!("get(identifier: {entity}Id) → {entity}"),
                format!("update(entity: {entity}) → {entity}"),
            ],
        }
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operations.push(operation.into());
        self
    }
}

/// 一个上下文的实体与仓储
#[derive(Debug, Clone)]
pub struct ContextDiagram {
    name: &'static str,
    entities: Vec<EntitySchema>,
    repositories: Vec<RepositorySchema>,
}

impl ContextDiagram {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entities: Vec::new(),
            repositories: Vec::new(),
        }
    }

    pub fn entity<E: Entity>(mut self) -> Self {
        self.entities.push(E::schema());
        self
    }

    pub fn repository(mut self, repository: RepositorySchema) -> Self {
        self.repositories.push(repository);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entities(&self) -> &[EntitySchema] {
        &self.entities
    }

    pub fn repositories(&self) -> &[RepositorySchema] {
        &self.repositories
    }

    /// 实体图；引用了上下文之外的实体时报错
    pub fn render_entities(&self) -> Result<String, DiagramError> {
        let mut nodes: Vec<(String, String)> = Vec::new();
        let mut links = BTreeSet::new();

        for schema in &self.entities {
            let source = self.dot_identifier(schema.name);
            let mut lines = Vec::with_capacity(schema.fields.len());

            for field in schema.fields {
                let target = match field.ty {
                    FieldType::Enum { name, variants } => {
                        let target = self.dot_identifier(name);
                        if !nodes.iter().any(|(id, _)| *id == target) {
                            let record = render_record(
                                &target,
                                &format!("<__class__> Enum: {name}"),
                                variants.iter().map(|v| v.to_string()),
                            );
                            nodes.push((target.clone(), record));
                        }
                        Some(target)
                    }
                    FieldType::Reference { entity } => {
                        if !self.entities.iter().any(|e| e.name == entity) {
                            return Err(DiagramError::UnknownEntity {
                                context: self.name,
                                entity: schema.name,
                                field: field.name,
                                target: entity,
                            });
                        }
                        Some(self.dot_identifier(entity))
                    }
                    _ => None,
                };

                if let Some(target) = target {
                    let label = match field.relation {
                        Some(label) => label.to_string(),
                        None if field.required => "(1)".to_string(),
                        None => "(0..1)".to_string(),
                    };
                    links.insert(render_link(
                        &format!("{source}:{}", field.name),
                        &format!("{target}:__class__"),
                        &label,
                    ));
                }

                let optional = if field.required { "" } else { " (optional)" };
                lines.push(format!("<{0}> {0} : {1}{optional}", field.name, field.ty));
            }

            let title = format!("<__class__> Entity: {}", schema.name);
            let record = render_record(&source, &title, lines);
            nodes.push((source, record));
        }

        let body = nodes.into_iter().map(|(_, record)| record).chain(links);
        Ok(render_digraph(
            "domain_context_entities",
            &format!("Domain context entities [{}]", self.name),
            body,
        ))
    }

    /// 仓储图（操作按名称排序）
    pub fn render_repositories(&self) -> String {
        let records = self.repositories.iter().map(|repository| {
            let mut operations = repository.operations.clone();
            operations.sort();
            render_record(
                &self.dot_identifier(repository.name),
                &format!("{} (for {} entity)", repository.name, repository.entity),
                operations,
            )
        });
        render_digraph(
            "domain_context_repositories",
            &format!("Domain context repositories [{}]", self.name),
            records,
        )
    }

    fn dot_identifier(&self, name: &str) -> String {
        format!("{}___{}", self.name, name)
    }
}

fn render_record(identifier: &str, title: &str, lines: impl IntoIterator<Item = String>) -> String {
    let parts: Vec<String> = lines
        .into_iter()
        .map(|line| format!("{line} {ALIGN_LEFT}"))
        .collect();
    format!("{identifier} [label=\"{title}|{}\"]", parts.join("|"))
}

fn render_link(source: &str, dest: &str, label: &str) -> String {
    format!("{source} -> {dest} [label=\"{label}\"]")
}

fn render_digraph(name: &str, label: &str, lines: impl IntoIterator<Item = String>) -> String {
    let mut out = format!(
        "digraph {name} {{\n  label = \"{label}\"\n  #labelloc = \"t\"\n  \
         rankdir=LR\n  node[shape=record]\n"
    );
    for line in lines {
        out.push_str("  ");
        out.push_str(&line);
        out.push('\n');
    }
    out.push('}');
    out
}

use crate::entity::{Entity, Lookup};
use crate::error::{ValidationError, ValidationResult};
use isshub_macros::{entity, entity_id, field_enum};
use std::collections::HashSet;
use uuid::Uuid;

#[entity_id]
pub struct NamespaceId(Uuid);

/// 命名空间的种类
#[field_enum]
pub enum NamespaceKind {
    Organization,
    Team,
    Group,
}

/// 命名空间：可以嵌套在另一个命名空间之下，嵌套链不允许成环
#[entity(id = NamespaceId)]
pub struct Namespace {
    pub name: String,
    #[field(relation = "is a")]
    pub kind: NamespaceKind,
    #[field(
        relation = "may belongs to",
        validate = Self::validate_namespace_is_not_in_a_loop
    )]
    pub namespace: Option<NamespaceId>,
    pub description: Option<String>,
}

impl Namespace {
    /// 在一组命名空间中校验，父引用按标识在 `namespaces` 中解析
    ///
    /// A→B→C→A 这样的环只有在三者都可解析时才能发现，此时从其中任一节点校验都会失败。
    /// 不含自身的集合同样可用。
    pub fn validate_chain(&self, namespaces: &[Namespace]) -> ValidationResult<()> {
        self.validate_in(&namespaces)
    }

    /// 沿父命名空间链向上，重复访问任何节点即为环
    ///
    /// 无法解析的父节点视为链的终点。
    fn validate_namespace_is_not_in_a_loop(
        &self,
        parent: &Option<NamespaceId>,
        lookup: &dyn Lookup<Self>,
    ) -> ValidationResult<()> {
        let mut visited = HashSet::from([self.identifier]);
        let mut current = *parent;
        while let Some(identifier) = current {
            if !visited.insert(identifier) {
                return Err(ValidationError::semantic(
                    Self::NAME,
                    "namespace",
                    "cannot be in a loop",
                ));
            }
            current = lookup.resolve(&identifier).and_then(|ns| ns.namespace);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Value;

    fn namespace(name: &str) -> Namespace {
        Namespace::builder()
            .name(name.to_string())
            .kind(NamespaceKind::Organization)
            .build()
            .unwrap()
    }

    // 测试枚举的字符串形式
    #[test]
    fn test_namespace_kind() {
        assert_eq!(NamespaceKind::VARIANTS, ["Organization", "Team", "Group"]);
        assert_eq!(NamespaceKind::Team.to_string(), "Team");
        assert_eq!("Group".parse::<NamespaceKind>().unwrap(), NamespaceKind::Group);
        assert!("group".parse::<NamespaceKind>().is_err());
    }

    // 测试类型不符的赋值
    #[test]
    fn test_kind_must_be_an_enum() {
        let mut ns = namespace("acme");
        assert!(ns.validate().is_ok());

        let err = ns.set_attr("kind", Value::from("not-an-enum")).unwrap_err();
        assert!(err.is_type_error());
        assert_eq!(ns.kind, NamespaceKind::Organization);

        ns.set_attr("kind", NamespaceKind::Team.into()).unwrap();
        assert_eq!(ns.kind, NamespaceKind::Team);
    }

    // 测试直接指向自身
    #[test]
    fn test_self_loop() {
        let mut ns = namespace("acme");
        ns.namespace = Some(*ns.identifier());
        let err = ns.validate().unwrap_err();
        assert!(err.is_value_error());
        assert_eq!(err.to_string(), "Namespace.namespace cannot be in a loop");
    }

    // 测试三个节点成环与解环
    #[test]
    fn test_three_nodes_loop() {
        let mut a = namespace("a");
        let mut b = namespace("b");
        let mut c = namespace("c");

        b.namespace = Some(*c.identifier());
        a.namespace = Some(*b.identifier());
        let peers = vec![a.clone(), b.clone(), c.clone()];
        for ns in &peers {
            assert!(ns.validate_in(&peers).is_ok());
        }

        c.namespace = Some(*a.identifier());
        let peers = vec![a.clone(), b.clone(), c.clone()];
        for ns in &peers {
            assert!(ns.validate_in(&peers).unwrap_err().is_value_error());
        }

        c.namespace = None;
        let peers = vec![a, b, c];
        for ns in &peers {
            assert!(ns.validate_in(&peers).is_ok());
        }
    }

    // 测试 A→B→C→A 从任一节点校验都报错，解环后都通过
    #[test]
    fn test_chain_loop_detected_from_every_node() {
        let mut a = namespace("a");
        let mut b = namespace("b");
        let mut c = namespace("c");
        a.namespace = Some(*b.identifier());
        b.namespace = Some(*c.identifier());
        c.namespace = Some(*a.identifier());

        let chain = [a.clone(), b.clone(), c.clone()];
        for ns in [&a, &b, &c] {
            let err = ns.validate_chain(&chain).unwrap_err();
            assert!(err.is_value_error());
            assert_eq!(err.to_string(), "Namespace.namespace cannot be in a loop");
        }

        // 集合中不含被校验的节点本身时也能发现
        assert!(a.validate_chain(&[b.clone(), c.clone()]).unwrap_err().is_value_error());

        // 没有可解析的同类实体时只能判断自环
        assert!(a.validate().is_ok());

        c.namespace = None;
        let chain = [a.clone(), b.clone(), c.clone()];
        for ns in &chain {
            assert!(ns.validate_chain(&chain).is_ok());
        }
    }

    // 测试环不经过自身的情况也能终止并报错
    #[test]
    fn test_loop_above_entity() {
        let mut a = namespace("a");
        let mut b = namespace("b");
        let mut c = namespace("c");
        a.namespace = Some(*b.identifier());
        b.namespace = Some(*c.identifier());
        c.namespace = Some(*b.identifier());
        let peers = vec![a.clone(), b, c];
        assert!(a.validate_in(&peers).unwrap_err().is_value_error());
    }
}

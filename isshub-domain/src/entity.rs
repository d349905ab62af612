//! 实体抽象
//!
//! - `Entity`：字段描述表、校验与按名称的动态读写，由 `#[entity]` 实现
//! - `Identifiable`：带冻结 `identifier` 的实体，相等与哈希仅取决于 `(类型, identifier)`
//! - `Identifier`：基于 UUID v4 的实体标识，由 `#[entity_id]` 实现
//! - `Lookup`：校验时解析同类实体（例如沿自引用链检测环）
//!
use crate::error::ValidationResult;
use crate::field::{FieldDescriptor, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use uuid::Uuid;

/// 实体标识
pub trait Identifier: Copy + Eq + Hash + Ord + Debug + Display {
    /// 所标识的实体名
    const ENTITY: &'static str;

    fn from_uuid(uuid: Uuid) -> Self;

    fn as_uuid(&self) -> Uuid;

    /// 生成随机（v4）标识
    fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }
}

/// 实体
///
/// 赋值不会自动校验，`set_attr` 只检查冻结、空值与类型；
/// 语义规则（包括自定义校验）需显式调用 `validate`/`validate_in`。
pub trait Entity: Sized {
    const NAME: &'static str;

    /// 字段描述表（按声明顺序）
    fn fields() -> &'static [FieldDescriptor];

    /// 在没有其它实体可解析的情况下校验
    ///
    /// 引用只保存对方的标识，涉及其它实体的规则（如命名空间成环）
    /// 需要通过 `validate_in` 给出同类实体的集合才能判断。
    fn validate(&self) -> ValidationResult<()> {
        self.validate_in(&Detached)
    }

    /// 按声明顺序执行各字段的内置检查与自定义校验，返回首个错误
    fn validate_in(&self, lookup: &dyn Lookup<Self>) -> ValidationResult<()>;

    fn get_attr(&self, name: &str) -> ValidationResult<Value>;

    fn set_attr(&mut self, name: &str, value: Value) -> ValidationResult<()>;

    /// 关键字式构造：未给出的字段视为 `Null`，缺省的 identifier 自动生成，构造后立即校验
    fn from_attrs<I, K>(attrs: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>;

    fn field(name: &str) -> Option<&'static FieldDescriptor> {
        Self::fields().iter().find(|f| f.name == name)
    }

    fn schema() -> EntitySchema {
        EntitySchema {
            name: Self::NAME,
            fields: Self::fields(),
        }
    }
}

/// 带标识的实体
pub trait Identifiable: Entity {
    type Id: Identifier;

    fn identifier(&self) -> &Self::Id;
}

/// 实体类型的静态描述，供图表等外部工具内省
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

/// 同类实体的解析来源
pub trait Lookup<E> {
    fn find(&self, predicate: &dyn Fn(&E) -> bool) -> Option<&E>;

    fn resolve(&self, identifier: &E::Id) -> Option<&E>
    where
        E: Identifiable,
    {
        self.find(&|entity| entity.identifier() == identifier)
    }
}

/// 不提供任何实体的解析来源
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl<E> Lookup<E> for Detached {
    fn find(&self, _predicate: &dyn Fn(&E) -> bool) -> Option<&E> {
        None
    }
}

impl<E> Lookup<E> for Vec<E> {
    fn find(&self, predicate: &dyn Fn(&E) -> bool) -> Option<&E> {
        self.iter().find(|e| predicate(e))
    }
}

impl<E> Lookup<E> for &[E] {
    fn find(&self, predicate: &dyn Fn(&E) -> bool) -> Option<&E> {
        self.iter().find(|e| predicate(e))
    }
}

impl<E, const N: usize> Lookup<E> for [E; N] {
    fn find(&self, predicate: &dyn Fn(&E) -> bool) -> Option<&E> {
        self.iter().find(|e| predicate(e))
    }
}

impl<K, E, S> Lookup<E> for HashMap<K, E, S> {
    fn find(&self, predicate: &dyn Fn(&E) -> bool) -> Option<&E> {
        self.values().find(|e| predicate(e))
    }
}

impl<K, E> Lookup<E> for BTreeMap<K, E> {
    fn find(&self, predicate: &dyn Fn(&E) -> bool) -> Option<&E> {
        self.values().find(|e| predicate(e))
    }
}

//! 集成测试共用的实体工厂
//!
//! 工厂以随机的合法值为默认，再按 `overrides` 覆盖后经 `from_attrs` 构造。
//!
#![allow(dead_code)]

use isshub_domain::contexts::code_repository::entities::{
    Namespace, NamespaceId, NamespaceKind, Repository,
};
use isshub_domain::entity::{Entity, Identifier};
use isshub_domain::error::ValidationResult;
use isshub_domain::field::Value;
use isshub_domain::testing::{Attrs, merge};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn random_name() -> String {
    let len = rand::thread_rng().gen_range(3..=16);
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn random_kind() -> NamespaceKind {
    let mut rng = rand::thread_rng();
    match NamespaceKind::VARIANTS.choose(&mut rng).map(|label| label.parse()) {
        Some(Ok(kind)) => kind,
        _ => NamespaceKind::Organization,
    }
}

pub fn namespace_factory(overrides: Attrs) -> ValidationResult<Namespace> {
    let defaults: Attrs = vec![
        ("name", Value::from(random_name())),
        ("kind", Value::from(random_kind())),
    ];
    Namespace::from_attrs(merge(defaults, overrides))
}

pub fn repository_factory(overrides: Attrs) -> ValidationResult<Repository> {
    let defaults: Attrs = vec![
        ("name", Value::from(random_name())),
        ("namespace", Value::from(NamespaceId::generate())),
    ];
    Repository::from_attrs(merge(defaults, overrides))
}

/// 名为 `name` 的命名空间，可选地位于 `parent` 之下
pub fn namespace(name: &str, parent: Option<&Namespace>) -> Namespace {
    let mut overrides: Attrs = vec![("name", Value::from(name))];
    if let Some(parent) = parent {
        overrides.push(("namespace", Value::from(*parent.identifier())));
    }
    namespace_factory(overrides).expect("valid namespace")
}

pub fn repository(name: &str, namespace: &Namespace) -> Repository {
    repository_factory(vec![
        ("name", Value::from(name)),
        ("namespace", Value::from(*namespace.identifier())),
    ])
    .expect("valid repository")
}

mod common;

use anyhow::Result;
use common::{init_tracing, namespace};
use isshub_domain::contexts::code_repository::repositories::{
    InMemoryNamespaceRepository, NamespaceRepository,
};
use isshub_domain::error::RepositoryScope;
use isshub_domain::repository::{FailedUpdate, InMemoryConfig, Repository};

// 测试新增、读取、更新与删除
#[test]
fn test_namespace_lifecycle() -> Result<()> {
    init_tracing();
    let mut repo = InMemoryNamespaceRepository::new();
    assert!(repo.is_empty());

    let acme = namespace("acme", None);
    let added = repo.add(acme.clone())?;
    assert_eq!(added, acme);
    assert!(repo.exists(acme.identifier()));

    let stored = repo.get(acme.identifier())?;
    assert_eq!(stored.name, "acme");

    let mut renamed = stored.clone();
    renamed.name = "acme-corp".to_string();
    renamed.description = Some("The company".to_string());
    repo.update(renamed)?;
    let stored = repo.get(acme.identifier())?;
    assert_eq!(stored.name, "acme-corp");
    assert_eq!(stored.description.as_deref(), Some("The company"));

    repo.delete(&acme)?;
    assert!(!repo.exists(acme.identifier()));
    let err = repo.delete(&acme).unwrap_err();
    assert!(err.is_not_found_in(repo.scope()));
    let err = repo.get(acme.identifier()).unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

// 测试同一标识不能加入两次
#[test]
fn test_same_identifier_twice() -> Result<()> {
    let mut repo = InMemoryNamespaceRepository::new();
    let acme = namespace("acme", None);
    repo.add(acme.clone())?;

    let mut twin = acme.clone();
    twin.name = "other".to_string();
    let err = repo.add(twin).unwrap_err();
    assert!(err.is_uniqueness_in(repo.scope()));
    assert_eq!(
        err.to_string(),
        format!(
            "uniqueness violated in InMemoryNamespaceRepository[Namespace]: \
             One already exists with identifier={}",
            acme.identifier()
        )
    );
    assert_eq!(repo.len(), 1);
    Ok(())
}

// 测试名称唯一性按父命名空间划分
#[test]
fn test_same_name_in_different_parents() -> Result<()> {
    let mut repo = InMemoryNamespaceRepository::new();
    let acme = repo.add(namespace("acme", None))?;
    let other = repo.add(namespace("other", None))?;

    repo.add(namespace("team", Some(&acme)))?;
    repo.add(namespace("team", Some(&other)))?;
    assert!(repo.add(namespace("team", Some(&acme))).unwrap_err().is_uniqueness());
    assert!(repo.add(namespace("acme", None)).unwrap_err().is_uniqueness());
    assert_eq!(repo.len(), 4);
    Ok(())
}

// 测试更新造成名称冲突时保留原实体
#[test]
fn test_conflicting_update_restores_previous() -> Result<()> {
    let mut repo = InMemoryNamespaceRepository::new();
    repo.add(namespace("acme", None))?;
    let other = repo.add(namespace("other", None))?;

    let mut conflicting = other.clone();
    conflicting.name = "acme".to_string();
    assert!(repo.update(conflicting).unwrap_err().is_uniqueness());
    assert_eq!(repo.get(other.identifier())?.name, "other");
    assert_eq!(repo.len(), 2);
    Ok(())
}

// 测试配置为丢弃时，冲突的更新会移除原实体
#[test]
fn test_conflicting_update_discards_previous() -> Result<()> {
    let config = InMemoryConfig::builder()
        .on_failed_update(FailedUpdate::Discard)
        .build();
    let mut repo = InMemoryNamespaceRepository::with_config(config);
    repo.add(namespace("acme", None))?;
    let other = repo.add(namespace("other", None))?;

    let mut conflicting = other.clone();
    conflicting.name = "acme".to_string();
    assert!(repo.update(conflicting).unwrap_err().is_uniqueness());
    assert!(!repo.exists(other.identifier()));
    assert_eq!(repo.len(), 1);
    Ok(())
}

// 测试更新不存在的实体
#[test]
fn test_update_missing() {
    let mut repo = InMemoryNamespaceRepository::new();
    let err = repo.update(namespace("ghost", None)).unwrap_err();
    assert!(err.is_not_found_in(RepositoryScope::new(
        InMemoryNamespaceRepository::NAME,
        "Namespace"
    )));
    assert!(repo.is_empty());
}

// 测试按父命名空间列出
#[test]
fn test_for_namespace() -> Result<()> {
    let mut repo = InMemoryNamespaceRepository::new();
    let acme = repo.add(namespace("acme", None))?;
    let other = repo.add(namespace("other", None))?;
    let team = repo.add(namespace("team", Some(&acme)))?;
    let group = repo.add(namespace("group", Some(&team)))?;

    let mut roots: Vec<_> = repo.for_namespace(None).map(|ns| ns.name.clone()).collect();
    roots.sort();
    assert_eq!(roots, ["acme", "other"]);

    let children: Vec<_> = repo.for_namespace(Some(acme.identifier())).collect();
    assert_eq!(children, [&team]);
    let children: Vec<_> = repo.for_namespace(Some(team.identifier())).collect();
    assert_eq!(children, [&group]);
    assert_eq!(repo.for_namespace(Some(other.identifier())).count(), 0);
    Ok(())
}

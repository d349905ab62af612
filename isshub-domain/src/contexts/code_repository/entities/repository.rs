use super::NamespaceId;
use isshub_macros::{entity, entity_id};
use uuid::Uuid;

#[entity_id]
pub struct RepositoryId(Uuid);

/// 代码仓库，隶属于一个命名空间
#[entity(id = RepositoryId)]
pub struct Repository {
    pub name: String,
    #[field(relation = "belongs to")]
    pub namespace: NamespaceId,
}

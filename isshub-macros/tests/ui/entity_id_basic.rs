use isshub_domain::entity::Identifier;
use isshub_domain::field::{FieldType, FieldValue, Value};
use isshub_macros::entity_id;
use uuid::Uuid;

#[entity_id(entity = "Project")]
pub struct ProjectKey(Uuid);

fn main() {
    let key = ProjectKey::generate();
    assert_eq!(<ProjectKey as Identifier>::ENTITY, "Project");
    assert_eq!(ProjectKey::FIELD_TYPE, FieldType::Reference { entity: "Project" });

    let parsed: ProjectKey = key.to_string().parse().unwrap();
    assert_eq!(parsed, key);

    let value = Value::from(key);
    assert_eq!(ProjectKey::from_value(&value), Some(key));
    assert_eq!(ProjectKey::from_value(&Value::Uuid(key.as_uuid())), None);
}

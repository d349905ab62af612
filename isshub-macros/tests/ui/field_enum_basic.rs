use isshub_domain::field::{FieldType, FieldValue, Value};
use isshub_macros::field_enum;

#[field_enum]
pub enum Visibility {
    Public,
    Private,
}

fn main() {
    assert_eq!(Visibility::VARIANTS, ["Public", "Private"]);
    assert_eq!(
        Visibility::FIELD_TYPE,
        FieldType::Enum { name: "Visibility", variants: Visibility::VARIANTS }
    );
    assert_eq!("Private".parse::<Visibility>().unwrap(), Visibility::Private);
    assert!("Internal".parse::<Visibility>().is_err());

    let value = Value::from(Visibility::Public);
    assert_eq!(Visibility::from_value(&value), Some(Visibility::Public));
    assert_eq!(Visibility::from_value(&Value::from("Public")), None);
}

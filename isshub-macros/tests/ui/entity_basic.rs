use isshub_domain::entity::{Entity, Identifiable, Lookup};
use isshub_domain::error::{ValidationError, ValidationResult};
use isshub_domain::field::Value;
use isshub_macros::{entity, entity_id};
use uuid::Uuid;

#[entity_id]
pub struct TicketId(Uuid);

#[entity(id = TicketId)]
pub struct Ticket {
    pub title: String,
    #[field(validate = Self::validate_priority)]
    pub priority: i64,
    pub assignee: Option<String>,
    #[field(frozen)]
    pub origin: String,
}

impl Ticket {
    fn validate_priority(
        &self,
        priority: &i64,
        _lookup: &dyn Lookup<Self>,
    ) -> ValidationResult<()> {
        if *priority < 0 {
            return Err(ValidationError::semantic(Self::NAME, "priority", "must not be negative"));
        }
        Ok(())
    }
}

#[entity(debug = false)]
pub struct Note {
    pub text: String,
}

fn main() {
    let ticket = Ticket::builder()
        .title("broken".to_string())
        .priority(1)
        .origin("web".to_string())
        .build()
        .unwrap();
    assert_eq!(ticket.origin(), "web");
    assert!(ticket.assignee.is_none());
    let _: &TicketId = Identifiable::identifier(&ticket);

    let err = Ticket::from_attrs([
        ("title", Value::from("broken")),
        ("priority", Value::from(-1)),
        ("origin", Value::from("web")),
    ])
    .err()
    .unwrap();
    assert!(err.is_value_error());

    let note = Note::from_attrs([("text", Value::from("hello"))]).ok().unwrap();
    assert_eq!(note.text, "hello");
    assert_eq!(Note::fields().len(), 1);
}

use sieve_validator::{FieldAccess, Record};

struct Handle;

#[derive(Record)]
pub struct Signup {
    #[record(validator = "required|email", filter = "trim|lower")]
    email: Option<String>,

    #[record(validator = "min(18)", label = "Age", trigger = "create")]
    age: u32,

    #[record(validator = "required", skip)]
    internal: u64,

    session: Handle,

    #[record(check = "min(1)")]
    tagged_with_renamed_key: Vec<i64>,
}

fn main() {
    let shape = Signup::shape();
    assert_eq!(shape.fields.len(), 3);
    assert_eq!(shape.fields[0].name, "email");
    assert_eq!(shape.fields[1].tag("label"), Some("Age"));
    assert_eq!(shape.fields[2].tag("check"), Some("min(1)"));
    assert!(matches!(shape.fields[0].access, FieldAccess::Leaf(_)));

    let _ = Signup {
        email: None,
        age: 0,
        internal: 0,
        session: Handle,
        tagged_with_renamed_key: Vec::new(),
    };
}

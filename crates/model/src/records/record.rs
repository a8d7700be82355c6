use crate::core::value::{FieldValue, Value};
use serde::{Deserialize, Serialize};

/// One row of data flowing from a puller to a pusher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub entity: String,
    pub fields: Vec<FieldValue>,
}

impl Record {
    pub fn new(entity: &str, fields: Vec<FieldValue>) -> Self {
        Record {
            entity: entity.to_string(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .map(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record::new(
            "users",
            vec![
                FieldValue::new("id", Value::Int(1)),
                FieldValue::new("email", Value::String("a@b.c".into())),
            ],
        )
    }

    #[test]
    fn field_lookup_is_case_insensitive() {
        assert_eq!(record().get_value("EMAIL"), Value::String("a@b.c".into()));
    }

    #[test]
    fn missing_field_yields_null() {
        assert_eq!(record().get_value("missing"), Value::Null);
    }
}

//! User record as owned by the shared store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ProfileField;

/// The canonical user object returned by the account API.
///
/// Stored as the raw JSON object so keys this crate does not model survive a
/// refresh untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(Map<String, Value>);

impl UserRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style setter for a profile field.
    #[must_use]
    pub fn with(mut self, field: ProfileField, value: impl Into<String>) -> Self {
        self.0
            .insert(field.key().to_string(), Value::String(value.into()));
        self
    }

    /// Text value of a profile field.
    ///
    /// Numbers and booleans are rendered as text, `null` and nested values
    /// read as absent.
    pub fn field(&self, field: ProfileField) -> Option<String> {
        match self.0.get(field.key())? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Overlay `incoming` on top of this record, key by key.
    pub fn merge(&mut self, incoming: Self) {
        self.0.extend(incoming.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for UserRecord {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn new_record_is_empty() {
        let record = UserRecord::new();
        assert!(record.is_empty());
        assert_eq!(record, UserRecord::default());
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({}));
    }

    #[test]
    fn field_reads_strings_and_numbers() {
        let record: UserRecord = serde_json::from_value(json!({
            "first_name": "Ada",
            "longitude": 3.5,
            "dob": null,
        }))
        .unwrap();

        assert_eq!(record.field(ProfileField::FirstName).as_deref(), Some("Ada"));
        assert_eq!(record.field(ProfileField::Longitude).as_deref(), Some("3.5"));
        assert_eq!(record.field(ProfileField::Dob), None);
        assert_eq!(record.field(ProfileField::Email), None);
    }

    #[test]
    fn merge_overwrites_known_keys_and_keeps_the_rest() {
        let mut record: UserRecord = serde_json::from_value(json!({
            "id": 42,
            "first_name": "Ada",
            "country": "Nigeria",
        }))
        .unwrap();
        let incoming: UserRecord = serde_json::from_value(json!({
            "first_name": "Grace",
            "cover_photo": "https://cdn.example.com/c.png",
        }))
        .unwrap();

        record.merge(incoming);

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "id": 42,
                "first_name": "Grace",
                "country": "Nigeria",
                "cover_photo": "https://cdn.example.com/c.png",
            })
        );
    }
}

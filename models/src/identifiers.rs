// models/src/identifiers.rs

use core::ops::Deref;
use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use internment::Intern;

use crate::errors::{ValidationError, ValidationResult};

/// A patient identifier. Identifiers are assigned by the persistence or
/// generation collaborator and are never minted locally; the engine only
/// compares and copies them, so they are interned.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PatientId(Intern<String>);

impl PatientId {
    /// Creates a new identifier.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyIdentifier` if `value` is empty or only
    /// whitespace.
    pub fn new(value: String) -> ValidationResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        if trimmed.len() == value.len() {
            Ok(Self(Intern::new(value)))
        } else {
            Ok(Self(Intern::new(trimmed.to_string())))
        }
    }

    /// Accepts the JSON shapes collaborators use for ids: strings, and the
    /// integers older backends emitted.
    pub fn from_json(value: &Value) -> ValidationResult<Self> {
        match value {
            Value::String(s) => Self::new(s.clone()),
            Value::Number(n) if n.is_u64() || n.is_i64() => Self::new(n.to_string()),
            Value::Null => Err(ValidationError::MissingField("id")),
            other => Err(ValidationError::InvalidIdentifierType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl<'de> Deserialize<'de> for PatientId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        PatientId::from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for PatientId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl FromStr for PatientId {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        Self::new(s.to_string())
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PatientId> for String {
    fn from(value: PatientId) -> Self {
        value.0.to_string()
    }
}

impl PartialOrd for PatientId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PatientId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::PatientId;
    use crate::errors::ValidationError;
    use core::str::FromStr;
    use serde_json::json;

    #[test]
    fn should_not_create_empty_identifier() {
        let identifier = PatientId::new("   ".to_string());
        assert_eq!(identifier.unwrap_err(), ValidationError::EmptyIdentifier);
    }

    #[test]
    fn should_trim_identifier() {
        let identifier = PatientId::new(" 42 ".to_string()).unwrap();
        assert_eq!(identifier.as_str(), "42");
    }

    #[test]
    fn should_convert_identifier_from_str() {
        let identifier = PatientId::from_str("p-1");
        assert_eq!(identifier.unwrap().as_str(), "p-1");
    }

    #[test]
    fn should_accept_numeric_json_ids() {
        let id: PatientId = serde_json::from_value(json!(12)).unwrap();
        assert_eq!(id.as_str(), "12");
        assert!(serde_json::from_value::<PatientId>(json!(1.5)).is_err());
        assert!(serde_json::from_value::<PatientId>(json!(null)).is_err());
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let id = PatientId::from_str("abc").unwrap();
        assert_eq!(serde_json::to_value(id).unwrap(), json!("abc"));
    }
}

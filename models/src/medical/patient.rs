// models/src/medical/patient.rs
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ValidationError, ValidationResult};
use crate::identifiers::PatientId;
use crate::medical::triage::PriorityClass;
use crate::medical::vitals::Vitals;

pub const UNKNOWN_PATIENT_NAME: &str = "Unknown Patient";
pub const PENDING_PRIORITY_LEVEL: &str = "Pending";

/// A validated patient record. Every instance went through
/// `Patient::try_from(RawPatient)` or was built locally with all fields set,
/// so nothing downstream has to cope with half-shaped data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPatient")]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub age: u32,
    pub gender: String, // e.g., "Male", "Female", "Other", or empty
    pub symptoms: String,
    pub vitals: Vitals,
    pub medical_history: String,
    pub arrival_time: DateTime<Utc>,
    pub priority_score: f64, // collaborator-computed, opaque here
    pub priority_level: String, // e.g., "Critical", "Medium", "Pending"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>, // set only while in the completed list
}

impl Patient {
    /// A bare record with neutral defaults; mostly useful in tests and for
    /// building fixtures.
    pub fn new(id: PatientId, name: impl Into<String>, priority_score: f64) -> Self {
        Patient {
            id,
            name: name.into(),
            age: 0,
            gender: String::new(),
            symptoms: String::new(),
            vitals: Vitals::new(),
            medical_history: String::new(),
            arrival_time: Utc::now(),
            priority_score,
            priority_level: PENDING_PRIORITY_LEVEL.to_string(),
            completed_at: None,
        }
    }

    pub fn priority_class(&self) -> PriorityClass {
        PriorityClass::from_level(&self.priority_level)
    }
}

/// The loosely-typed shape collaborators actually send. Every field is
/// optional; `Patient::try_from` normalizes it or rejects it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPatient {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Value,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub vitals: Value,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub priority_score: Value,
    #[serde(default)]
    pub priority_level: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

impl TryFrom<RawPatient> for Patient {
    type Error = ValidationError;

    fn try_from(raw: RawPatient) -> ValidationResult<Self> {
        let id = PatientId::from_json(&raw.id)?;
        let arrival_time = match raw.arrival_time.as_deref() {
            Some(s) => parse_timestamp(s)?,
            None => return Err(ValidationError::MissingField("arrival_time")),
        };
        let completed_at = raw.completed_at.as_deref().map(parse_timestamp).transpose()?;

        Ok(Patient {
            id,
            name: non_blank(raw.name).unwrap_or_else(|| UNKNOWN_PATIENT_NAME.to_string()),
            age: age_from_json(&raw.age),
            gender: raw.gender.unwrap_or_default().trim().to_string(),
            symptoms: raw.symptoms.unwrap_or_default(),
            vitals: Vitals::from_json(&raw.vitals),
            medical_history: raw.medical_history.unwrap_or_default(),
            arrival_time,
            priority_score: score_from_json(&raw.priority_score)?,
            priority_level: non_blank(raw.priority_level)
                .unwrap_or_else(|| PENDING_PRIORITY_LEVEL.to_string()),
            completed_at,
        })
    }
}

/// Accepts RFC 3339 and the offset-less ISO-8601 form produced by
/// `datetime.isoformat()`-style backends; the latter is read as UTC.
pub fn parse_timestamp(s: &str) -> ValidationResult<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|_| ValidationError::InvalidDateFormat(s.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn age_from_json(value: &Value) -> u32 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(age) if age.is_finite() && age > 0.0 => age.min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

fn score_from_json(value: &Value) -> ValidationResult<f64> {
    let score = match value {
        Value::Null => return Ok(0.0),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    };
    if score.is_finite() {
        Ok(score)
    } else {
        Err(ValidationError::NonFiniteScore(score))
    }
}

/// A field-level edit of an active patient. `id`, `arrival_time` and
/// `completed_at` are absent: no patch can change them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitals: Option<Vitals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<String>,
}

impl PatientPatch {
    pub fn is_empty(&self) -> bool {
        self == &PatientPatch::default()
    }

    /// Applies every present field. A non-finite score is ignored so the
    /// ordering key stays totally ordered.
    pub fn apply_to(&self, patient: &mut Patient) {
        if let Some(ref name) = self.name {
            patient.name = name.clone();
        }
        if let Some(age) = self.age {
            patient.age = age;
        }
        if let Some(ref gender) = self.gender {
            patient.gender = gender.clone();
        }
        if let Some(ref symptoms) = self.symptoms {
            patient.symptoms = symptoms.clone();
        }
        if let Some(ref vitals) = self.vitals {
            patient.vitals = vitals.clone();
        }
        if let Some(ref history) = self.medical_history {
            patient.medical_history = history.clone();
        }
        if let Some(score) = self.priority_score.filter(|s| s.is_finite()) {
            patient.priority_score = score;
        }
        if let Some(ref level) = self.priority_level {
            patient.priority_level = level.clone();
        }
    }
}

/// A full patch carrying every mutable field of `patient`; used to fold an
/// authoritative collaborator record back into the stored one.
impl From<&Patient> for PatientPatch {
    fn from(patient: &Patient) -> Self {
        PatientPatch {
            name: Some(patient.name.clone()),
            age: Some(patient.age),
            gender: Some(patient.gender.clone()),
            symptoms: Some(patient.symptoms.clone()),
            vitals: Some(patient.vitals.clone()),
            medical_history: Some(patient.medical_history.clone()),
            priority_score: Some(patient.priority_score),
            priority_level: Some(patient.priority_level.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medical::vitals::{VitalValue, HEART_RATE};
    use serde_json::json;

    fn raw(value: Value) -> RawPatient {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn normalizes_sparse_collaborator_payload() {
        let patient = Patient::try_from(raw(json!({
            "id": 3,
            "name": "  ",
            "age": "45",
            "vitals": {"heart_rate": 95, "temperature": "N/A"},
            "arrival_time": "2024-03-01T10:15:30.123456",
            "priority_score": 4.0,
            "priority_level": "High"
        })))
        .unwrap();

        assert_eq!(patient.id.as_str(), "3");
        assert_eq!(patient.name, UNKNOWN_PATIENT_NAME);
        assert_eq!(patient.age, 45);
        assert_eq!(patient.gender, "");
        assert_eq!(patient.vitals.len(), 1);
        assert_eq!(patient.vitals.get(HEART_RATE), Some(&VitalValue::Number(95.0)));
        assert_eq!(patient.priority_class(), PriorityClass::High);
        assert!(patient.completed_at.is_none());
    }

    #[test]
    fn missing_score_and_level_default_to_pending() {
        let patient = Patient::try_from(raw(json!({
            "id": "p1",
            "arrival_time": "2024-03-01T10:15:30Z"
        })))
        .unwrap();
        assert_eq!(patient.priority_score, 0.0);
        assert_eq!(patient.priority_level, PENDING_PRIORITY_LEVEL);
    }

    #[test]
    fn rejects_missing_id_and_bad_timestamps() {
        let no_id = Patient::try_from(raw(json!({"arrival_time": "2024-03-01T10:15:30Z"})));
        assert_eq!(no_id.unwrap_err(), ValidationError::MissingField("id"));

        let bad_time = Patient::try_from(raw(json!({"id": "1", "arrival_time": "yesterday"})));
        assert!(matches!(bad_time.unwrap_err(), ValidationError::InvalidDateFormat(_)));

        let no_time = Patient::try_from(raw(json!({"id": "1"})));
        assert_eq!(no_time.unwrap_err(), ValidationError::MissingField("arrival_time"));
    }

    #[test]
    fn rejects_non_numeric_score() {
        let result = Patient::try_from(raw(json!({
            "id": "1",
            "arrival_time": "2024-03-01T10:15:30Z",
            "priority_score": "urgent"
        })));
        assert!(matches!(result.unwrap_err(), ValidationError::NonFiniteScore(_)));
    }

    #[test]
    fn deserializes_through_validation() {
        let parsed: Result<Patient, _> = serde_json::from_value(json!({"name": "No Id"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn patch_never_touches_identity_or_completion() {
        let id = PatientId::new("9".into()).unwrap();
        let mut patient = Patient::new(id, "Ann", 2.0);
        let arrival = patient.arrival_time;
        let patch = PatientPatch {
            name: Some("Anne".into()),
            priority_score: Some(f64::NAN),
            ..Default::default()
        };
        patch.apply_to(&mut patient);
        assert_eq!(patient.name, "Anne");
        assert_eq!(patient.priority_score, 2.0);
        assert_eq!(patient.id, id);
        assert_eq!(patient.arrival_time, arrival);
        assert!(patient.completed_at.is_none());
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let patch = PatientPatch::default();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({}));
    }

    #[test]
    fn full_patch_round_trips_mutable_fields() {
        let id = PatientId::new("1".into()).unwrap();
        let mut source = Patient::new(id, "Bo", 4.5);
        source.priority_level = "Critical".into();
        let mut target = Patient::new(id, "Old", 1.0);
        PatientPatch::from(&source).apply_to(&mut target);
        assert_eq!(target.name, "Bo");
        assert_eq!(target.priority_score, 4.5);
        assert_eq!(target.priority_level, "Critical");
    }
}

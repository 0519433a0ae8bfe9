// server/src/cli/fields.rs

// `field=value` arguments of the `add` and `update` commands.

use models::medical::vitals::{BLOOD_PRESSURE, HEART_RATE, OXYGEN_SATURATION, TEMPERATURE};
use models::{NewPatient, PatientPatch, Vitals, WorklistError, WorklistResult};

/// One parsed `field=value` pair.
#[derive(Debug, Clone, PartialEq)]
enum Field {
    Name(String),
    Age(u32),
    Gender(String),
    Symptoms(String),
    History(String),
    Vital(String, String),
    Score(f64),
    Level(String),
}

fn vital_key(key: &str) -> Option<&'static str> {
    match key {
        "bp" | "blood_pressure" => Some(BLOOD_PRESSURE),
        "hr" | "heart_rate" => Some(HEART_RATE),
        "temp" | "temperature" => Some(TEMPERATURE),
        "spo2" | "o2" | "oxygen_saturation" => Some(OXYGEN_SATURATION),
        _ => None,
    }
}

fn parse_field(pair: &str) -> WorklistResult<Field> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| WorklistError::InvalidInput(format!("expected field=value, got '{}'", pair)))?;
    let key = key.trim().to_lowercase();
    let value = value.trim().to_string();

    if let Some(vital) = vital_key(&key) {
        return Ok(Field::Vital(vital.to_string(), value));
    }
    if let Some(custom) = key.strip_prefix("vital.") {
        if custom.is_empty() {
            return Err(WorklistError::InvalidInput("vital name must not be empty".to_string()));
        }
        return Ok(Field::Vital(custom.to_string(), value));
    }

    match key.as_str() {
        "name" => Ok(Field::Name(value)),
        "age" => value
            .parse::<u32>()
            .map(Field::Age)
            .map_err(|_| WorklistError::InvalidInput(format!("age must be a whole number, got '{}'", value))),
        "gender" => Ok(Field::Gender(value)),
        "symptoms" => Ok(Field::Symptoms(value)),
        "history" | "medical_history" => Ok(Field::History(value)),
        "score" | "priority_score" => match value.parse::<f64>() {
            Ok(score) if score.is_finite() => Ok(Field::Score(score)),
            _ => Err(WorklistError::InvalidInput(format!("score must be a finite number, got '{}'", value))),
        },
        "level" | "priority_level" => Ok(Field::Level(value)),
        other => Err(WorklistError::InvalidInput(format!("unknown field '{}'", other))),
    }
}

/// Builds an intake form. Priority is assigned by the collaborator, so
/// `score` and `level` are refused here.
pub fn parse_new_patient(pairs: &[String]) -> WorklistResult<NewPatient> {
    let mut patient = NewPatient::default();
    for pair in pairs {
        match parse_field(pair)? {
            Field::Name(name) => patient.name = name,
            Field::Age(age) => patient.age = age,
            Field::Gender(gender) => patient.gender = gender,
            Field::Symptoms(symptoms) => patient.symptoms = symptoms,
            Field::History(history) => patient.medical_history = history,
            Field::Vital(name, value) => patient.vitals.insert_text(name, &value),
            Field::Score(_) | Field::Level(_) => {
                return Err(WorklistError::InvalidInput(
                    "priority is assigned by the service when a patient is added".to_string(),
                ));
            }
        }
    }
    if patient.name.trim().is_empty() {
        return Err(WorklistError::InvalidInput("add needs at least name=<name>".to_string()));
    }
    Ok(patient)
}

/// Builds an edit. Vitals given here replace the whole vitals map of the
/// patient, starting from `current`.
pub fn parse_patch(pairs: &[String], current: Option<&Vitals>) -> WorklistResult<PatientPatch> {
    let mut patch = PatientPatch::default();
    let mut vitals: Option<Vitals> = None;
    for pair in pairs {
        match parse_field(pair)? {
            Field::Name(name) => patch.name = Some(name),
            Field::Age(age) => patch.age = Some(age),
            Field::Gender(gender) => patch.gender = Some(gender),
            Field::Symptoms(symptoms) => patch.symptoms = Some(symptoms),
            Field::History(history) => patch.medical_history = Some(history),
            Field::Score(score) => patch.priority_score = Some(score),
            Field::Level(level) => patch.priority_level = Some(level),
            Field::Vital(name, value) => vitals
                .get_or_insert_with(|| current.cloned().unwrap_or_default())
                .insert_text(name, &value),
        }
    }
    patch.vitals = vitals;
    if patch.is_empty() {
        return Err(WorklistError::InvalidInput("update needs at least one field=value".to_string()));
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::VitalValue;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn builds_new_patient_with_vitals() {
        let patient = parse_new_patient(&args(&["name=Ann Lee", "age=52", "bp=140/90", "hr=88", "temp="])).unwrap();
        assert_eq!(patient.name, "Ann Lee");
        assert_eq!(patient.age, 52);
        assert_eq!(patient.vitals.get(BLOOD_PRESSURE), Some(&VitalValue::Text("140/90".into())));
        assert_eq!(patient.vitals.get(HEART_RATE), Some(&VitalValue::Number(88.0)));
        assert!(patient.vitals.get(TEMPERATURE).is_none());
    }

    #[test]
    fn new_patient_needs_a_name_and_no_priority() {
        assert!(matches!(parse_new_patient(&args(&["age=3"])), Err(WorklistError::InvalidInput(_))));
        assert!(matches!(
            parse_new_patient(&args(&["name=X", "score=9"])),
            Err(WorklistError::InvalidInput(_))
        ));
    }

    #[test]
    fn patch_keeps_existing_vitals() {
        let mut current = Vitals::new();
        current.insert_text(HEART_RATE, "70");
        let patch = parse_patch(&args(&["spo2=95", "level=High"]), Some(&current)).unwrap();
        let vitals = patch.vitals.unwrap();
        assert_eq!(vitals.len(), 2);
        assert_eq!(patch.priority_level.as_deref(), Some("High"));
        assert!(patch.name.is_none());
    }

    #[test]
    fn rejects_malformed_pairs() {
        for bad in ["age=old", "score=NaN", "colour=blue", "noequals", "vital.=3"] {
            assert!(parse_patch(&args(&[bad]), None).is_err(), "{} should be rejected", bad);
        }
        assert!(parse_patch(&[], None).is_err());
    }
}

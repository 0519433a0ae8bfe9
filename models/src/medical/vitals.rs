// models/src/medical/vitals.rs
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BLOOD_PRESSURE: &str = "blood_pressure";
pub const HEART_RATE: &str = "heart_rate";
pub const TEMPERATURE: &str = "temperature";
pub const OXYGEN_SATURATION: &str = "oxygen_saturation";

/// A single vital sign reading. Collaborators send numbers for most vitals
/// and free text for composite ones such as blood pressure ("160/100").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VitalValue {
    Number(f64),
    Text(String),
}

impl VitalValue {
    /// Converts a raw JSON value, returning `None` for the placeholder shapes
    /// (`null`, `""`, `"N/A"`) that mean "not measured".
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).map(VitalValue::Number),
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() || s.eq_ignore_ascii_case("n/a") {
                    None
                } else {
                    Some(VitalValue::Text(s.to_string()))
                }
            }
            Value::Bool(b) => Some(VitalValue::Text(b.to_string())),
            other => Some(VitalValue::Text(other.to_string())),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            VitalValue::Number(n) => Some(*n),
            VitalValue::Text(s) => s.parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

const MAX_INTEGRAL: f64 = 9.0e18;

impl fmt::Display for VitalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral readings print without a fraction while they fit in i64.
            VitalValue::Number(n) if n.fract() == 0.0 && n.abs() < MAX_INTEGRAL => write!(f, "{}", *n as i64),
            VitalValue::Number(n) => write!(f, "{}", n),
            VitalValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Sparse vitals: absent keys were never measured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vitals(BTreeMap<String, VitalValue>);

impl Vitals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds vitals from an untyped JSON object, dropping placeholders.
    /// Anything that is not an object yields empty vitals.
    pub fn from_json(value: &Value) -> Self {
        let mut vitals = Vitals::new();
        if let Value::Object(map) = value {
            for (name, raw) in map {
                if let Some(reading) = VitalValue::from_json(raw) {
                    vitals.0.insert(name.clone(), reading);
                }
            }
        }
        vitals
    }

    pub fn insert(&mut self, name: impl Into<String>, value: VitalValue) -> Option<VitalValue> {
        self.0.insert(name.into(), value)
    }

    /// Parses a typed-in reading: finite numbers stay numbers, blanks are
    /// dropped and anything else (including "nan" and "inf") is kept as text.
    pub fn insert_text(&mut self, name: impl Into<String>, text: &str) {
        let name = name.into();
        let text = text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("n/a") {
            self.0.remove(&name);
        } else if let Some(n) = text.parse::<f64>().ok().filter(|n| n.is_finite()) {
            self.0.insert(name, VitalValue::Number(n));
        } else {
            self.0.insert(name, VitalValue::Text(text.to_string()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&VitalValue> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VitalValue)> {
        self.0.iter()
    }

    /// One-line summary, e.g. `BP 160/100, HR 95`.
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| {
                let label = match name.as_str() {
                    BLOOD_PRESSURE => "BP",
                    HEART_RATE => "HR",
                    TEMPERATURE => "Temp",
                    OXYGEN_SATURATION => "O2 Sat",
                    other => other,
                };
                format!("{} {}", label, value)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// models/src/medical/intake.rs
use serde::{Deserialize, Serialize};

use crate::errors::{WorklistError, WorklistResult};
use crate::medical::patient::Patient;
use crate::medical::vitals::Vitals;

pub const GENERATION_FALLBACK_ERROR: &str =
    "could not create patient from description, try being more specific";

/// Body of `POST /patients`. The collaborator assigns id, arrival time and
/// priority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub symptoms: String,
    pub vitals: Vitals, // sparse, blank readings already stripped
    pub medical_history: String,
}

/// Body of `POST /generate-patient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub description: String,
}

/// Reply of `POST /generate-patient`. A malformed `patient` fails the whole
/// decode rather than producing a partial record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default)]
    pub patient: Option<Patient>,
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerateResponse {
    /// Collapses the reply into the patient or a `CollaboratorFailure`.
    pub fn into_result(self) -> WorklistResult<Patient> {
        match (self.success, self.patient) {
            (true, Some(patient)) => Ok(patient),
            (true, None) => Err(WorklistError::collaborator(
                "generation reported success without a patient",
            )),
            (false, _) => Err(WorklistError::collaborator(
                self.error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| GENERATION_FALLBACK_ERROR.to_string()),
            )),
        }
    }
}

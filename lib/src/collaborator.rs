// lib/src/collaborator.rs

//! The network service the board depends on, seen as a trait so the engine
//! can be driven by the HTTP client in production and by mocks in tests.

use async_trait::async_trait;

use models::{NewPatient, Patient, PatientId, PatientPatch, WorklistResult};

/// Persistence and generation collaborator. Every failure (transport,
/// non-success status, malformed body) is reported as
/// `WorklistError::CollaboratorFailure`; returned patients are already
/// validated.
#[cfg_attr(any(test, feature = "test-suite"), mockall::automock)]
#[async_trait]
pub trait PatientService: Send + Sync {
    /// `GET /patients`
    async fn list_patients(&self) -> WorklistResult<Vec<Patient>>;

    /// `POST /patients`
    async fn create_patient(&self, patient: NewPatient) -> WorklistResult<Patient>;

    /// `PUT /patients/{id}`
    async fn update_patient(&self, id: PatientId, patch: PatientPatch) -> WorklistResult<Patient>;

    /// `POST /generate-patient`
    async fn generate_patient(&self, description: String) -> WorklistResult<Patient>;
}

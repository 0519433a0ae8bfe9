// lib/src/intake.rs

//! Free-text patient intake. A description goes to the generation
//! collaborator; the patient it returns is appended to the active list as
//! is. Either the whole patient lands or nothing does.

use std::future::Future;
use std::sync::Arc;

use log::{debug, info, warn};

use models::{Patient, PatientId, WorklistError, WorklistResult};

use crate::collaborator::PatientService;
use crate::engine::PatientStore;

pub struct ChatIntake {
    service: Arc<dyn PatientService>,
    in_flight: bool,
}

impl ChatIntake {
    pub fn new(service: Arc<dyn PatientService>) -> Self {
        ChatIntake {
            service,
            in_flight: false,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight
    }

    /// Generates a patient from `description` and appends it to `store`.
    pub async fn submit(&mut self, store: &mut PatientStore, description: &str) -> WorklistResult<PatientId> {
        let description = self.begin(description)?;
        let result = self.request(description).await;
        self.finish(store, result)
    }

    /// Validates the text and claims the single in-flight slot. Returns the
    /// trimmed description to send.
    pub fn begin(&mut self, description: &str) -> WorklistResult<String> {
        let description = description.trim();
        if description.is_empty() {
            return Err(WorklistError::InvalidInput(
                "patient description must not be empty".to_string(),
            ));
        }
        if self.in_flight {
            return Err(WorklistError::InvalidTransition(
                "a patient description is already being processed".to_string(),
            ));
        }
        self.in_flight = true;
        debug!("Submitting patient description ({} chars)", description.len());
        Ok(description.to_string())
    }

    /// The collaborator call, detached from `self` so it can run on its own
    /// task while the board keeps handling events.
    pub fn request(&self, description: String) -> impl Future<Output = WorklistResult<Patient>> + Send + 'static {
        let service = Arc::clone(&self.service);
        async move { service.generate_patient(description).await }
    }

    /// Releases the in-flight slot and applies the outcome. On failure the
    /// store is not touched.
    pub fn finish(&mut self, store: &mut PatientStore, result: WorklistResult<Patient>) -> WorklistResult<PatientId> {
        self.in_flight = false;
        match result {
            Ok(patient) => {
                let id = patient.id;
                store.add_active(patient)?;
                info!("Generated patient {} added to the active list", id);
                Ok(id)
            }
            Err(err) => {
                warn!("Patient generation failed: {}", err);
                Err(err)
            }
        }
    }
}

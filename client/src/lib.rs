// client/src/lib.rs

//! `reqwest` implementation of the patient collaborator.
//!
//! Every failure on the way (connection, timeout, non-success status, a
//! body that does not decode into a valid patient) comes back as
//! `WorklistError::CollaboratorFailure`.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use models::{
    GenerateRequest, GenerateResponse, NewPatient, Patient, PatientId, PatientPatch, WorklistError,
    WorklistResult,
};
use worklist::config::ServiceConfig;
use worklist::PatientService;

#[derive(Debug, Clone)]
pub struct HttpPatientService {
    client: Client,
    base_url: Url,
}

impl HttpPatientService {
    pub fn new(base_url: &str, timeout: Duration) -> WorklistResult<Self> {
        // A trailing slash makes `join` append instead of replacing the
        // last segment.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| WorklistError::Config(format!("invalid service base url '{}': {}", base_url, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WorklistError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(HttpPatientService { client, base_url })
    }

    pub fn from_config(config: &ServiceConfig) -> WorklistResult<Self> {
        Self::new(&config.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> WorklistResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| WorklistError::Config(format!("service base url {} cannot carry a path", self.base_url)))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn exchange(&self, request: RequestBuilder) -> WorklistResult<Answer> {
        let response = request
            .send()
            .await
            .map_err(|e| WorklistError::collaborator(format!("request failed: {}", e)))?;
        let status = response.status();
        let url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| WorklistError::collaborator(format!("failed to read response from {}: {}", url, e)))?;
        if status.is_success() {
            debug!("{} answered {} ({} bytes)", url, status, body.len());
        } else {
            warn!("{} answered {}", url, status);
        }
        Ok(Answer { status, url, body: body.to_vec() })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> WorklistResult<T> {
        let answer = self.exchange(request).await?;
        if !answer.status.is_success() {
            return Err(answer.status_failure());
        }
        Ok(serde_json::from_slice(&answer.body)?)
    }
}

/// A response read to the end, before its status is judged.
struct Answer {
    status: StatusCode,
    url: Url,
    body: Vec<u8>,
}

impl Answer {
    fn status_failure(&self) -> WorklistError {
        WorklistError::collaborator(format!(
            "{} answered {}: {}",
            self.url,
            self.status,
            String::from_utf8_lossy(&self.body).trim()
        ))
    }
}

#[async_trait]
impl PatientService for HttpPatientService {
    async fn list_patients(&self) -> WorklistResult<Vec<Patient>> {
        let url = self.endpoint(&["patients"])?;
        self.send(self.client.get(url)).await
    }

    async fn create_patient(&self, patient: NewPatient) -> WorklistResult<Patient> {
        let url = self.endpoint(&["patients"])?;
        self.send(self.client.post(url).json(&patient)).await
    }

    async fn update_patient(&self, id: PatientId, patch: PatientPatch) -> WorklistResult<Patient> {
        let url = self.endpoint(&["patients", id.as_str()])?;
        let updated: Patient = self.send(self.client.put(url).json(&patch)).await?;
        if updated.id != id {
            return Err(WorklistError::collaborator(format!(
                "update of patient {} answered with patient {}",
                id, updated.id
            )));
        }
        Ok(updated)
    }

    async fn generate_patient(&self, description: String) -> WorklistResult<Patient> {
        let url = self.endpoint(&["generate-patient"])?;
        let answer = self
            .exchange(self.client.post(url).json(&GenerateRequest { description }))
            .await?;
        if answer.status.is_success() {
            let reply: GenerateResponse = serde_json::from_slice(&answer.body)?;
            return reply.into_result();
        }
        // Rejected descriptions come back as 4xx/5xx with the usual
        // `{success: false, error}` body.
        match serde_json::from_slice::<GenerateResponse>(&answer.body) {
            Ok(reply) if !reply.success => reply.into_result(),
            _ => Err(answer.status_failure()),
        }
    }
}

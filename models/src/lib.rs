// models/src/lib.rs

//! Shared types for the patient worklist: the patient record and its wire
//! shapes, the two list identities, the ordering mode, and the error
//! taxonomy every other crate in the workspace speaks.

pub mod errors;
pub mod identifiers;
pub mod lists;
pub mod medical;

pub use errors::{ValidationError, ValidationResult, WorklistError, WorklistResult};
pub use identifiers::PatientId;
pub use lists::{ListId, OrderingMode};
pub use medical::{
    GenerateRequest, GenerateResponse, NewPatient, Patient, PatientPatch, PriorityClass,
    RawPatient, VitalValue, Vitals,
};

// models/src/medical/mod.rs

pub mod intake;
pub mod patient;
pub mod triage;
pub mod vitals;

pub use intake::{GenerateRequest, GenerateResponse, NewPatient};
pub use patient::{Patient, PatientPatch, RawPatient};
pub use triage::PriorityClass;
pub use vitals::{VitalValue, Vitals};

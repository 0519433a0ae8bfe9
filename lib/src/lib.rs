// lib/src/lib.rs

//! Worklist engine: the ordering policy, the patient store, the drag
//! session state machine, chat intake and the event loop that ties them to
//! the persistence collaborator.

pub mod board;
pub mod collaborator;
pub mod config;
pub mod engine;
pub mod intake;
pub mod runtime;

pub use models::{
    ListId, NewPatient, OrderingMode, Patient, PatientId, PatientPatch, WorklistError, WorklistResult,
};

pub use crate::board::{Board, LoadSummary, Notice, ResponseOutcome, Severity, Ticket};
pub use crate::collaborator::PatientService;
pub use crate::config::{load_worklist_config, WorklistConfig};
pub use crate::engine::{compute_display_order, DragCommand, DragController, DragStatus, PatientStore};
pub use crate::intake::ChatIntake;
pub use crate::runtime::{BoardEvent, BoardRuntime, Completion, UserCommand};

// lib/src/engine/mod.rs

pub mod drag_session;
pub mod ordering;
pub mod patient_store;

// Public re-exports
pub use drag_session::{DragCommand, DragController, DragSession, DragStatus, HoverTarget};
pub use ordering::{compute_display_order, storage_index_of_display};
pub use patient_store::{PatientStore, Residency};

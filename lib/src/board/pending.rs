// lib/src/board/pending.rs

//! Requests that have left for the collaborator and not come back yet,
//! together with what the board looked like when they left.

use std::collections::HashMap;
use std::fmt;

use models::PatientId;

use crate::engine::Residency;

/// Correlates a collaborator response with the request that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PendingRequest {
    Load,
    Create,
    /// Applies only if the patient is still in `expected` when the response
    /// lands.
    Update { patient_id: PatientId, expected: Residency },
}

#[derive(Debug, Default)]
pub struct PendingRequests {
    entries: HashMap<Ticket, PendingRequest>,
    next: u64,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, request: PendingRequest) -> Ticket {
        self.next += 1;
        let ticket = Ticket(self.next);
        self.entries.insert(ticket, request);
        ticket
    }

    pub fn take(&mut self, ticket: Ticket) -> Option<PendingRequest> {
        self.entries.remove(&ticket)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_load(&self) -> bool {
        self.entries.values().any(|r| matches!(r, PendingRequest::Load))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_are_unique_and_single_use() {
        let mut pending = PendingRequests::new();
        let a = pending.insert(PendingRequest::Create);
        let b = pending.insert(PendingRequest::Load);
        assert_ne!(a, b);
        assert!(pending.has_load());
        assert_eq!(pending.take(b), Some(PendingRequest::Load));
        assert_eq!(pending.take(b), None);
        assert!(!pending.has_load());
        assert_eq!(pending.len(), 1);
    }
}

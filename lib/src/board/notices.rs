// lib/src/board/notices.rs

use std::fmt;

use chrono::{DateTime, Utc};
use log::{error, info, warn};

use models::WorklistError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning, // domain error, the operation was a no-op
    Error,   // collaborator failure
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A message shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Notices {
    entries: Vec<Notice>,
    next_id: u64,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let notice = Notice {
            id: self.next_id,
            severity,
            message: message.into(),
            raised_at: Utc::now(),
        };
        match severity {
            Severity::Info => info!("Notice {}: {}", notice.id, notice.message),
            Severity::Warning => warn!("Notice {}: {}", notice.id, notice.message),
            Severity::Error => error!("Notice {}: {}", notice.id, notice.message),
        }
        self.entries.push(notice);
        self.next_id
    }

    pub fn report(&mut self, err: &WorklistError) -> u64 {
        let severity = if err.is_domain() {
            Severity::Warning
        } else {
            Severity::Error
        };
        self.push(severity, err.to_string())
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        self.entries.len() != before
    }

    pub fn dismiss_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

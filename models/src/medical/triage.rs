// models/src/medical/triage.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// Presentation bucket for the collaborator's opaque `priority_level` label.
/// Never consulted for ordering; the score alone drives automatic mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriorityClass {
    VeryLow,
    Low,
    Medium,
    High,
    Critical,
}

impl PriorityClass {
    /// Case-insensitive substring match on the label, e.g. "Critical",
    /// "High Priority", "Very Low". Unrecognised labels such as "Pending"
    /// fall into `VeryLow`.
    pub fn from_level(level: &str) -> Self {
        let level = level.to_lowercase();
        if level.contains("critical") {
            PriorityClass::Critical
        } else if level.contains("high") {
            PriorityClass::High
        } else if level.contains("medium") {
            PriorityClass::Medium
        } else if level.contains("very low") || level.contains("very-low") {
            PriorityClass::VeryLow
        } else if level.contains("low") {
            PriorityClass::Low
        } else {
            PriorityClass::VeryLow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityClass::VeryLow => "very-low",
            PriorityClass::Low => "low",
            PriorityClass::Medium => "medium",
            PriorityClass::High => "high",
            PriorityClass::Critical => "critical",
        }
    }
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::PriorityClass;

    #[test]
    fn classifies_collaborator_labels() {
        assert_eq!(PriorityClass::from_level("Critical"), PriorityClass::Critical);
        assert_eq!(PriorityClass::from_level("HIGH"), PriorityClass::High);
        assert_eq!(PriorityClass::from_level("Medium"), PriorityClass::Medium);
        assert_eq!(PriorityClass::from_level("Low"), PriorityClass::Low);
        assert_eq!(PriorityClass::from_level("Very Low"), PriorityClass::VeryLow);
        assert_eq!(PriorityClass::from_level("Pending"), PriorityClass::VeryLow);
    }

    #[test]
    fn classes_order_by_urgency() {
        assert!(PriorityClass::Critical > PriorityClass::High);
        assert!(PriorityClass::Low > PriorityClass::VeryLow);
    }
}

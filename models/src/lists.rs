// models/src/lists.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two lists a patient can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListId {
    Active,
    Completed,
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListId::Active => write!(f, "active"),
            ListId::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for ListId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" | "a" => Ok(ListId::Active),
            "completed" | "done" | "c" => Ok(ListId::Completed),
            _ => Err(format!("unknown list: {}", s)),
        }
    }
}

/// How the active list is projected for display. Toggling the mode never
/// touches storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingMode {
    /// Sorted by priority score, highest first.
    #[default]
    Automatic,
    /// Storage order as arranged by the user.
    Manual,
}

impl OrderingMode {
    pub fn toggled(self) -> Self {
        match self {
            OrderingMode::Automatic => OrderingMode::Manual,
            OrderingMode::Manual => OrderingMode::Automatic,
        }
    }
}

impl fmt::Display for OrderingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingMode::Automatic => write!(f, "automatic"),
            OrderingMode::Manual => write!(f, "manual"),
        }
    }
}

impl FromStr for OrderingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "automatic" | "auto" => Ok(OrderingMode::Automatic),
            "manual" => Ok(OrderingMode::Manual),
            _ => Err(format!("unknown ordering mode: {}", s)),
        }
    }
}

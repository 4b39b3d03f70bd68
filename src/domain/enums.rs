use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a status or priority label is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
    expected: String,
}

fn expected_tags(tags: impl Iterator<Item = &'static str>) -> String {
    tags.collect::<Vec<_>>().join(", ")
}

/// Lifecycle status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    Complete,
    Cancel,
}

impl Status {
    /// Parse status from a label like "Pending" (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "COMPLETE" => Some(Self::Complete),
            "CANCEL" => Some(Self::Cancel),
            _ => None,
        }
    }

    /// Label used in storage and on screen
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Complete => "Complete",
            Self::Cancel => "Cancel",
        }
    }

    /// Whether the task still needs doing
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn all() -> &'static [Status] {
        &[Status::Pending, Status::Complete, Status::Cancel]
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_tag())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ParseEnumError {
            kind: "status",
            value: s.to_string(),
            expected: expected_tags(Self::all().iter().map(Status::to_tag)),
        })
    }
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parse priority from a label like "High" (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }

    /// Label used in storage and on screen
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn all() -> &'static [Priority] {
        &[Priority::Low, Priority::Medium, Priority::High]
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_tag())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ParseEnumError {
            kind: "priority",
            value: s.to_string(),
            expected: expected_tags(Self::all().iter().map(Priority::to_tag)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_tag() {
        assert_eq!(Status::from_tag("Pending"), Some(Status::Pending));
        assert_eq!(Status::from_tag("COMPLETE"), Some(Status::Complete));
        assert_eq!(Status::from_tag("cancel"), Some(Status::Cancel));
        assert_eq!(Status::from_tag("done"), None);
    }

    #[test]
    fn test_status_tags_round_trip() {
        for status in Status::all() {
            assert_eq!(Status::from_tag(status.to_tag()), Some(*status));
        }
    }

    #[test]
    fn test_priority_from_str_reports_expected_values() {
        assert_eq!("medium".parse::<Priority>(), Ok(Priority::Medium));

        let err = "urgent".parse::<Priority>().unwrap_err();
        assert!(err.to_string().contains("Low, Medium, High"));
    }

    #[test]
    fn test_defaults_match_new_task() {
        assert_eq!(Status::default(), Status::Pending);
        assert_eq!(Priority::default(), Priority::Low);
        assert!(Status::Pending.is_open());
        assert!(!Status::Cancel.is_open());
    }

    #[test]
    fn test_serialized_labels() {
        assert_eq!(serde_json::to_string(&Status::Complete).unwrap(), "\"Complete\"");
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"High\"");
    }
}

use super::datetime::Timestamp;
use super::enums::{Priority, Status};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a stored task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Task content before the store has given it an identity
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub start_date: Timestamp,
    pub due_date: Timestamp,
    pub location: Location,
}

impl NewTask {
    /// Attach an identity, producing the record shape that gets persisted
    pub fn into_record(self, id: TaskId) -> TaskRecord {
        TaskRecord {
            id,
            name: self.name,
            description: self.description,
            status: self.status,
            priority: self.priority,
            start_date: self.start_date,
            due_date: self.due_date,
            location: self.location,
        }
    }
}

/// A persisted task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Assigned by the store at creation, never changed afterwards
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub start_date: Timestamp,
    pub due_date: Timestamp,
    pub location: Location,
}

impl TaskRecord {
    /// Content of this record without its identity
    #[cfg(test)]
    pub fn content(&self) -> NewTask {
        NewTask {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            start_date: self.start_date,
            due_date: self.due_date,
            location: self.location,
        }
    }

    /// Check the invariants every stored record must satisfy
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.description.trim().is_empty()
            && self.location.latitude.is_finite()
            && self.location.longitude.is_finite()
    }
}

use super::datetime::{self, Timestamp};
use super::enums::{Priority, Status};
use super::record::TaskRecord;
use chrono::{Duration, NaiveDate, NaiveTime};

pub const DEFAULT_NAME: &str = "New Task";
pub const DEFAULT_DESCRIPTION: &str = "New task description";

/// A single edit coming from the form, one variant per field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Name(String),
    Description(String),
    Status(Status),
    Priority(Priority),
    /// Date picker for the start; keeps the start's current time-of-day
    StartDate(NaiveDate),
    /// Time picker for the start
    StartTime(NaiveTime),
    DueDate(NaiveDate),
    DueTime(NaiveTime),
    /// Raw text, validated on submit
    Latitude(String),
    Longitude(String),
}

/// Working copy of a task while a form is open.
///
/// Date and time are held as independent sub-values and coordinates as raw
/// text; nothing here is checked until the form is submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub name: String,
    pub description: String,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub start_date: Option<Timestamp>,
    pub start_time: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub due_time: Option<Timestamp>,
    pub latitude: String,
    pub longitude: String,
}

impl Draft {
    /// Draft shown when the create form opens: placeholders, start at `now`, due a day later
    pub fn for_new(now: Timestamp) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            status: Some(Status::default()),
            priority: Some(Priority::default()),
            start_date: Some(now),
            start_time: None,
            due_date: Some(now + Duration::days(1)),
            due_time: None,
            latitude: String::new(),
            longitude: String::new(),
        }
    }

    /// Draft seeded from a stored record for the edit form
    pub fn from_record(record: &TaskRecord) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone(),
            status: Some(record.status),
            priority: Some(record.priority),
            start_date: Some(record.start_date),
            start_time: Some(record.start_date),
            due_date: Some(record.due_date),
            due_time: Some(record.due_date),
            latitude: record.location.latitude.to_string(),
            longitude: record.location.longitude.to_string(),
        }
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(name) => self.name = name,
            FieldEdit::Description(description) => self.description = description,
            FieldEdit::Status(status) => self.status = Some(status),
            FieldEdit::Priority(priority) => self.priority = Some(priority),
            FieldEdit::StartDate(date) => {
                self.start_date = Some(datetime::pick_date(self.start_date, date));
            }
            FieldEdit::StartTime(time) => {
                let anchor = self.start_time.or(self.start_date);
                self.start_time = Some(datetime::pick_time(anchor, time));
            }
            FieldEdit::DueDate(date) => {
                self.due_date = Some(datetime::pick_date(self.due_date, date));
            }
            FieldEdit::DueTime(time) => {
                let anchor = self.due_time.or(self.due_date);
                self.due_time = Some(datetime::pick_time(anchor, time));
            }
            FieldEdit::Latitude(text) => self.latitude = text,
            FieldEdit::Longitude(text) => self.longitude = text,
        }
    }
}

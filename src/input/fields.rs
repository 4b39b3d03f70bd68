use crate::domain::{FieldEdit, Priority, Status};
use chrono::{NaiveDate, NaiveTime};
use clap::Args;

/// Field values a form submission can carry; unset flags leave the field alone
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FieldArgs {
    /// Task name
    #[arg(long)]
    pub name: Option<String>,
    /// Task description
    #[arg(long)]
    pub description: Option<String>,
    /// Pending, Complete or Cancel
    #[arg(long)]
    pub status: Option<Status>,
    /// Low, Medium or High
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Start date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,
    /// Start time (HH:MM or HH:MM:SS)
    #[arg(long, value_parser = parse_time)]
    pub start_time: Option<NaiveTime>,
    /// Due date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub due_date: Option<NaiveDate>,
    /// Due time (HH:MM or HH:MM:SS)
    #[arg(long, value_parser = parse_time)]
    pub due_time: Option<NaiveTime>,
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<String>,
    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<String>,
}

impl FieldArgs {
    /// Field edits in form order
    pub fn into_edits(self) -> Vec<FieldEdit> {
        let mut edits = Vec::new();
        if let Some(name) = self.name {
            edits.push(FieldEdit::Name(name));
        }
        if let Some(description) = self.description {
            edits.push(FieldEdit::Description(description));
        }
        if let Some(status) = self.status {
            edits.push(FieldEdit::Status(status));
        }
        if let Some(priority) = self.priority {
            edits.push(FieldEdit::Priority(priority));
        }
        // Date before time so a time edit anchors on the newly picked date
        if let Some(date) = self.start_date {
            edits.push(FieldEdit::StartDate(date));
        }
        if let Some(time) = self.start_time {
            edits.push(FieldEdit::StartTime(time));
        }
        if let Some(date) = self.due_date {
            edits.push(FieldEdit::DueDate(date));
        }
        if let Some(time) = self.due_time {
            edits.push(FieldEdit::DueTime(time));
        }
        if let Some(latitude) = self.latitude {
            edits.push(FieldEdit::Latitude(latitude));
        }
        if let Some(longitude) = self.longitude {
            edits.push(FieldEdit::Longitude(longitude));
        }
        edits
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date format. Use YYYY-MM-DD: {}", e))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, String> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| format!("Invalid time format. Use HH:MM or HH:MM:SS: {}", e))
}

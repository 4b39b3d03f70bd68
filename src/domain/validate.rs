use super::datetime::combine;
use super::draft::Draft;
use serde::{Deserialize, Serialize};

/// Why a draft cannot be committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// A required field is empty or unset
    MissingFields,
    /// Latitude or longitude is not a usable number
    InvalidCoordinates,
    /// The combined due timestamp precedes the combined start timestamp
    DueBeforeStart,
}

impl InvalidReason {
    /// Fixed user-facing message for this reason
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingFields => "Please fill in all fields before saving.",
            Self::InvalidCoordinates => "Invalid latitude or longitude values.",
            Self::DueBeforeStart => "Due date cannot be earlier than start date.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(InvalidReason),
}

/// Optional rules on top of the presence and numeric checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Reject drafts whose due timestamp is before their start timestamp
    #[serde(default = "enabled")]
    pub require_due_after_start: bool,
    /// Restrict latitude to ±90 and longitude to ±180
    #[serde(default = "enabled")]
    pub enforce_coordinate_range: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            require_due_after_start: true,
            enforce_coordinate_range: true,
        }
    }
}

impl ValidationRules {
    /// Only the presence and numeric checks
    #[cfg(test)]
    pub fn permissive() -> Self {
        Self {
            require_due_after_start: false,
            enforce_coordinate_range: false,
        }
    }
}

/// Check a draft in order: presence, then coordinates, then date ordering
pub fn validate(draft: &Draft, rules: &ValidationRules) -> ValidationResult {
    let present = !is_blank(&draft.name)
        && !is_blank(&draft.description)
        && draft.status.is_some()
        && draft.priority.is_some()
        && draft.start_date.is_some()
        && draft.due_date.is_some()
        && !is_blank(&draft.latitude)
        && !is_blank(&draft.longitude);
    if !present {
        return ValidationResult::Invalid(InvalidReason::MissingFields);
    }

    let coordinates = parse_coordinate(&draft.latitude)
        .zip(parse_coordinate(&draft.longitude))
        .filter(|&(lat, lng)| !rules.enforce_coordinate_range || in_range(lat, lng));
    if coordinates.is_none() {
        return ValidationResult::Invalid(InvalidReason::InvalidCoordinates);
    }

    if rules.require_due_after_start {
        let start = combine(draft.start_date, draft.start_time);
        let due = combine(draft.due_date, draft.due_time);
        if let (Some(start), Some(due)) = (start, due) {
            if due < start {
                return ValidationResult::Invalid(InvalidReason::DueBeforeStart);
            }
        }
    }

    ValidationResult::Valid
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Parse decimal-degree text; `None` unless the value is a finite number
pub fn parse_coordinate(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn in_range(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

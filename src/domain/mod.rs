pub mod datetime;
pub mod draft;
pub mod enums;
pub mod record;
pub mod validate;

pub use datetime::format_timestamp;
pub use draft::{Draft, FieldEdit};
pub use enums::{Priority, Status};
pub use record::{Location, NewTask, TaskId, TaskRecord};
pub use validate::{parse_coordinate, validate, InvalidReason, ValidationResult, ValidationRules};

pub mod fields;

pub use fields::FieldArgs;

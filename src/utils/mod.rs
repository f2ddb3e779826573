pub mod forms;

pub use forms::{blank_to_none, parse_date_or, parse_field, parse_optional_field, parse_positive_id};

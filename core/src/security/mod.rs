pub mod categories;
pub mod checker;

pub use categories::{classify_operation, is_operation_allowed};
pub use checker::{compile_pattern, test_pattern, validate_pattern, SecurityChecker};

//! mathtermind-core: Error model and validation
//!
//! Implements the `AppError` carrier shared by every layer of the daemon and
//! the declarative validation rules used by request handlers.

pub mod error;
pub mod validation;

pub use error::{AppError, BoxError, ErrorCode, PanicMessage, code_of, is_code};
pub use validation::{
    FieldRules, FieldValue, Rule, RuleError, Validate, ValidationError, ValidationErrors, check,
    validate,
};

//! Request Validation
//!
//! Declared attributes, range/enumeration/realism checks, and the validated
//! record handed to feature encoding.

mod attribute;
mod error;
mod input;
mod validator;

pub use attribute::{AttributeSpec, Constraint, Rule};
pub use error::ValidationError;
pub use input::{RawInput, ValidatedInput, Value};
pub use validator::Validator;

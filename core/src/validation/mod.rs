//! # PARAMETER VALIDATION MODULE
//!
//! **CORE VALIDATION SYSTEM WITH TRAIT-BASED ARCHITECTURE**
//!
//! Every constraint a declaration can carry is a `Validator`. The chain for a
//! declaration is built from its `ParamOptions` in a fixed order and stops at
//! the first failure.
//!
//! ## EVALUATION ORDER
//!
//! 1. **required**
//! 2. **blank**
//! 3. **format**
//! 4. **is**
//! 5. **in / within / range**
//! 6. **min**, **max**
//! 7. **min_length**, **max_length**
//!
//! ## USAGE
//!
//! ```rust
//! use request_params::options::ParamOptions;
//! use request_params::types::Value;
//! use request_params::validation::validate;
//!
//! let options = ParamOptions::new().min(12).max(20);
//! assert!(validate(Some(&Value::Integer(15)), &options).is_ok());
//! assert!(validate(Some(&Value::Integer(5)), &options).is_err());
//! ```

use crate::errors::Failure;
use crate::options::ParamOptions;
use crate::types::Value;

pub mod validators;

pub use validators::{
    Equality, Format, LengthBound, Maximum, Minimum, NotBlank, Required, Within,
};

/// **CORE VALIDATOR TRAIT**
///
/// **GUARANTEE**: MUST NOT panic. Absent values are `None`; every validator
/// except `Required` passes them through.
pub trait Validator {
    /// `Ok` when the value satisfies the check.
    fn validate(&self, value: Option<&Value>) -> Result<(), Failure>;
}

/// **VALIDATION RESULT TYPE ALIAS**
pub type ValidationResult = Result<(), Failure>;

/// **VALIDATOR CHAIN**
///
/// Validators for the options that are set, in evaluation order. Unset
/// options contribute nothing.
pub fn chain(options: &ParamOptions) -> Vec<Box<dyn Validator + '_>> {
    let mut validators: Vec<Box<dyn Validator + '_>> = Vec::new();

    if options.required {
        validators.push(Box::new(Required));
    }
    if options.blank == Some(false) {
        validators.push(Box::new(NotBlank));
    }
    if let Some(pattern) = &options.format {
        validators.push(Box::new(Format::new(pattern)));
    }
    if let Some(expected) = &options.is {
        validators.push(Box::new(Equality::new(expected)));
    }
    if let Some(membership) = &options.within {
        validators.push(Box::new(Within::new(membership)));
    }
    if let Some(bound) = &options.min {
        validators.push(Box::new(Minimum::new(bound)));
    }
    if let Some(bound) = &options.max {
        validators.push(Box::new(Maximum::new(bound)));
    }
    if let Some(length) = options.min_length {
        validators.push(Box::new(LengthBound::min(length)));
    }
    if let Some(length) = options.max_length {
        validators.push(Box::new(LengthBound::max(length)));
    }

    validators
}

/// **VALIDATE** - First violated constraint wins
pub fn validate(value: Option<&Value>, options: &ParamOptions) -> ValidationResult {
    chain(options)
        .iter()
        .try_for_each(|validator| validator.validate(value))
}

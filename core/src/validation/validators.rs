//! # CONCRETE VALIDATOR IMPLEMENTATIONS
//!
//! One `Validator` per declaration constraint. Messages are the ones shown to
//! API clients.

use super::Validator;
use crate::errors::{ErrorKind, Failure};
use crate::options::Membership;
use crate::types::Value;
use regex::Regex;
use std::cmp::Ordering;

// ================================================================================================
// PRESENCE VALIDATORS
// ================================================================================================

/// **REQUIRED** - Fails on absent values
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Validator for Required {
    fn validate(&self, value: Option<&Value>) -> Result<(), Failure> {
        match value {
            Some(_) => Ok(()),
            None => Err(Failure::new(ErrorKind::MissingRequired, "Parameter is required")),
        }
    }
}

/// **NOT BLANK** - Fails on whitespace-only strings and empty collections
#[derive(Debug, Clone, Copy, Default)]
pub struct NotBlank;

impl Validator for NotBlank {
    fn validate(&self, value: Option<&Value>) -> Result<(), Failure> {
        match value {
            Some(v) if v.is_blank() => Err(Failure::new(
                ErrorKind::BlankNotAllowed,
                "Parameter cannot be blank",
            )),
            _ => Ok(()),
        }
    }
}

// ================================================================================================
// SHAPE VALIDATORS
// ================================================================================================

/// **FORMAT** - Pattern match, strings only
#[derive(Debug, Clone)]
pub struct Format<'a> {
    pattern: &'a Regex,
}

impl<'a> Format<'a> {
    /// Check against `pattern`.
    pub fn new(pattern: &'a Regex) -> Self {
        Self { pattern }
    }
}

impl Validator for Format<'_> {
    fn validate(&self, value: Option<&Value>) -> Result<(), Failure> {
        let Some(value) = value else {
            return Ok(());
        };
        let Value::String(s) = value else {
            return Err(Failure::new(
                ErrorKind::NotAString,
                "Parameter should be a string if using the format validation",
            ));
        };

        if self.pattern.is_match(s) {
            Ok(())
        } else {
            Err(Failure::new(
                ErrorKind::FormatMismatch,
                format!("Parameter must match format {}", self.pattern.as_str()),
            ))
        }
    }
}

/// **EQUALITY** - Exact match against a literal
#[derive(Debug, Clone)]
pub struct Equality<'a> {
    expected: &'a Value,
}

impl<'a> Equality<'a> {
    /// Check for equality with `expected`.
    pub fn new(expected: &'a Value) -> Self {
        Self { expected }
    }
}

impl Validator for Equality<'_> {
    fn validate(&self, value: Option<&Value>) -> Result<(), Failure> {
        match value {
            Some(v) if v != self.expected => Err(Failure::new(
                ErrorKind::EqualityMismatch,
                format!("Parameter must be {}", self.expected),
            )),
            _ => Ok(()),
        }
    }
}

/// **WITHIN** - Set membership or interval
#[derive(Debug, Clone)]
pub struct Within<'a> {
    membership: &'a Membership,
}

impl<'a> Within<'a> {
    /// Check for membership.
    pub fn new(membership: &'a Membership) -> Self {
        Self { membership }
    }
}

impl Validator for Within<'_> {
    fn validate(&self, value: Option<&Value>) -> Result<(), Failure> {
        match value {
            Some(v) if !self.membership.contains(v) => Err(Failure::new(
                ErrorKind::OutOfRange,
                format!("Parameter must be within {}", self.membership),
            )),
            _ => Ok(()),
        }
    }
}

// ================================================================================================
// BOUND VALIDATORS
// ================================================================================================

/// **MINIMUM** - Inclusive lower bound
///
/// Values that cannot be ordered against the bound fail.
#[derive(Debug, Clone)]
pub struct Minimum<'a> {
    bound: &'a Value,
}

impl<'a> Minimum<'a> {
    /// Check against a lower bound.
    pub fn new(bound: &'a Value) -> Self {
        Self { bound }
    }
}

impl Validator for Minimum<'_> {
    fn validate(&self, value: Option<&Value>) -> Result<(), Failure> {
        match value.map(|v| v.compare(self.bound)) {
            None | Some(Some(Ordering::Equal | Ordering::Greater)) => Ok(()),
            Some(_) => Err(Failure::new(
                ErrorKind::BelowMinimum,
                format!("Parameter cannot be less than {}", self.bound),
            )),
        }
    }
}

/// **MAXIMUM** - Inclusive upper bound
#[derive(Debug, Clone)]
pub struct Maximum<'a> {
    bound: &'a Value,
}

impl<'a> Maximum<'a> {
    /// Check against an upper bound.
    pub fn new(bound: &'a Value) -> Self {
        Self { bound }
    }
}

impl Validator for Maximum<'_> {
    fn validate(&self, value: Option<&Value>) -> Result<(), Failure> {
        match value.map(|v| v.compare(self.bound)) {
            None | Some(Some(Ordering::Equal | Ordering::Less)) => Ok(()),
            Some(_) => Err(Failure::new(
                ErrorKind::AboveMaximum,
                format!("Parameter cannot be greater than {}", self.bound),
            )),
        }
    }
}

/// **LENGTH BOUND** - Lower or upper bound on string/array/hash length
#[derive(Debug, Clone, Copy)]
pub enum LengthBound {
    /// At least this many elements or characters.
    Min(usize),
    /// At most this many elements or characters.
    Max(usize),
}

impl LengthBound {
    /// Lower length bound.
    pub fn min(length: usize) -> Self {
        LengthBound::Min(length)
    }

    /// Upper length bound.
    pub fn max(length: usize) -> Self {
        LengthBound::Max(length)
    }
}

impl Validator for LengthBound {
    fn validate(&self, value: Option<&Value>) -> Result<(), Failure> {
        let Some(value) = value else {
            return Ok(());
        };
        let length = value.length();

        match *self {
            LengthBound::Min(min) if length.map_or(true, |len| len < min) => Err(Failure::new(
                ErrorKind::TooShort,
                format!("Parameter cannot have length less than {}", min),
            )),
            LengthBound::Max(max) if length.map_or(true, |len| len > max) => Err(Failure::new(
                ErrorKind::TooLong,
                format!("Parameter cannot have length greater than {}", max),
            )),
            _ => Ok(()),
        }
    }
}

// ================================================================================================
// UNIT TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParamMap;

    mod presence_tests {
        use super::*;

        #[test]
        fn test_required() {
            assert!(Required.validate(Some(&Value::from("foo"))).is_ok());
            let err = Required.validate(None).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MissingRequired);
            assert_eq!(err.message, "Parameter is required");
        }

        #[test]
        fn test_not_blank() {
            for blank in [
                Value::from(""),
                Value::from("   "),
                Value::Array(vec![]),
                Value::Hash(ParamMap::new()),
            ] {
                let err = NotBlank.validate(Some(&blank)).unwrap_err();
                assert_eq!(err.message, "Parameter cannot be blank");
            }
            assert!(NotBlank.validate(Some(&Value::from("x"))).is_ok());
            assert!(NotBlank.validate(Some(&Value::Boolean(false))).is_ok());
        }
    }

    mod shape_tests {
        use super::*;

        #[test]
        fn test_format_match() {
            let pattern = Regex::new("^hello").unwrap();
            let validator = Format::new(&pattern);
            assert!(validator.validate(Some(&Value::from("hello world"))).is_ok());

            let err = validator.validate(Some(&Value::from("world"))).unwrap_err();
            assert_eq!(err.kind, ErrorKind::FormatMismatch);
            assert_eq!(err.message, "Parameter must match format ^hello");
        }

        #[test]
        fn test_format_rejects_non_strings() {
            let pattern = Regex::new("9000").unwrap();
            let err = Format::new(&pattern)
                .validate(Some(&Value::Integer(9000)))
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::NotAString);
        }

        #[test]
        fn test_equality() {
            let expected = Value::from("foo");
            let validator = Equality::new(&expected);
            assert!(validator.validate(Some(&Value::from("foo"))).is_ok());

            let err = validator.validate(Some(&Value::from("bar"))).unwrap_err();
            assert_eq!(err.kind, ErrorKind::EqualityMismatch);
            assert_eq!(err.message, "Parameter must be foo");
        }

        #[test]
        fn test_within_set() {
            let membership = Membership::from(["ASC", "DESC"]);
            let validator = Within::new(&membership);
            assert!(validator.validate(Some(&Value::from("ASC"))).is_ok());

            let err = validator.validate(Some(&Value::from("MISC"))).unwrap_err();
            assert_eq!(err.kind, ErrorKind::OutOfRange);
            assert_eq!(err.message, r#"Parameter must be within ["ASC", "DESC"]"#);
        }

        #[test]
        fn test_within_range() {
            let membership = Membership::from(1..=10);
            let validator = Within::new(&membership);
            assert!(validator.validate(Some(&Value::Integer(10))).is_ok());
            assert_eq!(
                validator.validate(Some(&Value::Integer(20))).unwrap_err().message,
                "Parameter must be within 1..10"
            );
        }
    }

    mod bound_tests {
        use super::*;

        #[test]
        fn test_bounds_are_inclusive() {
            let bound = Value::Integer(12);
            assert!(Minimum::new(&bound).validate(Some(&Value::Integer(12))).is_ok());
            assert!(Maximum::new(&bound).validate(Some(&Value::Integer(12))).is_ok());
        }

        #[test]
        fn test_float_against_integer_bound() {
            let bound = Value::Integer(1);
            assert!(Minimum::new(&bound).validate(Some(&Value::Float(1.5))).is_ok());
            assert!(Maximum::new(&bound).validate(Some(&Value::Float(1.5))).is_err());
        }

        #[test]
        fn test_incomparable_fails() {
            let bound = Value::Integer(1024);
            let err = Maximum::new(&bound)
                .validate(Some(&Value::from("text")))
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::AboveMaximum);
        }

        #[test]
        fn test_length_bounds() {
            let err = LengthBound::min(5)
                .validate(Some(&Value::from("hi")))
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::TooShort);
            assert_eq!(err.message, "Parameter cannot have length less than 5");

            let err = LengthBound::max(10)
                .validate(Some(&Value::from("reallylongstringlongerthanmax")))
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::TooLong);
            assert_eq!(err.message, "Parameter cannot have length greater than 10");

            assert!(LengthBound::max(10).validate(Some(&Value::from("short"))).is_ok());
            assert!(LengthBound::min(2)
                .validate(Some(&Value::from(vec!["a", "b"])))
                .is_ok());
        }

        #[test]
        fn test_length_counts_chars() {
            assert!(LengthBound::max(2).validate(Some(&Value::from("éé"))).is_ok());
        }
    }
}

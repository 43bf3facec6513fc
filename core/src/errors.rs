//! Error types for parameter declarations and parameter sources.

use std::fmt;
use thiserror::Error;

/// **FAILURE TAXONOMY**
///
/// One variant per way a declaration or relational check can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Raw value cannot be parsed as the requested type.
    Coercion,
    /// Absent value on a `required` declaration.
    MissingRequired,
    /// Blank value where blanks are not allowed.
    BlankNotAllowed,
    /// `format` was checked against a value that is not a string.
    NotAString,
    /// String does not match the `format` pattern.
    FormatMismatch,
    /// Value differs from the `is` expectation.
    EqualityMismatch,
    /// Value falls outside the `within` set or range.
    OutOfRange,
    /// Value below `min`.
    BelowMinimum,
    /// Value above `max`.
    AboveMaximum,
    /// Length below `min_length`.
    TooShort,
    /// Length above `max_length`.
    TooLong,
    /// Sub-declaration block used on a parameter that is not a Hash.
    NestedType,
    /// More than one of a `one_of` group is present.
    OneOfViolation,
    /// None of an `any_of` group is present.
    AnyOfViolation,
    /// An `all_or_none_of` group is partly present.
    AllOrNoneViolation,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Coercion => "PARAM_COERCION",
            ErrorKind::MissingRequired => "PARAM_MISSING_REQUIRED",
            ErrorKind::BlankNotAllowed => "PARAM_BLANK_NOT_ALLOWED",
            ErrorKind::NotAString => "PARAM_NOT_A_STRING",
            ErrorKind::FormatMismatch => "PARAM_FORMAT_MISMATCH",
            ErrorKind::EqualityMismatch => "PARAM_EQUALITY_MISMATCH",
            ErrorKind::OutOfRange => "PARAM_OUT_OF_RANGE",
            ErrorKind::BelowMinimum => "PARAM_BELOW_MINIMUM",
            ErrorKind::AboveMaximum => "PARAM_ABOVE_MAXIMUM",
            ErrorKind::TooShort => "PARAM_TOO_SHORT",
            ErrorKind::TooLong => "PARAM_TOO_LONG",
            ErrorKind::NestedType => "PARAM_NESTED_TYPE",
            ErrorKind::OneOfViolation => "PARAM_ONE_OF_VIOLATION",
            ErrorKind::AnyOfViolation => "PARAM_ANY_OF_VIOLATION",
            ErrorKind::AllOrNoneViolation => "PARAM_ALL_OR_NONE_VIOLATION",
        }
    }

    /// True for the kinds raised by group checks rather than single declarations.
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            ErrorKind::OneOfViolation | ErrorKind::AnyOfViolation | ErrorKind::AllOrNoneViolation
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unqualified failure produced by the coercer and the validators.
///
/// Carries no parameter name; `ParamContext` attaches the qualified path and
/// the options in effect when turning it into a [`ParamError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Detail text, not yet tied to a parameter name.
    pub message: String,
}

impl Failure {
    /// Failure with the given kind and detail.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// **PARAMETER ERROR**
///
/// A failed declaration or relational check, qualified with the parameter
/// path it concerns and the error options that were in effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("INVALID PARAMETER: {kind} {param} - {message}")]
pub struct ParamError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Qualified path, e.g. `parent[child]` or `[a, b, c]` for groups.
    pub param: String,
    /// Detail message, keyed by `param` in error bodies.
    pub message: String,
    /// Top-level summary message.
    pub summary: String,
    /// HTTP status used when the error halts the request.
    pub status: u16,
    /// Hand the error to the host instead of halting.
    pub raise: bool,
}

impl ParamError {
    /// Machine-readable code of the underlying kind.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Failures while turning raw request data into a parameter mapping.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Body bytes are not valid UTF-8.
    #[error("INVALID UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Body is not parseable JSON.
    #[error("INVALID JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// JSON body parsed but is not an object.
    #[error("INVALID JSON: expected an object at the top level, got {0}")]
    NotAnObject(&'static str),
}

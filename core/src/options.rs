//! # DECLARATION OPTIONS
//!
//! Typed option bag for `param` declarations and relational checks.

use crate::coercion::{coerce, Delimiters, ParamType};
use crate::errors::{ErrorKind, Failure};
use crate::types::{inspect_list, Value};
use regex::Regex;
use std::fmt;
use std::ops::{Range, RangeInclusive};
use std::str::FromStr;
use thiserror::Error;

/// **DEFAULT VALUE** - Literal or zero-argument generator
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// Fixed value.
    Literal(Value),
    /// Called each time the default is needed.
    Generator(fn() -> Value),
}

impl DefaultValue {
    /// The default for this declaration.
    pub fn resolve(&self) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Generator(generate) => generate(),
        }
    }
}

/// **TRANSFORM REGISTRY**
///
/// Named unary functions applied to a present, coerced value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Uppercase a string.
    Upcase,
    /// Lowercase a string.
    Downcase,
    /// Uppercase the first character, lowercase the rest.
    Capitalize,
    /// Trim surrounding whitespace.
    Strip,
    /// Reverse a string or an array.
    Reverse,
    /// Convert to String.
    ToS,
    /// Convert to Integer.
    ToI,
    /// Convert to Float.
    ToF,
    /// Sort an array of mutually comparable values.
    Sort,
    /// Drop repeated array elements, first occurrence wins.
    Uniq,
}

/// Transform name that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("UNKNOWN TRANSFORM: {0}")]
pub struct UnknownTransform(pub String);

impl Transform {
    /// Registry name, as accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Upcase => "upcase",
            Transform::Downcase => "downcase",
            Transform::Capitalize => "capitalize",
            Transform::Strip => "strip",
            Transform::Reverse => "reverse",
            Transform::ToS => "to_s",
            Transform::ToI => "to_i",
            Transform::ToF => "to_f",
            Transform::Sort => "sort",
            Transform::Uniq => "uniq",
        }
    }

    /// Apply to a present value; fails when the value has the wrong shape.
    pub fn apply(&self, value: Value) -> Result<Value, Failure> {
        let transformed = match (self, value) {
            (Transform::Upcase, Value::String(s)) => Value::String(s.to_uppercase()),
            (Transform::Downcase, Value::String(s)) => Value::String(s.to_lowercase()),
            (Transform::Capitalize, Value::String(s)) => Value::String(capitalize(&s)),
            (Transform::Strip, Value::String(s)) => Value::String(s.trim().to_string()),
            (Transform::Reverse, Value::String(s)) => Value::String(s.chars().rev().collect()),
            (Transform::Reverse, Value::Array(mut items)) => {
                items.reverse();
                Value::Array(items)
            }
            (Transform::ToS, value) => return convert(value, &ParamType::String),
            (Transform::ToI, value) => return convert(value, &ParamType::Integer),
            (Transform::ToF, value) => return convert(value, &ParamType::Float),
            (Transform::Sort, Value::Array(items)) => {
                let mut sorted = items.clone();
                let mut failed = false;
                sorted.sort_by(|a, b| {
                    a.compare(b).unwrap_or_else(|| {
                        failed = true;
                        std::cmp::Ordering::Equal
                    })
                });
                if failed {
                    return Err(self.not_applicable(&Value::Array(items)));
                }
                Value::Array(sorted)
            }
            (Transform::Uniq, Value::Array(items)) => {
                let mut unique: Vec<Value> = Vec::with_capacity(items.len());
                for item in items {
                    if !unique.contains(&item) {
                        unique.push(item);
                    }
                }
                Value::Array(unique)
            }
            (_, other) => return Err(self.not_applicable(&other)),
        };
        Ok(transformed)
    }

    fn not_applicable(&self, value: &Value) -> Failure {
        Failure::new(
            ErrorKind::Coercion,
            format!("'{}' cannot be transformed with {}", value, self.name()),
        )
    }
}

fn convert(value: Value, ty: &ParamType) -> Result<Value, Failure> {
    let shown = value.to_string();
    coerce(Some(value), ty, Delimiters::default())?.ok_or_else(|| {
        Failure::new(ErrorKind::Coercion, format!("'{}' is not a valid {}", shown, ty))
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl FromStr for Transform {
    type Err = UnknownTransform;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "upcase" => Ok(Transform::Upcase),
            "downcase" => Ok(Transform::Downcase),
            "capitalize" => Ok(Transform::Capitalize),
            "strip" => Ok(Transform::Strip),
            "reverse" => Ok(Transform::Reverse),
            "to_s" => Ok(Transform::ToS),
            "to_i" => Ok(Transform::ToI),
            "to_f" => Ok(Transform::ToF),
            "sort" => Ok(Transform::Sort),
            "uniq" => Ok(Transform::Uniq),
            other => Err(UnknownTransform(other.to_string())),
        }
    }
}

/// **MEMBERSHIP CONSTRAINT** - Discrete set or interval
#[derive(Debug, Clone, PartialEq)]
pub enum Membership {
    /// Listed values.
    Set(Vec<Value>),
    /// Interval between two comparable bounds.
    Range {
        /// Lower bound, always inclusive.
        start: Value,
        /// Upper bound.
        end: Value,
        /// Whether `end` itself is a member.
        inclusive: bool,
    },
}

impl Membership {
    /// Membership test; mixed numerics compare by value.
    pub fn contains(&self, value: &Value) -> bool {
        match self {
            Membership::Set(members) => members.contains(value),
            Membership::Range {
                start,
                end,
                inclusive,
            } => {
                let above_start = value.compare(start).is_some_and(|o| o.is_ge());
                let below_end = match value.compare(end) {
                    Some(o) if *inclusive => o.is_le(),
                    Some(o) => o.is_lt(),
                    None => false,
                };
                above_start && below_end
            }
        }
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Membership::Set(members) => f.write_str(&inspect_list(members)),
            Membership::Range {
                start,
                end,
                inclusive: true,
            } => write!(f, "{}..{}", start, end),
            Membership::Range { start, end, .. } => write!(f, "{}...{}", start, end),
        }
    }
}

impl<T: Into<Value>> From<RangeInclusive<T>> for Membership {
    fn from(range: RangeInclusive<T>) -> Self {
        let (start, end) = range.into_inner();
        Membership::Range {
            start: start.into(),
            end: end.into(),
            inclusive: true,
        }
    }
}

impl<T: Into<Value>> From<Range<T>> for Membership {
    fn from(range: Range<T>) -> Self {
        Membership::Range {
            start: range.start.into(),
            end: range.end.into(),
            inclusive: false,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Membership {
    fn from(members: Vec<T>) -> Self {
        Membership::Set(members.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Membership {
    fn from(members: [T; N]) -> Self {
        Membership::Set(members.into_iter().map(Into::into).collect())
    }
}

/// **PARAMETER OPTIONS**
///
/// Built with chained setters:
///
/// ```rust
/// use request_params::options::{ParamOptions, Transform};
///
/// let options = ParamOptions::new()
///     .within(["ASC", "DESC"])
///     .transform(Transform::Upcase)
///     .default_value("ASC");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParamOptions {
    /// Used when the value is absent after coercion.
    pub default: Option<DefaultValue>,
    /// Applied after coercion and defaulting.
    pub transform: Option<Transform>,
    /// Absent values fail.
    pub required: bool,
    /// `Some(false)` rejects blank values.
    pub blank: Option<bool>,
    /// Pattern a string value must match.
    pub format: Option<Regex>,
    /// Exact expected value.
    pub is: Option<Value>,
    /// Allowed set or range.
    pub within: Option<Membership>,
    /// Inclusive lower bound.
    pub min: Option<Value>,
    /// Inclusive upper bound.
    pub max: Option<Value>,
    /// Minimum length of a string or collection.
    pub min_length: Option<usize>,
    /// Maximum length of a string or collection.
    pub max_length: Option<usize>,
    /// Overrides the element delimiter for Array and Hash coercion.
    pub delimiter: Option<String>,
    /// Overrides the Hash key/value separator.
    pub separator: Option<String>,
    /// Hand failures to the host instead of halting.
    pub raise: bool,
    /// Status code used when a failure halts the request.
    pub status: Option<u16>,
    /// Replaces the generated failure message.
    pub message: Option<String>,
}

impl ParamOptions {
    /// No constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Literal default.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Default produced by `generate` on demand.
    pub fn default_with(mut self, generate: fn() -> Value) -> Self {
        self.default = Some(DefaultValue::Generator(generate));
        self
    }

    /// Transform applied to present values.
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Fail when the value is absent.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// `false` rejects blank values.
    pub fn blank(mut self, allowed: bool) -> Self {
        self.blank = Some(allowed);
        self
    }

    /// String values must match `pattern`.
    pub fn format(mut self, pattern: Regex) -> Self {
        self.format = Some(pattern);
        self
    }

    /// Value must equal `value`.
    pub fn is(mut self, value: impl Into<Value>) -> Self {
        self.is = Some(value.into());
        self
    }

    /// Value must be a member of the set or range.
    pub fn within(mut self, membership: impl Into<Membership>) -> Self {
        self.within = Some(membership.into());
        self
    }

    /// Alias of [`ParamOptions::within`].
    pub fn in_set(self, membership: impl Into<Membership>) -> Self {
        self.within(membership)
    }

    /// Alias of [`ParamOptions::within`].
    pub fn range(self, membership: impl Into<Membership>) -> Self {
        self.within(membership)
    }

    /// Inclusive lower bound.
    pub fn min(mut self, bound: impl Into<Value>) -> Self {
        self.min = Some(bound.into());
        self
    }

    /// Inclusive upper bound.
    pub fn max(mut self, bound: impl Into<Value>) -> Self {
        self.max = Some(bound.into());
        self
    }

    /// Minimum length.
    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    /// Maximum length.
    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Element delimiter for Array and Hash coercion.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Key/value separator for Hash coercion.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Hand failures of this declaration to the host.
    pub fn raise(mut self) -> Self {
        self.raise = true;
        self
    }

    /// Status of the halting response.
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Summary shown instead of the generated one.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

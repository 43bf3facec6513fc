//! # TYPE COERCION
//!
//! Converts raw request values into the semantic type requested by a
//! declaration. Each `ParamType` variant owns its own parse function.

use crate::errors::{ErrorKind, Failure};
use crate::types::{ParamMap, UploadedFile, Value, DATE_FORMAT};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Element delimiter used when a declaration names none.
pub const DEFAULT_DELIMITER: &str = ",";
/// Key/value separator used when a declaration names none.
pub const DEFAULT_SEPARATOR: &str = ":";

const TRUTHY: [&str; 5] = ["1", "true", "t", "yes", "y"];
const FALSY: [&str; 5] = ["0", "false", "f", "no", "n"];

const DATE_FORMATS: [&str; 3] = [DATE_FORMAT, "%Y/%m/%d", "%d-%m-%Y"];
const TIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%dT%H:%M:%S%z"];

/// **TARGET TYPE**
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Taken as given; scalars are rendered as text.
    String,
    /// Signed 64-bit integer.
    Integer,
    /// Double precision float.
    Float,
    /// Strict truthy/falsy tokens.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and wall-clock time without a zone.
    Time,
    /// Date and time with an offset, UTC when none is given.
    DateTime,
    /// Flat split; elements stay strings.
    Array,
    /// Split, then coerce every element to the inner type.
    ArrayOf(Box<ParamType>),
    /// `key:value` entries split by the delimiter.
    Hash,
    /// Upload descriptor.
    File,
}

impl ParamType {
    /// `ArrayOf` convenience constructor.
    pub fn array_of(inner: ParamType) -> Self {
        ParamType::ArrayOf(Box::new(inner))
    }

    /// Name used in coercion messages, e.g. `Array<Integer>`.
    pub fn name(&self) -> String {
        match self {
            ParamType::ArrayOf(inner) => format!("Array<{}>", inner.name()),
            other => other.base_name().to_string(),
        }
    }

    fn base_name(&self) -> &'static str {
        match self {
            ParamType::String => "String",
            ParamType::Integer => "Integer",
            ParamType::Float => "Float",
            ParamType::Boolean => "Boolean",
            ParamType::Date => "Date",
            ParamType::Time => "Time",
            ParamType::DateTime => "DateTime",
            ParamType::Array | ParamType::ArrayOf(_) => "Array",
            ParamType::Hash => "Hash",
            ParamType::File => "File",
        }
    }

    /// Whether `value` already has this type's shape.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (ParamType::String, Value::String(_))
            | (ParamType::Integer, Value::Integer(_))
            | (ParamType::Float, Value::Float(_))
            | (ParamType::Boolean, Value::Boolean(_))
            | (ParamType::Date, Value::Date(_))
            | (ParamType::Time, Value::Time(_))
            | (ParamType::DateTime, Value::DateTime(_))
            | (ParamType::Array, Value::Array(_))
            | (ParamType::Hash, Value::Hash(_))
            | (ParamType::File, Value::File(_)) => true,
            (ParamType::ArrayOf(inner), Value::Array(items)) => {
                items.iter().all(|item| inner.matches(item))
            }
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Type tag that names no supported `ParamType`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("UNKNOWN PARAMETER TYPE: {0}")]
pub struct UnknownParamType(pub String);

impl FromStr for ParamType {
    type Err = UnknownParamType;

    /// Parses `Integer`, `integer`, `Array<Integer>`, ... Unknown tags are an
    /// error rather than a pass-through.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim();
        if let Some(inner) = tag
            .strip_prefix("Array<")
            .or_else(|| tag.strip_prefix("array<"))
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return inner.parse().map(ParamType::array_of);
        }

        match tag.to_ascii_lowercase().as_str() {
            "string" => Ok(ParamType::String),
            "integer" | "int" => Ok(ParamType::Integer),
            "float" => Ok(ParamType::Float),
            "boolean" | "bool" => Ok(ParamType::Boolean),
            "date" => Ok(ParamType::Date),
            "time" => Ok(ParamType::Time),
            "datetime" => Ok(ParamType::DateTime),
            "array" => Ok(ParamType::Array),
            "hash" => Ok(ParamType::Hash),
            "file" => Ok(ParamType::File),
            _ => Err(UnknownParamType(tag.to_string())),
        }
    }
}

/// Splitting tokens for `Array` and `Hash` coercion.
#[derive(Debug, Clone, Copy)]
pub struct Delimiters<'a> {
    /// Splits array elements and hash entries.
    pub delimiter: &'a str,
    /// Splits a hash entry into key and value.
    pub separator: &'a str,
}

impl Default for Delimiters<'_> {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            separator: DEFAULT_SEPARATOR,
        }
    }
}

fn invalid(raw: &Value, ty: &ParamType) -> Failure {
    Failure::new(
        ErrorKind::Coercion,
        format!("'{}' is not a valid {}", raw, ty.base_name()),
    )
}

/// **COERCE**
///
/// Absent input stays absent; a value that already has the target shape is
/// returned unchanged.
pub fn coerce(
    raw: Option<Value>,
    ty: &ParamType,
    delimiters: Delimiters<'_>,
) -> Result<Option<Value>, Failure> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if ty.matches(&raw) {
        return Ok(Some(raw));
    }

    log::trace!("coercing {} to {}", raw.kind_name(), ty);

    // Collections only coerce into collection types.
    match (&raw, ty) {
        (Value::Array(_), ParamType::Array | ParamType::ArrayOf(_)) => {}
        (Value::Array(_), _) => return Err(invalid(&raw, ty)),
        (Value::Hash(_), ParamType::Hash | ParamType::File) => {}
        (Value::Hash(_) | Value::File(_) | Value::Bytes(_), _) => return Err(invalid(&raw, ty)),
        _ => {}
    }

    let coerced = match ty {
        ParamType::String => Value::String(raw.to_string()),
        ParamType::Integer => to_integer(&raw).ok_or_else(|| invalid(&raw, ty))?,
        ParamType::Float => to_float(&raw).ok_or_else(|| invalid(&raw, ty))?,
        ParamType::Boolean => to_boolean(&raw).ok_or_else(|| invalid(&raw, ty))?,
        ParamType::Date => to_date(&raw).ok_or_else(|| invalid(&raw, ty))?,
        ParamType::Time => to_time(&raw).ok_or_else(|| invalid(&raw, ty))?,
        ParamType::DateTime => to_datetime(&raw).ok_or_else(|| invalid(&raw, ty))?,
        ParamType::Array => Value::Array(to_items(raw, delimiters.delimiter)),
        ParamType::ArrayOf(inner) => {
            let items = to_items(raw, delimiters.delimiter);
            let mut coerced = Vec::with_capacity(items.len());
            for item in items {
                coerced.extend(coerce(Some(item), inner, delimiters)?);
            }
            Value::Array(coerced)
        }
        ParamType::Hash => to_hash(&raw, delimiters).ok_or_else(|| invalid(&raw, ty))?,
        ParamType::File => to_file(&raw).ok_or_else(|| invalid(&raw, ty))?,
    };
    Ok(Some(coerced))
}

fn to_integer(raw: &Value) -> Option<Value> {
    match raw {
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::Integer),
        // i64::MAX as f64 rounds up to 2^63, which is already out of range.
        Value::Float(f)
            if f.is_finite()
                && f.fract() == 0.0
                && *f >= i64::MIN as f64
                && *f < i64::MAX as f64 =>
        {
            Some(Value::Integer(*f as i64))
        }
        _ => None,
    }
}

fn to_float(raw: &Value) -> Option<Value> {
    match raw {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float),
        Value::Integer(i) => Some(Value::Float(*i as f64)),
        _ => None,
    }
}

fn to_boolean(raw: &Value) -> Option<Value> {
    match raw {
        Value::String(s) => {
            let lowered = s.trim().to_ascii_lowercase();
            if TRUTHY.contains(&lowered.as_str()) {
                Some(Value::Boolean(true))
            } else if FALSY.contains(&lowered.as_str()) {
                Some(Value::Boolean(false))
            } else {
                None
            }
        }
        Value::Integer(1) => Some(Value::Boolean(true)),
        Value::Integer(0) => Some(Value::Boolean(false)),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year = s[0..4].parse().ok()?;
        let month = s[4..6].parse().ok()?;
        let day = s[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

fn parse_zoned(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .ok()
        .or_else(|| {
            ZONED_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(s, format).ok())
        })
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| parse_date(s).map(|d| d.and_time(NaiveTime::MIN)))
}

fn utc() -> FixedOffset {
    Utc.fix()
}

fn to_date(raw: &Value) -> Option<Value> {
    let date = match raw {
        Value::String(s) => parse_date(s)
            .or_else(|| parse_zoned(s).map(|dt| dt.date_naive()))
            .or_else(|| parse_naive(s).map(|t| t.date()))?,
        Value::Time(t) => t.date(),
        Value::DateTime(dt) => dt.date_naive(),
        _ => return None,
    };
    Some(Value::Date(date))
}

fn to_time(raw: &Value) -> Option<Value> {
    let time = match raw {
        Value::String(s) => parse_naive(s).or_else(|| parse_zoned(s).map(|dt| dt.naive_local()))?,
        Value::Date(d) => d.and_time(NaiveTime::MIN),
        Value::DateTime(dt) => dt.naive_local(),
        _ => return None,
    };
    Some(Value::Time(time))
}

fn to_datetime(raw: &Value) -> Option<Value> {
    let datetime = match raw {
        Value::String(s) => match parse_zoned(s) {
            Some(dt) => dt,
            None => parse_naive(s)?.and_utc().fixed_offset(),
        },
        Value::Date(d) => d.and_time(NaiveTime::MIN).and_utc().with_timezone(&utc()),
        Value::Time(t) => t.and_utc().with_timezone(&utc()),
        _ => return None,
    };
    Some(Value::DateTime(datetime))
}

/// Split with the conventions of form encoders: an empty input has no
/// fields and trailing empty fields are dropped.
pub(crate) fn split_fields<'a>(s: &'a str, delimiter: &str) -> Vec<&'a str> {
    if s.is_empty() {
        return Vec::new();
    }
    let mut fields: Vec<&str> = if delimiter.is_empty() {
        vec![s]
    } else {
        s.split(delimiter).collect()
    };
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

fn to_items(raw: Value, delimiter: &str) -> Vec<Value> {
    match raw {
        Value::Array(items) => items,
        Value::String(s) => split_fields(&s, delimiter)
            .into_iter()
            .map(Value::from)
            .collect(),
        scalar => vec![scalar],
    }
}

fn to_hash(raw: &Value, delimiters: Delimiters<'_>) -> Option<Value> {
    match raw {
        Value::String(s) => {
            let mut map = ParamMap::new();
            for entry in split_fields(s, delimiters.delimiter) {
                match split_fields(entry, delimiters.separator).as_slice() {
                    [key, value] => {
                        map.insert(key.to_string(), Value::from(*value));
                    }
                    _ => return None,
                }
            }
            Some(Value::Hash(map))
        }
        _ => None,
    }
}

fn to_file(raw: &Value) -> Option<Value> {
    match raw {
        Value::Hash(map) => UploadedFile::from_descriptor(map).map(Value::File),
        _ => None,
    }
}

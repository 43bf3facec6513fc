//! # PARAMETER VALUE TYPES
//!
//! **CRITICAL**: Core data structures shared by the source adapters, the
//! coercer, the validators and the error formatter.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// **PARAMETER MAPPING**
///
/// String-keyed, order-irrelevant mapping owned by the host for one request.
pub type ParamMap = HashMap<String, Value>;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// **PARAMETER VALUE**
///
/// Raw values arrive as `String`, `Array`, `Hash`, `Bytes` or `File`; the
/// coercer produces the remaining variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text.
    String(String),
    /// Signed 64-bit integer.
    Integer(i64),
    /// Double precision float.
    Float(f64),
    /// Boolean.
    Boolean(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Wall-clock time without a zone.
    Time(NaiveDateTime),
    /// Date and time with an offset.
    DateTime(DateTime<FixedOffset>),
    /// Ordered list.
    Array(Vec<Value>),
    /// Nested mapping.
    Hash(ParamMap),
    /// Uploaded file.
    File(UploadedFile),
    /// Raw upload content inside a not-yet-coerced file descriptor.
    Bytes(Vec<u8>),
}

impl Value {
    /// **KIND NAME** - Type name used in coercion messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Boolean(_) => "Boolean",
            Value::Date(_) => "Date",
            Value::Time(_) => "Time",
            Value::DateTime(_) => "DateTime",
            Value::Array(_) => "Array",
            Value::Hash(_) => "Hash",
            Value::File(_) => "File",
            Value::Bytes(_) => "Bytes",
        }
    }

    /// Borrow the text of a String.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric payload as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Boolean payload.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Array elements.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Hash entries.
    pub fn as_hash(&self) -> Option<&ParamMap> {
        match self {
            Value::Hash(map) => Some(map),
            _ => None,
        }
    }

    /// Upload descriptor.
    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            Value::File(file) => Some(file),
            _ => None,
        }
    }

    /// **BLANK PREDICATE**
    ///
    /// Whitespace-only strings and empty collections are blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::String(s) => s.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Hash(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Length of strings (in chars), arrays and hashes.
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.len()),
            Value::Hash(map) => Some(map.len()),
            _ => None,
        }
    }

    /// **ORDERING**
    ///
    /// Integers and floats compare with each other; strings and same-kind
    /// temporal values compare among themselves. Anything else is
    /// incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Literal form used when listing values, e.g. `"ASC"` or `[1, 2]`.
    pub fn inspect(&self) -> String {
        match self {
            Value::String(s) => format!("{:?}", s),
            Value::Array(items) => inspect_list(items),
            Value::Hash(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                let entries: Vec<String> = keys
                    .into_iter()
                    .map(|k| format!("{:?} => {}", k, map[k].inspect()))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            other => other.to_string(),
        }
    }

    /// **JSON CONVERSION**
    ///
    /// `null` has no parameter representation and yields `None`; nulls inside
    /// arrays are dropped and null object members are skipped.
    pub fn from_json(value: serde_json::Value) -> Option<Value> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(Value::Boolean(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Value::Integer(i)),
                None => n.as_f64().map(Value::Float),
            },
            serde_json::Value::String(s) => Some(Value::String(s)),
            serde_json::Value::Array(items) => Some(Value::Array(
                items.into_iter().filter_map(Value::from_json).collect(),
            )),
            serde_json::Value::Object(map) => Some(Value::Hash(
                map.into_iter()
                    .filter_map(|(k, v)| Value::from_json(v).map(|v| (k, v)))
                    .collect(),
            )),
        }
    }

    /// Serialize into a `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

pub(crate) fn inspect_list(items: &[Value]) -> String {
    let rendered: Vec<String> = items.iter().map(Value::inspect).collect();
    format!("[{}]", rendered.join(", "))
}

fn fmt_float(f: f64, out: &mut fmt::Formatter<'_>) -> fmt::Result {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        write!(out, "{:.1}", f)
    } else {
        write!(out, "{}", f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => fmt_float(*x, f),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
            Value::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Value::Array(_) | Value::Hash(_) => f.write_str(&self.inspect()),
            Value::File(file) => f.write_str(&file.filename),
            Value::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Date(_) | Value::Time(_) | Value::DateTime(_) => {
                serializer.collect_str(self)
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Hash(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::File(file) => file.serialize(serializer),
            Value::Bytes(bytes) => serializer.serialize_bytes(bytes),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(t: NaiveDateTime) -> Self {
        Value::Time(t)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<ParamMap> for Value {
    fn from(map: ParamMap) -> Self {
        Value::Hash(map)
    }
}

impl From<UploadedFile> for Value {
    fn from(file: UploadedFile) -> Self {
        Value::File(file)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

/// **BLANK PREDICATE** - Absent values count as blank
///
/// Shared by the `blank` validation and by relational presence checks.
pub fn is_blank(value: Option<&Value>) -> bool {
    value.map_or(true, Value::is_blank)
}

/// **UPLOADED FILE**
///
/// Opaque upload descriptor handed over by the host's multipart parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-side file name.
    pub filename: String,
    /// Raw part headers.
    pub head: String,
    /// Form field name.
    pub name: String,
    /// File contents.
    pub tempfile: Vec<u8>,
    /// Declared content type.
    pub content_type: String,
}

impl UploadedFile {
    /// Descriptor keys, as produced by multipart parsers.
    pub const DESCRIPTOR_KEYS: [&'static str; 5] = ["filename", "head", "name", "tempfile", "type"];

    /// Client-side file name.
    pub fn original_filename(&self) -> &str {
        &self.filename
    }

    /// Declared content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.tempfile.len()
    }

    /// **DESCRIPTOR CONVERSION**
    ///
    /// Accepts a mapping carrying every descriptor key with string fields and
    /// byte (or string) content. Returns `None` for any other shape.
    pub fn from_descriptor(map: &ParamMap) -> Option<Self> {
        let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
        let tempfile = match map.get("tempfile")? {
            Value::Bytes(bytes) => bytes.clone(),
            Value::String(s) => s.clone().into_bytes(),
            _ => return None,
        };

        Some(Self {
            filename: text("filename")?,
            head: text("head")?,
            name: text("name")?,
            tempfile,
            content_type: text("type")?,
        })
    }

    /// Inverse of [`UploadedFile::from_descriptor`].
    pub fn into_descriptor(self) -> ParamMap {
        let mut map = ParamMap::new();
        map.insert("filename".to_string(), Value::String(self.filename));
        map.insert("head".to_string(), Value::String(self.head));
        map.insert("name".to_string(), Value::String(self.name));
        map.insert("tempfile".to_string(), Value::Bytes(self.tempfile));
        map.insert("type".to_string(), Value::String(self.content_type));
        map
    }
}

impl Serialize for UploadedFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(5))?;
        out.serialize_entry("filename", &self.filename)?;
        out.serialize_entry("type", &self.content_type)?;
        out.serialize_entry("name", &self.name)?;
        out.serialize_entry("head", &self.head)?;
        out.serialize_entry("size", &self.size())?;
        out.end()
    }
}

//! Path resolution for plain (`name`) and embedded (`parent[child]`) parameter names.

use crate::errors::{ErrorKind, Failure};
use crate::types::{ParamMap, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static EMBEDDED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^\[\]]+)((?:\[[^\[\]]+\])+)$").expect("valid embedded name pattern"));
static SUBKEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("valid subkey pattern"));

/// Parsed parameter name: one segment for plain names, several for embedded ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamPath {
    segments: Vec<String>,
}

impl ParamPath {
    /// Split `a[b][c]` into segments; a plain name is one segment.
    pub fn parse(name: &str) -> Self {
        match EMBEDDED_NAME.captures(name) {
            Some(captures) => {
                let mut segments = vec![captures[1].to_string()];
                segments.extend(
                    SUBKEY
                        .captures_iter(&captures[2])
                        .map(|c| c[1].to_string()),
                );
                Self { segments }
            }
            None => Self {
                segments: vec![name.to_string()],
            },
        }
    }

    /// `true` for names with bracketed segments.
    pub fn is_embedded(&self) -> bool {
        self.segments.len() > 1
    }

    /// Segments from the root down.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// First segment, the key in the mapping the path starts from.
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Whether a value exists at this path.
    pub fn exists(&self, map: &ParamMap) -> bool {
        self.read(map).is_some()
    }

    /// Value at this path, if every step exists.
    pub fn read<'a>(&self, map: &'a ParamMap) -> Option<&'a Value> {
        let (last, parents) = self.segments.split_last()?;
        let mut current = map;
        for segment in parents {
            match current.get(segment)? {
                Value::Hash(inner) => current = inner,
                _ => return None,
            }
        }
        current.get(last)
    }

    /// Mutable value at this path.
    pub fn read_mut<'a>(&self, map: &'a mut ParamMap) -> Option<&'a mut Value> {
        let (last, parents) = self.segments.split_last()?;
        let mut current = map;
        for segment in parents {
            match current.get_mut(segment)? {
                Value::Hash(inner) => current = inner,
                _ => return None,
            }
        }
        current.get_mut(last)
    }

    /// Write `value`, creating intermediate mappings on the way.
    ///
    /// Fails when an intermediate key holds something other than a mapping.
    pub fn write(&self, map: &mut ParamMap, value: Value) -> Result<(), Failure> {
        let (last, parents) = self
            .segments
            .split_last()
            .ok_or_else(|| Failure::new(ErrorKind::NestedType, "Parameter name is empty"))?;
        let mut current = map;
        for segment in parents {
            let entry = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Hash(ParamMap::new()));
            current = match entry {
                Value::Hash(inner) => inner,
                other => {
                    return Err(Failure::new(
                        ErrorKind::NestedType,
                        format!("Parameter {} is a {}, not a Hash", segment, other.kind_name()),
                    ))
                }
            };
        }
        current.insert(last.clone(), value);
        Ok(())
    }

    /// Remove the value at this path and return it.
    pub fn remove(&self, map: &mut ParamMap) -> Option<Value> {
        let (last, parents) = self.segments.split_last()?;
        let mut current = map;
        for segment in parents {
            match current.get_mut(segment)? {
                Value::Hash(inner) => current = inner,
                _ => return None,
            }
        }
        current.remove(last)
    }
}

impl fmt::Display for ParamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&qualify(&[], &self.segments))
    }
}

/// **QUALIFIED NAME**
///
/// `qualify(["parent"], ["child"])` is `parent[child]`; an empty scope
/// leaves the first segment bare.
pub fn qualify<S: AsRef<str>>(scope: &[S], segments: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in scope.iter().chain(segments.iter()).enumerate() {
        if i == 0 {
            out.push_str(segment.as_ref());
        } else {
            out.push('[');
            out.push_str(segment.as_ref());
            out.push(']');
        }
    }
    out
}

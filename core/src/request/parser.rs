//! Raw request data to parameter mappings.

use crate::errors::SourceError;
use crate::path::ParamPath;
use crate::types::{ParamMap, Value};

/// **QUERY STRING**
///
/// `&`-separated `key=value` pairs, `+` as space, percent-decoded. Keys
/// nest with brackets (`a[b]=1`) and accumulate with a trailing `[]`
/// (`a[]=1&a[]=2`). Later plain keys overwrite earlier ones.
pub fn parse_query_string(query: &str) -> ParamMap {
    let mut params = ParamMap::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match (decode(key), decode(value)) {
            (Some(key), Some(value)) => insert_field(&mut params, &key, Value::String(value)),
            _ => log::debug!("dropping undecodable query pair {:?}", pair),
        }
    }
    params
}

fn decode(component: &str) -> Option<String> {
    urlencoding::decode(&component.replace('+', " "))
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Store one decoded field under a possibly bracketed key.
pub(crate) fn insert_field(params: &mut ParamMap, key: &str, value: Value) {
    let result = match key.strip_suffix("[]") {
        Some(base) => {
            let path = ParamPath::parse(base);
            match path.read_mut(params) {
                Some(Value::Array(items)) => {
                    items.push(value);
                    Ok(())
                }
                _ => path.write(params, Value::Array(vec![value])),
            }
        }
        None => ParamPath::parse(key).write(params, value),
    };

    if let Err(failure) = result {
        log::debug!("dropping field {:?}: {}", key, failure.message);
    }
}

/// Top-level JSON object as a parameter mapping.
pub fn parse_json_body(data: &[u8]) -> Result<ParamMap, SourceError> {
    match serde_json::from_slice::<serde_json::Value>(data)? {
        serde_json::Value::Object(object) => Ok(object
            .into_iter()
            .filter_map(|(key, value)| Value::from_json(value).map(|value| (key, value)))
            .collect()),
        other => Err(SourceError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// `application/x-www-form-urlencoded` body, decoded like a query string.
pub fn parse_form_body(data: &[u8]) -> Result<ParamMap, SourceError> {
    let body_str = std::str::from_utf8(data)?;
    Ok(parse_query_string(body_str))
}

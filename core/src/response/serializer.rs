//! Response construction and body serialization.

use crate::response::types::{HttpResponse, ResponseBody};
use std::collections::HashMap;

/// JSON bytes of `value`.
pub fn serialize_json_response(value: &serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_default()
}

/// Response with a `Content-Type` matching the body framing.
pub fn create_response(status: u16, body: ResponseBody) -> HttpResponse {
    let mut headers = HashMap::new();

    match &body {
        ResponseBody::Json(_) => {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        ResponseBody::Text(_) => {
            headers.insert("Content-Type".to_string(), "text/plain".to_string());
        }
        ResponseBody::Empty => {}
    }

    HttpResponse {
        status_code: status,
        headers,
        body,
    }
}

/// Wire bytes of a response body.
pub fn serialize_response_body(body: &ResponseBody) -> Vec<u8> {
    match body {
        ResponseBody::Empty => vec![],
        ResponseBody::Json(value) => serialize_json_response(value),
        ResponseBody::Text(text) => text.as_bytes().to_vec(),
    }
}

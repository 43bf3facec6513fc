//! Request shapes handed over by the host.

use crate::errors::SourceError;
use crate::request::parser::{insert_field, parse_form_body, parse_json_body, parse_query_string};
use crate::types::{ParamMap, UploadedFile, Value};
use std::collections::HashMap;

/// Request as handed over by the host after routing.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    /// Request path as routed.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Raw query string without the leading `?`.
    pub query: String,
    /// Segments captured by the router.
    pub path_params: HashMap<String, String>,
    /// Request body.
    pub body: RequestBody,
}

/// Body of a request, by how it was framed.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Parsed JSON document.
    Json(serde_json::Value),
    /// URL-encoded form bytes.
    Form(Vec<u8>),
    /// Parts of a multipart form.
    Multipart(Vec<MultipartPart>),
    /// Interpreted by the `Content-Type` header.
    Raw(Vec<u8>),
}

/// One part of a multipart form.
#[derive(Debug, Clone)]
pub struct MultipartPart {
    /// Form field name.
    pub name: String,
    /// Present for file parts.
    pub filename: Option<String>,
    /// Part content type.
    pub content_type: String,
    /// Raw part headers.
    pub head: String,
    /// Part payload.
    pub data: Vec<u8>,
}

impl MultipartPart {
    /// Plain fields become strings; file parts become upload descriptors.
    pub fn into_value(self) -> Value {
        match self.filename {
            Some(filename) => Value::Hash(
                UploadedFile {
                    filename,
                    head: self.head,
                    name: self.name,
                    tempfile: self.data,
                    content_type: self.content_type,
                }
                .into_descriptor(),
            ),
            None => Value::String(String::from_utf8_lossy(&self.data).into_owned()),
        }
    }
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// **MERGED PARAMETERS**
    ///
    /// Query string first, then the body, then path segments; later sources
    /// overwrite earlier ones key by key.
    pub fn params(&self) -> Result<ParamMap, SourceError> {
        let mut params = parse_query_string(&self.query);
        params.extend(self.body_params()?);
        params.extend(
            self.path_params
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone()))),
        );
        Ok(params)
    }

    fn body_params(&self) -> Result<ParamMap, SourceError> {
        match &self.body {
            RequestBody::Empty => Ok(ParamMap::new()),
            RequestBody::Json(value) => match Value::from_json(value.clone()) {
                Some(Value::Hash(map)) => Ok(map),
                None => Ok(ParamMap::new()),
                Some(other) => Err(SourceError::NotAnObject(other.kind_name())),
            },
            RequestBody::Form(data) => parse_form_body(data),
            RequestBody::Multipart(parts) => {
                let mut params = ParamMap::new();
                for part in parts {
                    let name = part.name.clone();
                    insert_field(&mut params, &name, part.clone().into_value());
                }
                Ok(params)
            }
            RequestBody::Raw(data) => {
                let content_type = self.header("content-type").unwrap_or_default();
                let mime = content_type.split(';').next().unwrap_or_default().trim();
                if mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json") {
                    parse_json_body(data)
                } else if mime.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
                    parse_form_body(data)
                } else {
                    log::debug!("ignoring body with content type {:?}", content_type);
                    Ok(ParamMap::new())
                }
            }
        }
    }
}

//! # ERROR FORMATTER
//!
//! Turns a `ParamError` into either a halting response or a raised error,
//! and frames error bodies as JSON or plain text depending on the response
//! content type.

use crate::errors::ParamError;
use crate::response::{create_response, HttpResponse, ResponseBody};
use serde_json::{json, Map};

/// **CONTENT-TYPE INSPECTOR**
///
/// Anything that knows the content type the response will be sent with.
pub trait ContentTypeInspector {
    /// Content type the response will carry, if known.
    fn content_type(&self) -> Option<&str>;

    /// `application/json` or any `+json` subtype, parameters ignored.
    fn is_json(&self) -> bool {
        self.content_type().map_or(false, |content_type| {
            let mime = content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
    }
}

impl ContentTypeInspector for str {
    fn content_type(&self) -> Option<&str> {
        Some(self)
    }
}

impl ContentTypeInspector for String {
    fn content_type(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl ContentTypeInspector for HttpResponse {
    fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// **OUTCOME** - What the host should do with a failed declaration
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Stop handling and send this response.
    Halt(HttpResponse),
    /// Propagate the error to the host's own handling.
    Raise(ParamError),
}

/// Raise when the error asks for it, otherwise halt with a formatted body.
pub fn respond<I>(error: ParamError, inspector: &I) -> Outcome
where
    I: ContentTypeInspector + ?Sized,
{
    if error.raise {
        log::debug!("raising {} to host", error.code());
        Outcome::Raise(error)
    } else {
        Outcome::Halt(into_response(&error, inspector))
    }
}

/// `{"message": summary, "errors": {param: detail}}` or the bare summary.
pub fn error_body(error: &ParamError, json: bool) -> ResponseBody {
    if json {
        let mut errors = Map::new();
        errors.insert(error.param.clone(), json!(error.message));
        ResponseBody::Json(json!({
            "message": error.summary,
            "errors": errors,
        }))
    } else {
        ResponseBody::Text(error.summary.clone())
    }
}

/// Halting response for one error, framed for the inspected content type.
pub fn into_response<I>(error: &ParamError, inspector: &I) -> HttpResponse
where
    I: ContentTypeInspector + ?Sized,
{
    create_response(error.status, error_body(error, inspector.is_json()))
}

/// **ERROR COLLECTOR**
///
/// Accumulates failures across many declarations instead of stopping at the
/// first.
#[derive(Debug, Clone, Default)]
pub struct ErrorCollector {
    errors: Vec<ParamError>,
}

impl ErrorCollector {
    /// Empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the value on success, remember the error otherwise.
    pub fn record<T>(&mut self, result: Result<T, ParamError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    /// Remember an error directly.
    pub fn push(&mut self, error: ParamError) {
        self.errors.push(error);
    }

    /// `true` while nothing failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Recorded errors in declaration order.
    pub fn errors(&self) -> &[ParamError] {
        &self.errors
    }

    /// `Ok` when nothing failed, otherwise every recorded error.
    pub fn into_result(self) -> Result<(), Vec<ParamError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Status of the first recorded error.
    pub fn status(&self) -> Option<u16> {
        self.errors.first().map(|error| error.status)
    }

    /// `[{"param": p, "message": m}, ...]` or newline-joined summaries.
    pub fn body(&self, json: bool) -> ResponseBody {
        if json {
            ResponseBody::Json(
                self.errors
                    .iter()
                    .map(|error| json!({"param": error.param, "message": error.message}))
                    .collect(),
            )
        } else {
            ResponseBody::Text(
                self.errors
                    .iter()
                    .map(|error| error.summary.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        }
    }

    /// Halting response for everything recorded, `None` when nothing failed.
    pub fn response<I>(&self, inspector: &I) -> Option<HttpResponse>
    where
        I: ContentTypeInspector + ?Sized,
    {
        let status = self.status()?;
        Some(create_response(status, self.body(inspector.is_json())))
    }
}

//! Flat re-exports for hosts and tests.

pub use crate::coercion::{coerce, Delimiters, ParamType, UnknownParamType};
pub use crate::context::{ParamContext, ParamSettings};
pub use crate::errors::{ErrorKind, Failure, ParamError, SourceError};
pub use crate::formatter::{respond, ContentTypeInspector, ErrorCollector, Outcome};
pub use crate::options::{DefaultValue, Membership, ParamOptions, Transform, UnknownTransform};
pub use crate::path::ParamPath;
pub use crate::request::{parse_form_body, parse_json_body, parse_query_string, HttpRequest};
pub use crate::response::{HttpResponse, ResponseBody};
pub use crate::types::{is_blank, ParamMap, UploadedFile, Value};

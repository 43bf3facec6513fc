//! # REQUEST PARAMETER LIBRARY
//!
//! **DECLARATIVE COERCION AND VALIDATION OF HTTP REQUEST PARAMETERS**
//!
//! **ARCHITECTURE**: Per-request `ParamContext` over a mutable parameter
//! mapping, trait-based validator chain, closed type and transform registries
//! **GUARANTEE**: At most one failure per declaration, reported with the
//! qualified parameter path
//!
//! ```rust
//! use request_params::api::*;
//!
//! let mut params = parse_query_string("page=2&order=desc");
//! let settings = ParamSettings::default();
//! let mut ctx = ParamContext::new(&mut params, &settings);
//!
//! let page = ctx.param("page", &ParamType::Integer, &ParamOptions::new().min(1)).unwrap();
//! assert_eq!(page, Some(Value::Integer(2)));
//!
//! let order = ParamOptions::new()
//!     .transform(Transform::Upcase)
//!     .within(["ASC", "DESC"]);
//! assert!(ctx.param("order", &ParamType::String, &order).is_ok());
//! ```

pub mod api;
pub mod coercion;
pub mod context;
pub mod errors;
pub mod formatter;
pub mod options;
pub mod path;
pub mod relations;
pub mod request;
pub mod response;
pub mod types;

// **VALIDATION MODULE REGISTRATION**
pub mod validation;

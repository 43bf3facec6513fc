//! # DECLARATION CONTEXT
//!
//! **PER-REQUEST PARAMETER SCOPE**
//!
//! A `ParamContext` borrows the request's parameter mapping and runs
//! declarations against it in place. Nested Hash declarations get a child
//! context over the inner mapping; the child carries the parent path so
//! error names come out qualified (`parent[child]`).
//!
//! ## PIPELINE PER DECLARATION
//!
//! resolve → presence gate → coerce → default → transform → validate →
//! write back → nested block

use crate::coercion::{coerce, Delimiters, ParamType, DEFAULT_DELIMITER, DEFAULT_SEPARATOR};
use crate::errors::{ErrorKind, Failure, ParamError};
use crate::options::ParamOptions;
use crate::path::{qualify, ParamPath};
use crate::relations::{group_name, Relation};
use crate::types::{ParamMap, Value};
use crate::validation::validate;
use serde::{Deserialize, Serialize};

const NESTED_NON_HASH: &str = "Only the Hash parameter validation can use sub hash validation method";

/// **ENGINE SETTINGS**
///
/// Host-level defaults. Per-declaration options win over these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamSettings {
    /// Hand every failure to the host instead of halting.
    pub always_raise: bool,
    /// Status of halting responses unless the declaration sets one.
    pub default_status: u16,
    /// Fallback for the `delimiter` option.
    pub default_delimiter: String,
    /// Fallback for the `separator` option.
    pub default_separator: String,
}

impl Default for ParamSettings {
    fn default() -> Self {
        Self {
            always_raise: false,
            default_status: 400,
            default_delimiter: DEFAULT_DELIMITER.to_string(),
            default_separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl ParamSettings {
    /// Missing keys fall back to the defaults.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

/// **PARAMETER CONTEXT**
pub struct ParamContext<'a> {
    params: &'a mut ParamMap,
    scope: Vec<String>,
    settings: &'a ParamSettings,
    declared: Vec<String>,
}

impl<'a> ParamContext<'a> {
    /// Top-level context over the request parameters.
    pub fn new(params: &'a mut ParamMap, settings: &'a ParamSettings) -> Self {
        Self {
            params,
            scope: Vec::new(),
            settings,
            declared: Vec::new(),
        }
    }

    /// Current state of this scope, coerced values included.
    pub fn params(&self) -> &ParamMap {
        &*self.params
    }

    /// Parent path segments; empty at the top level.
    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// Engine settings shared by every scope.
    pub fn settings(&self) -> &ParamSettings {
        self.settings
    }

    /// **DECLARE** - Coerce, default, transform and validate one parameter
    ///
    /// Returns the final value, or `None` when the parameter is absent and
    /// neither required nor defaulted. In that case nothing is written.
    pub fn param(
        &mut self,
        name: &str,
        ty: &ParamType,
        options: &ParamOptions,
    ) -> Result<Option<Value>, ParamError> {
        let path = ParamPath::parse(name);
        self.declare(&path);
        log::debug!("declaring {} as {}", self.qualified(&path), ty);

        let raw = path.read(self.params).cloned();
        if raw.is_none() && !options.required && options.default.is_none() {
            return Ok(None);
        }

        let delimiters = Delimiters {
            delimiter: options
                .delimiter
                .as_deref()
                .unwrap_or(self.settings.default_delimiter.as_str()),
            separator: options
                .separator
                .as_deref()
                .unwrap_or(self.settings.default_separator.as_str()),
        };

        let mut value = coerce(raw, ty, delimiters).map_err(|f| self.failure(&path, f, options))?;
        if value.is_none() {
            value = options.default.as_ref().map(|default| default.resolve());
        }
        if let Some(transform) = &options.transform {
            value = value
                .map(|current| transform.apply(current))
                .transpose()
                .map_err(|f| self.failure(&path, f, options))?;
        }

        validate(value.as_ref(), options).map_err(|f| self.failure(&path, f, options))?;

        if let Some(current) = &value {
            path.write(self.params, current.clone())
                .map_err(|f| self.failure(&path, f, options))?;
        }
        Ok(value)
    }

    /// **DECLARE WITH SUB-DECLARATIONS**
    ///
    /// Declares `name` as a Hash, then runs `block` against a child context
    /// scoped to it. The block is skipped when the hash is absent.
    pub fn param_nested<F>(
        &mut self,
        name: &str,
        ty: &ParamType,
        options: &ParamOptions,
        block: F,
    ) -> Result<Option<Value>, ParamError>
    where
        F: FnOnce(&mut ParamContext<'_>) -> Result<(), ParamError>,
    {
        let path = ParamPath::parse(name);
        if *ty != ParamType::Hash {
            self.declare(&path);
            let failure = Failure::new(ErrorKind::NestedType, NESTED_NON_HASH);
            return Err(self.failure(&path, failure, options));
        }

        if self.param(name, ty, options)?.is_none() {
            return Ok(None);
        }

        let mut scope = self.scope.clone();
        scope.extend(path.segments().iter().cloned());
        log::debug!("entering scope {}", qualify::<String>(&scope, &[]));

        if !matches!(path.read(self.params), Some(Value::Hash(_))) {
            let failure = Failure::new(ErrorKind::NestedType, NESTED_NON_HASH);
            return Err(self.failure(&path, failure, options));
        }
        if let Some(Value::Hash(inner)) = path.read_mut(self.params) {
            let mut child = ParamContext {
                params: inner,
                scope,
                settings: self.settings,
                declared: Vec::new(),
            };
            block(&mut child)?;
        }

        Ok(path.read(self.params).cloned())
    }

    /// At most one of `names` may be present.
    pub fn one_of(&self, names: &[&str], options: &ParamOptions) -> Result<(), ParamError> {
        self.relate(Relation::OneOf, names, options)
    }

    /// At least one of `names` must be present.
    pub fn any_of(&self, names: &[&str], options: &ParamOptions) -> Result<(), ParamError> {
        self.relate(Relation::AnyOf, names, options)
    }

    /// Either every one of `names` is present or none is.
    pub fn all_or_none_of(&self, names: &[&str], options: &ParamOptions) -> Result<(), ParamError> {
        self.relate(Relation::AllOrNone, names, options)
    }

    /// Drop every key of this scope that no declaration named.
    pub fn retain_declared(&mut self) {
        let declared = &self.declared;
        let before = self.params.len();
        self.params.retain(|key, _| declared.iter().any(|d| d == key));
        log::debug!(
            "pruned {} undeclared parameter(s) in scope {:?}",
            before - self.params.len(),
            self.scope
        );
    }

    fn declare(&mut self, path: &ParamPath) {
        let root = path.root();
        if !self.declared.iter().any(|d| d == root) {
            self.declared.push(root.to_string());
        }
    }

    fn qualified(&self, path: &ParamPath) -> String {
        qualify(&self.scope, path.segments())
    }

    fn relate(
        &self,
        relation: Relation,
        names: &[&str],
        options: &ParamOptions,
    ) -> Result<(), ParamError> {
        relation.check(&*self.params, names).map_err(|failure| {
            let param = qualify(&self.scope, &[group_name(names)]);
            let summary = format!("Invalid parameters {}", param);
            self.build(param, failure, summary, options)
        })
    }

    fn failure(&self, path: &ParamPath, failure: Failure, options: &ParamOptions) -> ParamError {
        let summary = failure.message.clone();
        self.build(self.qualified(path), failure, summary, options)
    }

    fn build(
        &self,
        param: String,
        failure: Failure,
        summary: String,
        options: &ParamOptions,
    ) -> ParamError {
        let error = ParamError {
            kind: failure.kind,
            param,
            message: failure.message,
            summary: options.message.clone().unwrap_or(summary),
            status: options.status.unwrap_or(self.settings.default_status),
            raise: options.raise || self.settings.always_raise,
        };
        log::warn!("{}", error);
        error
    }
}

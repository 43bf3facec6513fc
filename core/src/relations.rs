//! # RELATIONAL CHECKS
//!
//! Presence constraints over a group of parameter names in one scope.
//! Presence means "not blank"; names may be embedded (`a[b]`).

use crate::errors::{ErrorKind, Failure};
use crate::path::ParamPath;
use crate::types::{is_blank, ParamMap};

/// **RELATION** - Group presence constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// At most one name present.
    OneOf,
    /// At least one name present.
    AnyOf,
    /// Every name present or none.
    AllOrNone,
}

impl Relation {
    /// Error kind reported when the check fails.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Relation::OneOf => ErrorKind::OneOfViolation,
            Relation::AnyOf => ErrorKind::AnyOfViolation,
            Relation::AllOrNone => ErrorKind::AllOrNoneViolation,
        }
    }

    /// Check the relation against `map`. Groups of fewer than two names
    /// always pass.
    pub fn check<S: AsRef<str>>(&self, map: &ParamMap, names: &[S]) -> Result<(), Failure> {
        if names.len() < 2 {
            return Ok(());
        }

        let present = present_count(map, names);
        let violated = match self {
            Relation::OneOf => present > 1,
            Relation::AnyOf => present == 0,
            Relation::AllOrNone => present > 0 && present < names.len(),
        };

        if violated {
            Err(Failure::new(self.kind(), self.detail(&group_name(names))))
        } else {
            Ok(())
        }
    }

    fn detail(&self, group: &str) -> String {
        match self {
            Relation::OneOf => format!("Parameters {} are mutually exclusive", group),
            Relation::AnyOf => format!("One of parameters {} is required", group),
            Relation::AllOrNone => format!("All or none of parameters {} are required", group),
        }
    }
}

/// Number of names in `names` with a non-blank value.
pub fn present_count<S: AsRef<str>>(map: &ParamMap, names: &[S]) -> usize {
    names
        .iter()
        .filter(|name| !is_blank(ParamPath::parse(name.as_ref()).read(map)))
        .count()
}

/// `[a, b, c]`
pub fn group_name<S: AsRef<str>>(names: &[S]) -> String {
    let joined = names
        .iter()
        .map(|name| name.as_ref())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", joined)
}

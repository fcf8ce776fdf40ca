// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for configuration merging.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Which input document a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The template document (defaults).
    Base,
    /// The system document (site overrides).
    Delta,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("template"),
            Self::Delta => f.write_str("system"),
        }
    }
}

/// Errors raised while merging two configuration documents.
///
/// Only structurally malformed input is an error. Missing fields always
/// resolve to a fallback, and keyed array elements without their key pass
/// through unmatched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// A document root is not a JSON object.
    #[error("{side} document root must be a JSON object, found {found}")]
    RootNotObject {
        /// Offending document
        side: Side,
        /// Kind of value found instead
        found: &'static str,
    },

    /// A field merged as an object holds some other kind of value.
    #[error("field `{field}` in the {side} document must be a JSON object, found {found}")]
    FieldNotObject {
        /// Top-level field name
        field: &'static str,
        /// Offending document
        side: Side,
        /// Kind of value found instead
        found: &'static str,
    },
}

/// Result type alias for merge operations
pub type Result<T> = std::result::Result<T, MergeError>;

/// Human-readable name of a JSON value's kind, for diagnostics.
#[must_use]
pub const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! # Error Types
//!
//! Two families of failure exist in this crate and they are kept apart:
//!
//! - **Field errors** ([`FieldError`]) are validation findings about a
//!   replication policy. They are data: the validator reports them to an
//!   [`ErrorSink`](crate::validation::ErrorSink) and never aborts.
//! - **Crate errors** ([`RegsyncError`]) are failures to parse or construct a
//!   value (unknown enum strings, malformed filter payloads, bad glob
//!   patterns, bad timestamps).
//!
//! [`ValidationErrors`] bridges the two: a non-empty list of field errors
//! that implements `std::error::Error` so callers can propagate a rejected
//! policy with `?`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for the replication policy model.
#[derive(Error, Debug)]
pub enum RegsyncError {
    /// A filter type string outside {resource, name, tag, label}.
    #[error("unknown filter type: {0:?}")]
    UnknownFilterType(String),

    /// A trigger type string outside {manual, scheduled, event_based}.
    #[error("unknown trigger type: {0:?}")]
    UnknownTriggerType(String),

    /// A resource type string outside {image, chart}.
    #[error("unknown resource type: {0:?}")]
    UnknownResourceType(String),

    /// A recognised filter type carried a payload of the wrong shape.
    #[error("invalid value for {filter_type} filter: {reason}")]
    InvalidFilterValue {
        /// The filter type whose payload was rejected.
        filter_type: String,
        /// Why the payload was rejected.
        reason: String,
    },

    /// A name or tag pattern could not be compiled.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending glob pattern.
        pattern: String,
        /// The underlying regex compilation failure.
        #[source]
        source: regex::Error,
    },

    /// A timestamp string was not valid RFC 3339.
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The policy failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

/// A single validation finding: the offending field(s) and a message.
///
/// When several fields are jointly responsible the field names are
/// comma-joined into one string, e.g. `src_registry_id, dest_registry_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name(s) as they appear on the wire.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldError {
    /// Build a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The ordered list of findings for a policy that failed validation.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[error("policy validation failed: {}", join_errors(.errors))]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding.
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// True when nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of findings.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Findings in report order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Findings reported against `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Consume into the underlying list.
    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

//! # Policy Validation
//!
//! A policy must pass validation before it is persisted or scheduled.
//! Validation is pure: it reads the policy and reports findings to an
//! [`ErrorSink`]. It never stops early across checks, so callers receive
//! every applicable finding at once. Within the namespace and filter
//! checks only the first offender is reported.
//!
//! Checks run in a fixed order so the report order is deterministic:
//!
//! 1. `name` is non-empty.
//! 2. Exactly one of `src_registry_id` / `dest_registry_id` is local.
//! 3. `src_namespaces` is non-empty and has no empty entry.
//! 4. Every filter type is recognised.
//! 5. The trigger, when present, has a recognised type, and a scheduled
//!    trigger carries a cron expression.

use crate::error::{FieldError, ValidationErrors};
use crate::policy::Policy;
use crate::trigger::{Trigger, TriggerType};

/// Field key for the name check.
pub const FIELD_NAME: &str = "name";
/// Field key for the endpoint check; both fields are jointly responsible.
pub const FIELD_REGISTRIES: &str = "src_registry_id, dest_registry_id";
/// Field key for the source namespace check.
pub const FIELD_SRC_NAMESPACES: &str = "src_namespaces";
/// Field key for the filter check.
pub const FIELD_FILTERS: &str = "filters";
/// Field key for the trigger checks.
pub const FIELD_TRIGGER: &str = "trigger";

/// Receives validation findings.
pub trait ErrorSink {
    /// Record that `field` violates a rule.
    fn report(&mut self, field: &str, message: String);
}

impl ErrorSink for Vec<FieldError> {
    fn report(&mut self, field: &str, message: String) {
        self.push(FieldError::new(field, message));
    }
}

impl ErrorSink for ValidationErrors {
    fn report(&mut self, field: &str, message: String) {
        self.push(FieldError::new(field, message));
    }
}

impl Policy {
    /// Run every check, reporting findings to `sink`.
    pub fn validate_into<S: ErrorSink + ?Sized>(&self, sink: &mut S) {
        if self.name.is_empty() {
            sink.report(FIELD_NAME, "cannot be empty".to_string());
        }

        if self.direction().is_none() {
            sink.report(
                FIELD_REGISTRIES,
                "one of them should be empty and the other one shouldn't be empty".to_string(),
            );
        }

        if self.src_namespaces.is_empty() {
            sink.report(FIELD_SRC_NAMESPACES, "cannot be empty".to_string());
        } else if self.src_namespaces.iter().any(String::is_empty) {
            sink.report(FIELD_SRC_NAMESPACES, "cannot contain empty namespace".to_string());
        }

        if self.filters.iter().any(|f| !f.is_recognized()) {
            sink.report(FIELD_FILTERS, "invalid filter type".to_string());
        }

        if let Some(trigger) = &self.trigger {
            validate_trigger(trigger, sink);
        }
    }

    /// All findings, in report order. Empty means the policy is well-formed.
    pub fn validation_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        self.validate_into(&mut errors);
        errors
    }

    /// `Ok(())` for a well-formed policy, otherwise every finding.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.validate_into(&mut errors);
        tracing::debug!(
            policy = %self.name,
            errors = errors.len(),
            "validated replication policy"
        );
        errors.into_result()
    }

    /// Whether the policy passes validation.
    pub fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }
}

fn validate_trigger<S: ErrorSink + ?Sized>(trigger: &Trigger, sink: &mut S) {
    if trigger.kind.known().is_none() {
        sink.report(FIELD_TRIGGER, "invalid trigger type".to_string());
    }
    if trigger.kind.is_scheduled() && trigger.cron().is_none() {
        sink.report(
            FIELD_TRIGGER,
            format!(
                "the cron string cannot be empty when the trigger type is {}",
                TriggerType::Scheduled
            ),
        );
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::filter::Filter;
    use crate::identity::RegistryId;
    use proptest::prelude::*;

    fn namespaces() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z]{1,8}", 1..6)
    }

    fn known_filter() -> impl Strategy<Value = Filter> {
        prop_oneof![
            "[a-z/*]{0,12}".prop_map(|p| Filter::name(&p).unwrap()),
            "[a-z0-9.*]{0,12}".prop_map(|p| Filter::tag(&p).unwrap()),
            prop::collection::vec("[a-z]{1,6}", 0..3).prop_map(Filter::Label),
        ]
    }

    fn count(p: &Policy, field: &str) -> usize {
        p.validation_errors().iter().filter(|e| e.field == field).count()
    }

    proptest! {
        /// Registry check fails exactly when both ids are local or both are remote.
        #[test]
        fn registry_rule(src in -3i64..4, dest in -3i64..4, ns in namespaces()) {
            let mut p = Policy::new("p", RegistryId(src), RegistryId(dest));
            p.src_namespaces = ns;
            let expect_error = (src == 0) == (dest == 0);
            prop_assert_eq!(count(&p, FIELD_REGISTRIES) == 1, expect_error);
        }

        /// Any number of empty entries yields exactly one namespace finding.
        #[test]
        fn empty_namespace_reported_once(mut ns in namespaces(), holes in prop::collection::vec(0usize..8, 1..4)) {
            for h in holes {
                let at = h.min(ns.len());
                ns.insert(at, String::new());
            }
            let mut p = Policy::new("p", RegistryId::LOCAL, RegistryId(1));
            p.src_namespaces = ns;
            prop_assert_eq!(
                p.validation_errors(),
                vec![FieldError::new(FIELD_SRC_NAMESPACES, "cannot contain empty namespace")]
            );
        }

        /// Any number of unrecognised filters yields exactly one filter finding.
        #[test]
        fn invalid_filter_reported_once(
            known in prop::collection::vec(known_filter(), 0..4),
            bad in prop::collection::vec("[A-Z]{1,6}", 1..4),
        ) {
            let mut p = Policy::new("p", RegistryId::LOCAL, RegistryId(1)).with_src_namespace("ns");
            p.filters = known;
            for t in bad {
                p.filters.push(Filter::Unrecognized { filter_type: t, value: serde_json::Value::Null });
            }
            prop_assert_eq!(count(&p, FIELD_FILTERS), 1);
            prop_assert_eq!(p.validation_errors().len(), 1);
        }

        /// Without a trigger, nothing is ever reported against `trigger`.
        #[test]
        fn absent_trigger_never_reported(name in "[a-z]{0,4}", src in 0i64..3, dest in 0i64..3) {
            let p = Policy::new(name, RegistryId(src), RegistryId(dest));
            prop_assert_eq!(count(&p, FIELD_TRIGGER), 0);
        }

        /// Validation never mutates its input and is deterministic.
        #[test]
        fn validation_is_pure(name in "[a-z]{0,4}", ns in prop::collection::vec("[a-z]{0,3}", 0..4)) {
            let mut p = Policy::new(name, RegistryId::LOCAL, RegistryId(2));
            p.src_namespaces = ns;
            let before = p.clone();
            let first = p.validation_errors();
            let second = p.validation_errors();
            prop_assert_eq!(&p, &before);
            prop_assert_eq!(first, second);
        }
    }
}

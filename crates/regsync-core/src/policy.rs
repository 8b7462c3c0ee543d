//! # Replication Policy
//!
//! The unit of replication configuration. A policy names a source registry
//! and its namespaces, a destination registry and namespace mode, the
//! filters that narrow what is copied, and the trigger that starts a run.
//!
//! ## Endpoint invariant
//!
//! Exactly one endpoint is the local registry (id 0). A policy with a local
//! source pushes to a remote; a policy with a local destination pulls from
//! a remote. [`Policy::direction`] returns `None` when the invariant does
//! not hold; [`Policy::validate`](crate::validation) reports it.
//!
//! ## Destination namespace modes
//!
//! - Empty `dest_namespace`: each source namespace is mirrored under the
//!   same name at the destination.
//! - Non-empty: every source namespace is flattened into that one.

use serde::{Deserialize, Serialize};

use crate::de::null_as_default;
use crate::filter::Filter;
use crate::identity::{PolicyId, RegistryId};
use crate::matcher::{ArtifactMatcher, Candidate};
use crate::temporal::Timestamp;
use crate::trigger::Trigger;

/// Which way artifacts flow relative to the local registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Local source, remote destination.
    Push,
    /// Remote source, local destination.
    Pull,
}

/// A replication policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Assigned by persistence; zero until then.
    #[serde(deserialize_with = "null_as_default")]
    pub id: PolicyId,
    /// Required, non-empty.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Free text.
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// User that created the policy.
    #[serde(deserialize_with = "null_as_default")]
    pub creator: String,

    /// Source registry; zero is local.
    #[serde(deserialize_with = "null_as_default")]
    pub src_registry_id: RegistryId,
    /// Source namespaces, in order. Required, no empty entries.
    #[serde(deserialize_with = "null_as_default")]
    pub src_namespaces: Vec<String>,

    /// Destination registry; zero is local.
    #[serde(deserialize_with = "null_as_default")]
    pub dest_registry_id: RegistryId,
    /// Empty mirrors source namespaces; non-empty flattens into this one.
    #[serde(deserialize_with = "null_as_default")]
    pub dest_namespace: String,

    /// All must match for an artifact to be replicated.
    #[serde(deserialize_with = "null_as_default")]
    pub filters: Vec<Filter>,
    /// Absent means manual only.
    pub trigger: Option<Trigger>,

    /// Propagate deletions to the destination.
    #[serde(deserialize_with = "null_as_default")]
    pub deletion: bool,
    /// Overwrite existing tags at the destination.
    #[serde(rename = "override", deserialize_with = "null_as_default")]
    pub override_existing: bool,

    /// Whether the policy may run.
    #[serde(deserialize_with = "null_as_default")]
    pub enabled: bool,
    /// Set by persistence.
    #[serde(deserialize_with = "null_as_default")]
    pub creation_time: Timestamp,
    /// Set by persistence.
    #[serde(deserialize_with = "null_as_default")]
    pub update_time: Timestamp,
}

impl Policy {
    /// A new, unpersisted policy with the given name and endpoints.
    pub fn new(
        name: impl Into<String>,
        src_registry_id: RegistryId,
        dest_registry_id: RegistryId,
    ) -> Self {
        Self {
            name: name.into(),
            src_registry_id,
            dest_registry_id,
            ..Self::default()
        }
    }

    /// Append a source namespace.
    pub fn with_src_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.src_namespaces.push(namespace.into());
        self
    }

    /// Set the destination namespace.
    pub fn with_dest_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.dest_namespace = namespace.into();
        self
    }

    /// Append a filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the trigger.
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Push or pull, or `None` when not exactly one endpoint is local.
    pub fn direction(&self) -> Option<Direction> {
        match (self.src_registry_id.is_local(), self.dest_registry_id.is_local()) {
            (true, false) => Some(Direction::Push),
            (false, true) => Some(Direction::Pull),
            _ => None,
        }
    }

    /// The non-local endpoint, when the endpoint invariant holds.
    pub fn remote_registry(&self) -> Option<RegistryId> {
        self.direction().map(|d| match d {
            Direction::Push => self.dest_registry_id,
            Direction::Pull => self.src_registry_id,
        })
    }

    /// Whether all source namespaces land in one destination namespace.
    pub fn flattens_namespaces(&self) -> bool {
        !self.dest_namespace.is_empty()
    }

    /// The destination namespace for artifacts from `src_namespace`.
    pub fn destination_namespace_for<'a>(&'a self, src_namespace: &'a str) -> &'a str {
        if self.flattens_namespaces() {
            &self.dest_namespace
        } else {
            src_namespace
        }
    }

    /// Whether the policy applies to `namespace` on either side.
    pub fn involves_namespace(&self, namespace: &str) -> bool {
        self.src_namespaces.iter().any(|ns| ns == namespace) || self.dest_namespace == namespace
    }

    /// Whether the policy's filters select `candidate`.
    pub fn matches(&self, candidate: &Candidate) -> bool {
        self.filters.as_slice().matches(candidate)
    }
}

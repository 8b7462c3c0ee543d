//! # Identifier Newtypes
//!
//! Policies and registries are both identified by 64-bit integers assigned
//! by the persistence layer. Wrapping them keeps a registry reference from
//! being passed where a policy id is expected.
//!
//! Both serialize transparently as bare JSON integers.

use serde::{Deserialize, Serialize};

/// Identifier of a persisted replication policy. Zero means "not yet persisted".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(pub i64);

/// Identifier of a registry endpoint. Zero is the local registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryId(pub i64);

impl PolicyId {
    /// The id carried by a policy before persistence assigns one.
    pub const UNASSIGNED: PolicyId = PolicyId(0);

    /// Whether persistence has assigned this id.
    pub fn is_persisted(&self) -> bool {
        self.0 != 0
    }

    /// Access the raw value.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl RegistryId {
    /// The registry instance that owns the policy configuration.
    pub const LOCAL: RegistryId = RegistryId(0);

    /// Whether this refers to the local registry.
    pub fn is_local(&self) -> bool {
        self.0 == 0
    }

    /// Whether this refers to a remote registry.
    pub fn is_remote(&self) -> bool {
        !self.is_local()
    }

    /// Access the raw value.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for PolicyId {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

impl From<i64> for RegistryId {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

impl std::fmt::Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "policy:{}", self.0)
    }
}

impl std::fmt::Display for RegistryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_local() {
            f.write_str("registry:local")
        } else {
            write!(f, "registry:{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_registry_is_zero() {
        assert!(RegistryId::LOCAL.is_local());
        assert!(RegistryId(0).is_local());
        assert!(RegistryId(7).is_remote());
        assert!(RegistryId(-1).is_remote());
    }

    #[test]
    fn unassigned_policy_id() {
        assert!(!PolicyId::UNASSIGNED.is_persisted());
        assert!(!PolicyId::default().is_persisted());
        assert!(PolicyId(42).is_persisted());
    }

    #[test]
    fn serde_is_transparent() {
        assert_eq!(serde_json::to_string(&RegistryId(5)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&PolicyId(12)).unwrap(), "12");
        let id: RegistryId = serde_json::from_str("9").unwrap();
        assert_eq!(id, RegistryId(9));
    }

    #[test]
    fn display() {
        assert_eq!(RegistryId::LOCAL.to_string(), "registry:local");
        assert_eq!(RegistryId(3).to_string(), "registry:3");
        assert_eq!(PolicyId(4).to_string(), "policy:4");
    }
}

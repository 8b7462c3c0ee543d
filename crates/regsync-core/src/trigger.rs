//! # Replication Triggers
//!
//! A trigger says when a policy fires on its own. On the wire:
//!
//! ```json
//! {"type": "scheduled", "trigger_settings": {"cron": "0 0 * * *"}}
//! ```
//!
//! `trigger_settings` is only meaningful for `scheduled` triggers and is
//! `null` otherwise.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::de::null_as_default;
use crate::error::RegsyncError;

/// The closed set of trigger types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// Runs only when started by an operator.
    Manual,
    /// Runs on a cron schedule.
    Scheduled,
    /// Runs in response to registry events (push, delete).
    EventBased,
}

impl TriggerType {
    /// All trigger types in canonical order.
    pub fn all() -> &'static [TriggerType] {
        &[Self::Manual, Self::Scheduled, Self::EventBased]
    }

    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Scheduled => "scheduled",
            Self::EventBased => "event_based",
        }
    }
}

impl std::fmt::Display for TriggerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerType {
    type Err = RegsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "scheduled" => Ok(Self::Scheduled),
            "event_based" => Ok(Self::EventBased),
            other => Err(RegsyncError::UnknownTriggerType(other.to_string())),
        }
    }
}

/// A trigger type as received: either in the closed set or not.
///
/// Serializes as the bare type string in both cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// A recognised trigger type.
    Known(TriggerType),
    /// A type string outside the closed set.
    Unrecognized(String),
}

impl TriggerKind {
    /// The wire string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(t) => t.as_str(),
            Self::Unrecognized(s) => s,
        }
    }

    /// The recognised type, if any.
    pub fn known(&self) -> Option<TriggerType> {
        match self {
            Self::Known(t) => Some(*t),
            Self::Unrecognized(_) => None,
        }
    }

    /// Whether this is `scheduled`.
    pub fn is_scheduled(&self) -> bool {
        self.known() == Some(TriggerType::Scheduled)
    }
}

/// An absent type is the empty string, which no trigger type matches.
impl Default for TriggerKind {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl From<TriggerType> for TriggerKind {
    fn from(t: TriggerType) -> Self {
        Self::Known(t)
    }
}

impl From<&str> for TriggerKind {
    fn from(s: &str) -> Self {
        match s.parse::<TriggerType>() {
            Ok(t) => Self::Known(t),
            Err(_) => Self::Unrecognized(s.to_string()),
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TriggerKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TriggerKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TriggerKind::from(s.as_str()))
    }
}

/// Settings for a scheduled trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSettings {
    /// Cron expression. Interpreted by the scheduler, not here.
    #[serde(default)]
    pub cron: String,
}

/// When a policy fires automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// Trigger type. Missing or `null` decodes as unrecognised.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: TriggerKind,
    /// Present only for scheduled triggers.
    #[serde(default, rename = "trigger_settings")]
    pub settings: Option<TriggerSettings>,
}

impl Trigger {
    /// A trigger that only fires on operator request.
    pub fn manual() -> Self {
        Self {
            kind: TriggerType::Manual.into(),
            settings: None,
        }
    }

    /// A cron-scheduled trigger.
    pub fn scheduled(cron: impl Into<String>) -> Self {
        Self {
            kind: TriggerType::Scheduled.into(),
            settings: Some(TriggerSettings { cron: cron.into() }),
        }
    }

    /// A trigger driven by registry events.
    pub fn event_based() -> Self {
        Self {
            kind: TriggerType::EventBased.into(),
            settings: None,
        }
    }

    /// The cron expression, when settings are present and non-empty.
    pub fn cron(&self) -> Option<&str> {
        self.settings
            .as_ref()
            .map(|s| s.cron.as_str())
            .filter(|c| !c.is_empty())
    }
}

//! # Replication Filters
//!
//! A filter narrows the set of artifacts a policy replicates. On the wire a
//! filter is `{"type": "<type>", "value": <payload>}` where the payload shape
//! depends on the type:
//!
//! | type | payload | Rust variant |
//! |------|---------|--------------|
//! | `resource` | `"image"` or `"chart"` | [`Filter::Resource`] |
//! | `name` | glob over repository names | [`Filter::Name`] |
//! | `tag` | glob over tags | [`Filter::Tag`] |
//! | `label` | label or list of labels | [`Filter::Label`] |
//!
//! A type string outside that set is kept as [`Filter::Unrecognized`] so a
//! policy carrying it still decodes and the validator can report
//! `invalid filter type`. A recognised type with a payload of the wrong
//! shape is a decode error.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de::null_as_default;
use crate::error::RegsyncError;
use crate::matcher::GlobPattern;

/// The closed set of filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Restricts by artifact kind.
    Resource,
    /// Restricts by repository name.
    Name,
    /// Restricts by tag.
    Tag,
    /// Restricts by attached labels.
    Label,
}

impl FilterType {
    /// All filter types in canonical order.
    pub fn all() -> &'static [FilterType] {
        &[Self::Resource, Self::Name, Self::Tag, Self::Label]
    }

    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::Name => "name",
            Self::Tag => "tag",
            Self::Label => "label",
        }
    }
}

impl std::fmt::Display for FilterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = RegsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resource" => Ok(Self::Resource),
            "name" => Ok(Self::Name),
            "tag" => Ok(Self::Tag),
            "label" => Ok(Self::Label),
            other => Err(RegsyncError::UnknownFilterType(other.to_string())),
        }
    }
}

/// Kind of artifact a `resource` filter selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Container image.
    Image,
    /// Helm chart.
    Chart,
}

impl ResourceType {
    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Chart => "chart",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = RegsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "chart" => Ok(Self::Chart),
            other => Err(RegsyncError::UnknownResourceType(other.to_string())),
        }
    }
}

/// A predicate over artifacts, keyed by filter type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFilter", into = "RawFilter")]
pub enum Filter {
    /// Only artifacts of this kind.
    Resource(ResourceType),
    /// Repository name glob.
    Name(GlobPattern),
    /// Tag glob.
    Tag(GlobPattern),
    /// Every listed label must be attached.
    Label(Vec<String>),
    /// A type outside the closed set; never matches and fails validation.
    Unrecognized {
        /// The type string as received.
        filter_type: String,
        /// The payload as received.
        value: Value,
    },
}

impl Filter {
    /// A repository name filter.
    pub fn name(pattern: &str) -> Result<Self, RegsyncError> {
        Ok(Self::Name(GlobPattern::new(pattern)?))
    }

    /// A tag filter.
    pub fn tag(pattern: &str) -> Result<Self, RegsyncError> {
        Ok(Self::Tag(GlobPattern::new(pattern)?))
    }

    /// The filter's type, or `None` for [`Filter::Unrecognized`].
    pub fn filter_type(&self) -> Option<FilterType> {
        match self {
            Self::Resource(_) => Some(FilterType::Resource),
            Self::Name(_) => Some(FilterType::Name),
            Self::Tag(_) => Some(FilterType::Tag),
            Self::Label(_) => Some(FilterType::Label),
            Self::Unrecognized { .. } => None,
        }
    }

    /// The type string as it appears on the wire.
    pub fn type_str(&self) -> &str {
        match self {
            Self::Unrecognized { filter_type, .. } => filter_type,
            known => known.filter_type().map_or("", |t| t.as_str()),
        }
    }

    /// Whether the type belongs to the closed set.
    pub fn is_recognized(&self) -> bool {
        self.filter_type().is_some()
    }
}

/// Untyped wire shape of a filter. A missing or null `type` decodes as
/// the empty string, which is unrecognised.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawFilter {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    filter_type: String,
    #[serde(default)]
    value: Value,
}

impl TryFrom<RawFilter> for Filter {
    type Error = RegsyncError;

    fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
        let Ok(filter_type) = raw.filter_type.parse::<FilterType>() else {
            return Ok(Filter::Unrecognized {
                filter_type: raw.filter_type,
                value: raw.value,
            });
        };
        let invalid = |reason: &str| RegsyncError::InvalidFilterValue {
            filter_type: filter_type.to_string(),
            reason: reason.to_string(),
        };
        match filter_type {
            FilterType::Resource => match raw.value {
                Value::String(s) => Ok(Filter::Resource(s.parse()?)),
                _ => Err(invalid("expected a resource type string")),
            },
            FilterType::Name => match raw.value {
                Value::String(s) => Filter::name(&s),
                _ => Err(invalid("expected a pattern string")),
            },
            FilterType::Tag => match raw.value {
                Value::String(s) => Filter::tag(&s),
                _ => Err(invalid("expected a pattern string")),
            },
            FilterType::Label => match raw.value {
                Value::String(s) => Ok(Filter::Label(vec![s])),
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s),
                        _ => Err(invalid("labels must be strings")),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Filter::Label),
                _ => Err(invalid("expected a label or a list of labels")),
            },
        }
    }
}

impl From<Filter> for RawFilter {
    fn from(filter: Filter) -> Self {
        let filter_type = filter.type_str().to_string();
        let value = match filter {
            Filter::Resource(r) => Value::String(r.as_str().to_string()),
            Filter::Name(p) | Filter::Tag(p) => Value::String(p.into_string()),
            Filter::Label(labels) => Value::Array(labels.into_iter().map(Value::String).collect()),
            Filter::Unrecognized { value, .. } => value,
        };
        RawFilter { filter_type, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_type_from_str() {
        for t in FilterType::all() {
            assert_eq!(t.as_str().parse::<FilterType>().unwrap(), *t);
        }
        assert!("Name".parse::<FilterType>().is_err());
        assert!("".parse::<FilterType>().is_err());
    }

    #[test]
    fn filter_type_serde_matches_as_str() {
        for t in FilterType::all() {
            assert_eq!(serde_json::to_string(t).unwrap(), format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn decode_name_filter() {
        let f: Filter = serde_json::from_value(json!({"type": "name", "value": "library/**"})).unwrap();
        assert_eq!(f, Filter::name("library/**").unwrap());
        assert_eq!(f.filter_type(), Some(FilterType::Name));
    }

    #[test]
    fn decode_resource_filter() {
        let f: Filter = serde_json::from_value(json!({"type": "resource", "value": "chart"})).unwrap();
        assert_eq!(f, Filter::Resource(ResourceType::Chart));
    }

    #[test]
    fn decode_label_filter_accepts_single_string() {
        let f: Filter = serde_json::from_value(json!({"type": "label", "value": "prod"})).unwrap();
        assert_eq!(f, Filter::Label(vec!["prod".into()]));
    }

    #[test]
    fn decode_label_filter_accepts_list() {
        let f: Filter =
            serde_json::from_value(json!({"type": "label", "value": ["prod", "signed"]})).unwrap();
        assert_eq!(f, Filter::Label(vec!["prod".into(), "signed".into()]));
    }

    #[test]
    fn unknown_type_is_kept_verbatim() {
        let f: Filter = serde_json::from_value(json!({"type": "digest", "value": {"x": 1}})).unwrap();
        assert!(!f.is_recognized());
        assert_eq!(f.type_str(), "digest");
        let back = serde_json::to_value(&f).unwrap();
        assert_eq!(back, json!({"type": "digest", "value": {"x": 1}}));
    }

    #[test]
    fn missing_value_on_unknown_type_decodes_as_null() {
        let f: Filter = serde_json::from_value(json!({"type": "bogus"})).unwrap();
        assert_eq!(
            f,
            Filter::Unrecognized {
                filter_type: "bogus".into(),
                value: Value::Null
            }
        );
    }

    #[test]
    fn missing_or_null_type_decodes_as_unrecognized() {
        let f: Filter = serde_json::from_value(json!({"value": "x"})).unwrap();
        assert_eq!(
            f,
            Filter::Unrecognized {
                filter_type: String::new(),
                value: json!("x")
            }
        );
        let f: Filter = serde_json::from_value(json!({"type": null})).unwrap();
        assert!(!f.is_recognized());
        assert_eq!(f.type_str(), "");
    }

    #[test]
    fn wrong_payload_shape_is_rejected() {
        assert!(serde_json::from_value::<Filter>(json!({"type": "name", "value": 5})).is_err());
        assert!(serde_json::from_value::<Filter>(json!({"type": "tag"})).is_err());
        assert!(serde_json::from_value::<Filter>(json!({"type": "label", "value": [1]})).is_err());
        assert!(serde_json::from_value::<Filter>(json!({"type": "resource", "value": "blob"})).is_err());
    }

    #[test]
    fn encode_uses_type_and_value_keys() {
        let json = serde_json::to_string(&Filter::tag("v1.*").unwrap()).unwrap();
        assert_eq!(json, r#"{"type":"tag","value":"v1.*"}"#);
        let json = serde_json::to_string(&Filter::Label(vec!["a".into()])).unwrap();
        assert_eq!(json, r#"{"type":"label","value":["a"]}"#);
    }
}

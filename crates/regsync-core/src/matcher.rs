//! # Artifact Matching
//!
//! The replication engine decides which artifacts a policy covers by asking
//! each filter whether it matches a [`Candidate`]. Payload interpretation
//! lives here, behind [`ArtifactMatcher`], so the engine never inspects
//! filter payloads itself.
//!
//! ## Pattern syntax
//!
//! Name and tag filters use anchored doublestar globs:
//!
//! - `*` matches any run of characters except `/`.
//! - `**` matches any run of characters including `/`.
//! - `?` matches exactly one character except `/`.
//! - Everything else is literal.
//!
//! An empty pattern matches everything.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RegsyncError;
use crate::filter::{Filter, ResourceType};

/// Something that can decide whether an artifact is in scope.
pub trait ArtifactMatcher {
    /// Whether `candidate` is selected.
    fn matches(&self, candidate: &Candidate) -> bool;
}

/// An artifact as seen by the filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Full repository name including namespace, e.g. `library/nginx`.
    pub repository: String,
    /// Tag under evaluation; `None` when matching at repository level.
    #[serde(default)]
    pub tag: Option<String>,
    /// Labels attached to the artifact.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Artifact kind.
    pub resource: ResourceType,
}

impl Candidate {
    /// An image candidate at repository level.
    pub fn image(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: None,
            labels: Vec::new(),
            resource: ResourceType::Image,
        }
    }

    /// Set the tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Attach a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Set the artifact kind.
    pub fn with_resource(mut self, resource: ResourceType) -> Self {
        self.resource = resource;
        self
    }
}

/// A doublestar glob, compiled once when the filter is built.
///
/// Equality and serialization use the pattern text.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compile `pattern`.
    pub fn new(pattern: &str) -> Result<Self, RegsyncError> {
        let regex = Regex::new(&glob_to_regex(pattern)).map_err(|source| RegsyncError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Consume into the pattern text.
    pub fn into_string(self) -> String {
        self.source
    }

    /// Whether `input` matches the whole pattern.
    pub fn is_match(&self, input: &str) -> bool {
        self.source.is_empty() || self.regex.is_match(input)
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str(".*");
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
        }
    }
    out.push('$');
    out
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for GlobPattern {}

impl std::fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl ArtifactMatcher for Filter {
    fn matches(&self, candidate: &Candidate) -> bool {
        match self {
            Filter::Resource(kind) => candidate.resource == *kind,
            Filter::Name(pattern) => pattern.is_match(&candidate.repository),
            Filter::Tag(pattern) => match &candidate.tag {
                Some(tag) => pattern.is_match(tag),
                None => true,
            },
            Filter::Label(required) => required
                .iter()
                .all(|label| candidate.labels.iter().any(|have| have == label)),
            Filter::Unrecognized { .. } => false,
        }
    }
}

impl ArtifactMatcher for [Filter] {
    fn matches(&self, candidate: &Candidate) -> bool {
        self.iter().all(|f| f.matches(candidate))
    }
}

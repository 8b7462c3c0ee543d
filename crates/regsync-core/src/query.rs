//! # Policy Queries
//!
//! Read-side criteria for listing policies. The persistence layer owns the
//! real query executor; [`PolicyQuery::apply`] is an in-memory executor with
//! the same semantics, used by the CLI and by tests.

use serde::{Deserialize, Serialize};

use crate::policy::Policy;

/// Page selection. Pages are numbered from 1; a page size of 0 disables
/// paging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// 1-based page number. Zero is treated as 1.
    pub page: u64,
    /// Items per page. Zero means unbounded.
    pub page_size: u64,
}

impl Pagination {
    /// Select `page` of `page_size` items.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Number of items to skip.
    pub fn offset(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        let page = self.page.max(1) - 1;
        usize::try_from(page.saturating_mul(self.page_size)).unwrap_or(usize::MAX)
    }

    /// Maximum number of items to return, or `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        match self.page_size {
            0 => None,
            n => Some(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }
}

/// Criteria for listing policies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyQuery {
    /// Substring of the policy name. Empty matches all.
    pub name: String,
    /// A source namespace or the destination namespace. Empty matches all.
    pub namespace: String,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl PolicyQuery {
    /// Whether `policy` satisfies the name and namespace criteria.
    pub fn matches(&self, policy: &Policy) -> bool {
        (self.name.is_empty() || policy.name.contains(&self.name))
            && (self.namespace.is_empty() || policy.involves_namespace(&self.namespace))
    }

    /// Filter `policies` by the criteria, then cut out the requested page.
    pub fn apply<'a, I>(&self, policies: I) -> Vec<&'a Policy>
    where
        I: IntoIterator<Item = &'a Policy>,
    {
        let matching = policies
            .into_iter()
            .filter(|p| self.matches(p))
            .skip(self.pagination.offset());
        match self.pagination.limit() {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}

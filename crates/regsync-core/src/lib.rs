//! # regsync-core — Replication Policy Model
//!
//! Data model and validation rules for registry replication policies. A
//! policy describes how artifacts are copied between the local registry and
//! one remote registry: which namespaces, which artifacts, and when.
//!
//! This crate does no I/O. Persistence, scheduling, and the transfer engine
//! consume these types; they are not implemented here.
//!
//! ## Key Design Principles
//!
//! 1. **Closed enums for filter and trigger types.** `FilterType` and
//!    `TriggerType` are matched exhaustively; a new type is a compile error
//!    at every consumer. Strings outside the set survive decoding only as an
//!    explicit `Unrecognized` variant so the validator can report them.
//!
//! 2. **Typed filter payloads.** `Filter` is a sum type keyed by type.
//!    Payload interpretation sits behind [`ArtifactMatcher`].
//!
//! 3. **Validation is data.** Findings go to an [`ErrorSink`]; the validator
//!    never aborts and reports every check that fails, in a fixed order.
//!
//! 4. **Stable wire format.** Field names are a contract with external
//!    systems and are pinned by tests.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

mod de;
pub mod error;
pub mod filter;
pub mod identity;
pub mod matcher;
pub mod policy;
pub mod query;
pub mod temporal;
pub mod trigger;
pub mod validation;

// Re-export primary types for ergonomic imports.
pub use error::{FieldError, RegsyncError, ValidationErrors};
pub use filter::{Filter, FilterType, ResourceType};
pub use identity::{PolicyId, RegistryId};
pub use matcher::{ArtifactMatcher, Candidate, GlobPattern};
pub use policy::{Direction, Policy};
pub use query::{Pagination, PolicyQuery};
pub use temporal::Timestamp;
pub use trigger::{Trigger, TriggerKind, TriggerSettings, TriggerType};
pub use validation::ErrorSink;

//! `followscope-recon`: follower/following reconciliation engine.
//!
//! Pure engine crate: receives parsed accounts, returns the three relationship
//! sets and the filtered/sorted view over them. No IO.

pub mod collate;
pub mod engine;
pub mod identity;
pub mod model;
pub mod query;

pub use engine::{compare_relationships, reconcile};
pub use identity::{canonical_key, merge_accounts};
pub use model::{Account, ListKind, ParseSummary, RelationshipEntry, RelationshipKind, Relationships};
pub use query::{SearchState, SortDirection, SortField};

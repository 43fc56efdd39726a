//! Pure ranking domain: score rows, player aggregates, the ordering
//! relation and the rank-assignment routine.
//!
//! Nothing in this crate does I/O. The server crate drives these routines
//! against a storage backend; everything here operates on in-memory
//! snapshots and is deterministic.

mod entry;
mod rank;
mod scope;

pub use entry::{PlayerAggregate, ScoreEntry};
pub use rank::{rank, trim_range, MAX_ENTRIES};
pub use scope::{is_level_scope, ScopeKind, ScopeNameError, GLOBAL_SCOPE, PLAYERS_TABLE};

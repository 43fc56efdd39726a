//! Ranked, bounded leaderboards: a global board, per-level boards and
//! per-player aggregates over a row-oriented storage backend.
//!
//! The transport layer is an external collaborator: it deserializes
//! requests into the types in [`service`], calls [`LeaderboardService`],
//! and maps [`ServiceError::kind`] onto its status codes. Everything
//! stateful in between — ingestion, rank recalculation, trimming,
//! aggregate projection — runs behind one single-writer actor per scope.

pub mod config;
pub mod projector;
pub mod scope;
pub mod service;
pub mod storage;
pub mod telemetry;

pub use scope::{ScopeError, ScopeHandle, ScopeManager};
pub use service::{LeaderboardService, ServiceError};
pub use storage::{JsonStore, MemoryStore, RowStore, StorageError};

//! Row-oriented storage contract consumed by the ranking core.
//!
//! The backend exposes scoped tables as append-only row sets with bulk
//! read, batched position writes and contiguous range deletes. There are
//! no transactions; a batch of cell writes is applied as a group but is
//! not isolated from concurrent writers. Serialization of writers is the
//! scope actor's job, not the store's.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so
//! that the futures are guaranteed `Send` — required by `tokio::spawn`.

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use ranking::{PlayerAggregate, ScoreEntry};
use std::future::Future;
use std::ops::Range;

/// Errors from the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown scope: {0}")]
    UnknownScope(String),
}

/// A backend of scoped, append-only row tables plus the player table.
///
/// Row indices refer to insertion order as returned by [`read_all`]; the
/// backend never assigns positions itself.
///
/// [`read_all`]: RowStore::read_all
pub trait RowStore: Send + Sync + 'static {
    /// Append one row at the end of a scope.
    fn append(
        &self,
        scope: &str,
        entry: ScoreEntry,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Every row of a scope, in insertion order.
    fn read_all(
        &self,
        scope: &str,
    ) -> impl Future<Output = Result<Vec<ScoreEntry>, StorageError>> + Send;

    /// Overwrite only the position cell of the given rows, as one batch.
    fn write_positions(
        &self,
        scope: &str,
        updates: &[(usize, u32)],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Replace a single row wholesale (global-scope upsert path).
    fn overwrite_row(
        &self,
        scope: &str,
        index: usize,
        entry: ScoreEntry,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete a contiguous range of rows.
    fn delete_rows(
        &self,
        scope: &str,
        range: Range<usize>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Names of all provisioned scopes (the player table excluded).
    fn list_scopes(&self) -> impl Future<Output = Result<Vec<String>, StorageError>> + Send;

    /// Provision a scope. Idempotent.
    fn create_scope(&self, scope: &str)
        -> impl Future<Output = Result<(), StorageError>> + Send;

    /// All player aggregate rows.
    fn read_players(
        &self,
    ) -> impl Future<Output = Result<Vec<PlayerAggregate>, StorageError>> + Send;

    /// Create or replace a player's aggregate row, keyed by `player_id`.
    fn upsert_player(
        &self,
        player: PlayerAggregate,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

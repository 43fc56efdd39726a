use ranking::ScoreEntry;
use tokio::sync::oneshot;

use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    /// Level scope not provisioned in the backend.
    #[error("unknown scope: {0}")]
    UnknownScope(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("scope worker closed: {0}")]
    WorkerClosed(String),
}

/// Commands sent to a scope actor. Each embeds a oneshot for the reply.
/// All mutations to a scope flow through here and are applied
/// sequentially — this is the serialization point that prevents two
/// interleaved read-sort-write cycles from losing an update.
pub enum ScopeCommand {
    /// Append a new score row and recalculate. Replies with the appended
    /// entry, its position freshly assigned.
    Submit {
        player_id: String,
        player_name: String,
        score: u64,
        levels_completed: u32,
        reply: oneshot::Sender<Result<ScoreEntry, ScopeError>>,
    },
    /// Create or update the single per-player row (global scope) with new
    /// totals, then recalculate. Replies with the player's position.
    UpsertTotals {
        player_id: String,
        player_name: String,
        total_score: u64,
        levels_completed: u32,
        reply: oneshot::Sender<Result<u32, ScopeError>>,
    },
    /// Re-derive positions from a fresh full read and trim. Replies with
    /// the number of rows ranked.
    Recalculate {
        reply: oneshot::Sender<Result<usize, ScopeError>>,
    },
    Shutdown,
}

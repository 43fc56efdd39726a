use std::sync::Arc;

use chrono::Utc;
use ranking::ScoreEntry;
use tokio::sync::mpsc;
use tracing::Instrument;

use super::commands::{ScopeCommand, ScopeError};
use crate::storage::RowStore;

/// The main scope actor loop.
/// Single writer for its scope: commands are processed sequentially, so a
/// submission's read-sort-write-trim cycle can never interleave with
/// another writer's.
pub(crate) async fn run_scope_actor<S: RowStore>(
    scope: String,
    store: Arc<S>,
    cmd_rx: mpsc::Receiver<ScopeCommand>,
) {
    let span = tracing::info_span!("scope", id = %scope);
    run_scope_actor_inner(scope, store, cmd_rx).instrument(span).await;
}

async fn run_scope_actor_inner<S: RowStore>(
    scope: String,
    store: Arc<S>,
    mut cmd_rx: mpsc::Receiver<ScopeCommand>,
) {
    tracing::debug!("Scope actor started");

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            ScopeCommand::Submit {
                player_id,
                player_name,
                score,
                levels_completed,
                reply,
            } => {
                let result =
                    handle_submit(&scope, &*store, player_id, player_name, score, levels_completed)
                        .await;
                let _ = reply.send(result);
            }
            ScopeCommand::UpsertTotals {
                player_id,
                player_name,
                total_score,
                levels_completed,
                reply,
            } => {
                let result = handle_upsert(
                    &scope,
                    &*store,
                    player_id,
                    player_name,
                    total_score,
                    levels_completed,
                )
                .await;
                let _ = reply.send(result);
            }
            ScopeCommand::Recalculate { reply } => {
                let _ = reply.send(recalculate(&scope, &*store).await);
            }
            ScopeCommand::Shutdown => break,
        }
    }

    tracing::debug!("Scope actor exited");
}

/// Append a row with placeholder position 0, then recalculate.
///
/// Append and recalculation are separate storage steps so that a failed
/// recalculation can be retried without re-appending; recalculation is
/// idempotent because it recomputes absolute positions from a full read.
async fn handle_submit<S: RowStore>(
    scope: &str,
    store: &S,
    player_id: String,
    player_name: String,
    score: u64,
    levels_completed: u32,
) -> Result<ScoreEntry, ScopeError> {
    let entry = ScoreEntry::new(player_id, player_name, score)
        .with_levels_completed(levels_completed);
    store.append(scope, entry.clone()).await?;
    recalculate(scope, store).await?;

    // The appended row sits at the back of storage order, so front-of-order
    // trimming cannot have evicted it.
    let rows = store.read_all(scope).await?;
    let position = rows
        .iter()
        .rev()
        .find(|r| r.player_id == entry.player_id && r.timestamp == entry.timestamp)
        .map(|r| r.position)
        .unwrap_or(0);

    tracing::info!(player_id = %entry.player_id, score, position, "Score submitted");
    Ok(ScoreEntry { position, ..entry })
}

/// Update-or-append the player's single row, then recalculate.
/// Returns the player's freshly assigned position.
async fn handle_upsert<S: RowStore>(
    scope: &str,
    store: &S,
    player_id: String,
    player_name: String,
    total_score: u64,
    levels_completed: u32,
) -> Result<u32, ScopeError> {
    let rows = store.read_all(scope).await?;
    let existing = rows.iter().position(|r| r.player_id == player_id);

    let entry = ScoreEntry {
        position: existing.map(|i| rows[i].position).unwrap_or(0),
        player_id: player_id.clone(),
        player_name,
        score: total_score,
        timestamp: Utc::now(),
        levels_completed,
    };

    match existing {
        Some(index) => store.overwrite_row(scope, index, entry).await?,
        None => store.append(scope, entry).await?,
    }
    recalculate(scope, store).await?;

    let rows = store.read_all(scope).await?;
    let position = rows
        .iter()
        .find(|r| r.player_id == player_id)
        .map(|r| r.position)
        .unwrap_or(0);

    tracing::info!(player_id = %player_id, total_score, position, "Totals upserted");
    Ok(position)
}

/// Read every row, trim the scope to its bound, then assign positions
/// over the surviving snapshot, writing back only the cells that changed.
///
/// Trimming happens before the position write so the surviving rows are
/// always a gapless 1..=N permutation — ranking first would leave stale
/// positions behind whenever the evicted oldest row is not the
/// bottom-ranked one.
pub(crate) async fn recalculate<S: RowStore>(
    scope: &str,
    store: &S,
) -> Result<usize, ScopeError> {
    let mut rows = store.read_all(scope).await?;
    if let Some(range) = ranking::trim_range(rows.len()) {
        tracing::debug!(evicted = range.len(), "Trimming scope to bound");
        store.delete_rows(scope, range.clone()).await?;
        rows.drain(range);
    }
    let changes = ranking::rank(&rows);
    if !changes.is_empty() {
        store.write_positions(scope, &changes).await?;
    }
    tracing::debug!(rows = rows.len(), rewritten = changes.len(), "Recalculated");
    Ok(rows.len())
}

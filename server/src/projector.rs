//! Aggregate projector: folds a player's best per-level results into the
//! player table and the global scope.
//!
//! Cost model is explicit: every projection is a full rescan of every
//! level scope for the one player, O(scopes × rows). There is no
//! incremental index; keeping the rescan keeps the projection trivially
//! recomputable from storage alone.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use ranking::PlayerAggregate;
use tokio::sync::Mutex;

use crate::scope::{ScopeError, ScopeManager};
use crate::storage::{RowStore, StorageError};

/// The player's best score in every level scope where they have at least
/// one entry, keyed by scope name.
pub async fn level_bests<S: RowStore>(
    store: &S,
    player_id: &str,
) -> Result<Vec<(String, u64)>, StorageError> {
    let mut bests = Vec::new();
    for scope in store.list_scopes().await? {
        if !ranking::is_level_scope(&scope) {
            continue;
        }
        let best = store
            .read_all(&scope)
            .await?
            .iter()
            .filter(|r| r.player_id == player_id)
            .map(|r| r.score)
            .max();
        if let Some(best) = best {
            bests.push((scope, best));
        }
    }
    Ok(bests)
}

/// Recomputes player totals and pushes them into the player table and
/// the global scope (which is then re-ranked by its actor).
///
/// The scope actors only serialize writers of the *same* scope, so two
/// submissions by one player to different level scopes would otherwise
/// race their scan-compute-upsert cycles and the slower scan could
/// persist a stale total. Projections are therefore serialized per
/// player: the lock is held across the whole scan and upsert, and the
/// last projection to run always scans after every earlier append.
#[derive(Default)]
pub struct Projector {
    player_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    async fn player_lock(&self, player_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.player_locks.lock().await;
        locks
            .entry(player_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Recompute a player's totals and push them into the player table
    /// and the global scope.
    pub async fn project<S: RowStore>(
        &self,
        manager: &ScopeManager<S>,
        player_id: &str,
        player_name: &str,
    ) -> Result<PlayerAggregate, ScopeError> {
        let lock = self.player_lock(player_id).await;
        let _guard = lock.lock().await;

        let store = manager.store();
        let bests = level_bests(store.as_ref(), player_id).await?;
        let total_score: u64 = bests.iter().map(|(_, best)| best).sum();
        let levels_completed = bests.iter().filter(|(_, best)| *best > 0).count() as u32;

        // The upsert and the global recalculation run in the same actor
        // turn, so the position read back here is the one this projection
        // produced.
        let global = manager.global().await;
        let global_position = global
            .upsert_totals(player_id, player_name, total_score, levels_completed)
            .await?;

        let now = Utc::now();
        let created_at = store
            .read_players()
            .await?
            .iter()
            .find(|p| p.player_id == player_id)
            .map(|p| p.created_at)
            .unwrap_or(now);

        let aggregate = PlayerAggregate {
            player_id: player_id.to_string(),
            player_name: player_name.to_string(),
            created_at,
            last_record_at: now,
            levels_completed,
            total_score,
            global_position,
        };
        store.upsert_player(aggregate.clone()).await?;

        tracing::info!(
            player_id,
            total_score,
            levels_completed,
            global_position,
            "Projected player aggregate"
        );
        Ok(aggregate)
    }
}

//! Row types shared by every scope table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One row in a scope's table.
///
/// Created on submission with `position == 0` (not yet ranked); only the
/// `position` field is ever rewritten afterwards, by recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// 1-based rank within the scope after the last recalculation; 0 before.
    #[serde(default)]
    pub position: u32,
    pub player_id: String,
    pub player_name: String,
    pub score: u64,
    /// Submission instant; used only for tie-break ordering.
    pub timestamp: DateTime<Utc>,
    /// Meaningful only in the global scope; defaults to 0 elsewhere.
    #[serde(default)]
    pub levels_completed: u32,
}

impl ScoreEntry {
    /// A fresh, unranked entry timestamped now.
    pub fn new(player_id: impl Into<String>, player_name: impl Into<String>, score: u64) -> Self {
        Self {
            position: 0,
            player_id: player_id.into(),
            player_name: player_name.into(),
            score,
            timestamp: Utc::now(),
            levels_completed: 0,
        }
    }

    pub fn with_levels_completed(mut self, levels_completed: u32) -> Self {
        self.levels_completed = levels_completed;
        self
    }

    /// Ranking order within a scope: higher score first; on equal scores the
    /// later submission wins the tie. Deterministic by policy, not an
    /// accident of insertion order.
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.timestamp.cmp(&self.timestamp))
    }
}

/// One row per player in the player table.
///
/// `total_score` is the sum of the player's best score in every level
/// scope; `levels_completed` counts the level scopes where the player has
/// at least one entry; `global_position` mirrors the player's rank in the
/// global scope after its last recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAggregate {
    pub player_id: String,
    pub player_name: String,
    pub created_at: DateTime<Utc>,
    pub last_record_at: DateTime<Utc>,
    pub levels_completed: u32,
    pub total_score: u64,
    pub global_position: u32,
}

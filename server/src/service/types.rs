//! Request and response shapes consumed by the transport layer.
//!
//! Request fields are `Option` so that absence is distinguishable from an
//! empty value; validation turns absence into a `Validation` error before
//! any storage call.

use chrono::{DateTime, Utc};
use ranking::ScoreEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitGlobalRequest {
    pub player_id: Option<String>,
    pub player_name: Option<String>,
    pub score: Option<u64>,
    pub levels_completed: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitLevelRequest {
    pub player_id: Option<String>,
    pub player_name: Option<String>,
    pub level_id: Option<String>,
    pub language: Option<String>,
    pub difficulty: Option<String>,
    pub score: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub position: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub position: u32,
    pub player_id: String,
    pub player_name: String,
    pub score: u64,
    pub levels_completed: u32,
    pub timestamp: DateTime<Utc>,
}

impl From<ScoreEntry> for LeaderboardRow {
    fn from(entry: ScoreEntry) -> Self {
        Self {
            position: entry.position,
            player_id: entry.player_id,
            player_name: entry.player_name,
            score: entry.score,
            levels_completed: entry.levels_completed,
            timestamp: entry.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerInfoResponse {
    pub player_id: String,
    pub player_name: String,
    pub levels_completed: u32,
    pub total_score: u64,
    pub global_position: u32,
    /// Best score per level scope, keyed by scope name.
    pub level_scores: BTreeMap<String, u64>,
}

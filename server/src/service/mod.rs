//! The leaderboard API the surrounding transport layer consumes.
//!
//! Every operation validates its input before touching storage, drives
//! the submission pipeline through the scope actors, and surfaces
//! failures through the [`ServiceError`] taxonomy: a machine-readable
//! kind plus a human-readable message, never swallowed.

mod types;

use std::collections::BTreeMap;
use std::sync::Arc;

use ranking::{ScopeKind, MAX_ENTRIES};

use crate::projector::{self, Projector};
use crate::scope::{ScopeError, ScopeManager};
use crate::storage::{RowStore, StorageError};

pub use types::{
    LeaderboardRow, PlayerInfoResponse, SubmitGlobalRequest, SubmitLevelRequest, SubmitResponse,
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("scope not found: {0}")]
    ScopeNotFound(String),
    #[error("player not found: {0}")]
    PlayerNotFound(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] StorageError),
    /// Reserved for optimistic-versioning backends; the single-writer
    /// actors never produce it.
    #[error("conflicting update: {0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Machine-readable error kind for the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::ScopeNotFound(_) => "scope_not_found",
            Self::PlayerNotFound(_) => "player_not_found",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnknownScope(scope) => Self::ScopeNotFound(scope),
            other => Self::StorageUnavailable(other),
        }
    }
}

impl From<ScopeError> for ServiceError {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::UnknownScope(scope) => Self::ScopeNotFound(scope),
            ScopeError::Storage(storage) => storage.into(),
            ScopeError::WorkerClosed(scope) => {
                Self::Internal(format!("scope worker closed: {scope}"))
            }
        }
    }
}

/// The service facade.
pub struct LeaderboardService<S: RowStore> {
    manager: ScopeManager<S>,
    projector: Projector,
}

impl<S: RowStore> LeaderboardService<S> {
    pub async fn new(store: Arc<S>) -> Result<Self, ServiceError> {
        let manager = ScopeManager::new(store).await?;
        Ok(Self {
            manager,
            projector: Projector::new(),
        })
    }

    pub fn manager(&self) -> &ScopeManager<S> {
        &self.manager
    }

    /// Append a score row to the global scope and re-rank it.
    pub async fn submit_global(
        &self,
        req: SubmitGlobalRequest,
    ) -> Result<SubmitResponse, ServiceError> {
        let player_id = require(&req.player_id, "playerId")?;
        let player_name = require(&req.player_name, "playerName")?;
        let score = require_score(req.score)?;
        tracing::info!(player_id = %player_id, score, "submit_global");

        let entry = self
            .manager
            .global()
            .await
            .submit(player_id, player_name, score, req.levels_completed.unwrap_or(0))
            .await?;
        Ok(SubmitResponse {
            position: entry.position,
        })
    }

    /// The full level pipeline: append to the level scope, re-rank it,
    /// then project the player's totals into the global scope.
    pub async fn submit_level(
        &self,
        req: SubmitLevelRequest,
    ) -> Result<SubmitResponse, ServiceError> {
        let player_id = require(&req.player_id, "playerId")?;
        let player_name = require(&req.player_name, "playerName")?;
        let level_id = require(&req.level_id, "levelId")?;
        let language = require(&req.language, "language")?;
        let difficulty = require(&req.difficulty, "difficulty")?;
        let score = require_score(req.score)?;

        let scope = ScopeKind::level(level_id, language, difficulty)
            .map_err(|e| ServiceError::Validation(e.to_string()))?
            .name();
        tracing::info!(player_id = %player_id, scope = %scope, score, "submit_level");

        let handle = self.manager.level(&scope).await?;
        let entry = handle
            .submit(player_id.clone(), player_name.clone(), score, 0)
            .await?;

        self.projector
            .project(&self.manager, &player_id, &player_name)
            .await?;

        Ok(SubmitResponse {
            position: entry.position,
        })
    }

    /// Top rows of the global scope, ordered by stored position.
    pub async fn global_leaderboard(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<LeaderboardRow>, ServiceError> {
        tracing::debug!("global_leaderboard");
        self.query(ranking::GLOBAL_SCOPE, limit).await
    }

    /// Top rows of one level scope, ordered by stored position.
    pub async fn level_leaderboard(
        &self,
        level_id: &str,
        language: &str,
        difficulty: &str,
        limit: Option<usize>,
    ) -> Result<Vec<LeaderboardRow>, ServiceError> {
        let scope = ScopeKind::level(level_id, language, difficulty)
            .map_err(|e| ServiceError::Validation(e.to_string()))?
            .name();
        tracing::debug!(scope = %scope, "level_leaderboard");
        self.query(&scope, limit).await
    }

    /// Read-only projection of a scope's ranked rows. Trusts the stored
    /// positions from the last recalculation rather than re-sorting by
    /// score; unranked rows (position 0) sort last.
    async fn query(
        &self,
        scope: &str,
        limit: Option<usize>,
    ) -> Result<Vec<LeaderboardRow>, ServiceError> {
        let mut rows = self.manager.store().read_all(scope).await?;
        rows.sort_by_key(|r| if r.position == 0 { u32::MAX } else { r.position });
        rows.truncate(limit.unwrap_or(MAX_ENTRIES));
        Ok(rows.into_iter().map(LeaderboardRow::from).collect())
    }

    /// A player's aggregate row plus their best score per level scope.
    pub async fn player_info(&self, player_id: &str) -> Result<PlayerInfoResponse, ServiceError> {
        if player_id.trim().is_empty() {
            return Err(ServiceError::Validation("playerId is required".into()));
        }
        tracing::debug!(player_id = %player_id, "player_info");

        let store = self.manager.store();
        let aggregate = store
            .read_players()
            .await?
            .into_iter()
            .find(|p| p.player_id == player_id)
            .ok_or_else(|| ServiceError::PlayerNotFound(player_id.to_string()))?;

        let level_scores: BTreeMap<String, u64> = projector::level_bests(store.as_ref(), player_id)
            .await?
            .into_iter()
            .collect();

        Ok(PlayerInfoResponse {
            player_id: aggregate.player_id,
            player_name: aggregate.player_name,
            levels_completed: aggregate.levels_completed,
            total_score: aggregate.total_score,
            global_position: aggregate.global_position,
            level_scores,
        })
    }

    pub async fn shutdown(&self) {
        self.manager.shutdown().await;
    }
}

fn require(field: &Option<String>, name: &str) -> Result<String, ServiceError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => Err(ServiceError::Validation(format!("{name} is required"))),
    }
}

fn require_score(score: Option<u64>) -> Result<u64, ServiceError> {
    match score {
        Some(score) if score > 0 => Ok(score),
        Some(_) => Err(ServiceError::Validation("score must be positive".into())),
        None => Err(ServiceError::Validation("score is required".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    async fn service() -> LeaderboardService<MemoryStore> {
        LeaderboardService::new(Arc::new(MemoryStore::new()))
            .await
            .unwrap()
    }

    fn global_req(player: &str, score: Option<u64>) -> SubmitGlobalRequest {
        SubmitGlobalRequest {
            player_id: Some(player.to_string()),
            player_name: Some(player.to_uppercase()),
            score,
            levels_completed: None,
        }
    }

    #[tokio::test]
    async fn missing_score_is_rejected_before_any_storage_call() {
        let store = Arc::new(MemoryStore::new());
        let svc = LeaderboardService::new(store.clone()).await.unwrap();
        // With storage down, only a pre-storage rejection can produce a
        // validation error.
        store.set_failing(true);
        let err = svc.submit_global(global_req("p1", None)).await.unwrap_err();
        assert_eq!(err.kind(), "validation_error");
    }

    #[tokio::test]
    async fn zero_score_is_rejected() {
        let svc = service().await;
        let err = svc.submit_global(global_req("p1", Some(0))).await.unwrap_err();
        assert_eq!(err.kind(), "validation_error");
    }

    #[tokio::test]
    async fn empty_player_name_is_rejected() {
        let svc = service().await;
        let req = SubmitGlobalRequest {
            player_id: Some("p1".into()),
            player_name: Some("   ".into()),
            score: Some(10),
            levels_completed: None,
        };
        let err = svc.submit_global(req).await.unwrap_err();
        assert_eq!(err.kind(), "validation_error");
    }

    #[tokio::test]
    async fn level_submission_requires_the_full_tuple() {
        let svc = service().await;
        let req = SubmitLevelRequest {
            player_id: Some("p1".into()),
            player_name: Some("Alice".into()),
            level_id: Some("1".into()),
            language: None,
            difficulty: Some("easy".into()),
            score: Some(10),
        };
        let err = svc.submit_level(req).await.unwrap_err();
        assert_eq!(err.kind(), "validation_error");
    }

    #[tokio::test]
    async fn unknown_player_info_is_not_found() {
        let svc = service().await;
        let err = svc.player_info("ghost").await.unwrap_err();
        assert_eq!(err.kind(), "player_not_found");
    }

    #[tokio::test]
    async fn storage_outage_maps_to_storage_unavailable() {
        let store = Arc::new(MemoryStore::new());
        let svc = LeaderboardService::new(store.clone()).await.unwrap();
        store.set_failing(true);
        let err = svc.submit_global(global_req("p1", Some(10))).await.unwrap_err();
        assert_eq!(err.kind(), "storage_unavailable");
    }

    #[tokio::test]
    async fn global_submissions_are_ranked() {
        let svc = service().await;
        svc.submit_global(global_req("a", Some(500))).await.unwrap();
        svc.submit_global(global_req("b", Some(800))).await.unwrap();
        let c = svc.submit_global(global_req("c", Some(500))).await.unwrap();
        assert_eq!(c.position, 2);

        let board = svc.global_leaderboard(None).await.unwrap();
        let ids: Vec<&str> = board.iter().map(|r| r.player_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(board[0].position, 1);
    }

    #[tokio::test]
    async fn leaderboard_respects_the_limit() {
        let svc = service().await;
        for i in 0..10 {
            svc.submit_global(global_req(&format!("p{i}"), Some(i + 1)))
                .await
                .unwrap();
        }
        let board = svc.global_leaderboard(Some(3)).await.unwrap();
        assert_eq!(board.len(), 3);
        assert_eq!(
            board.iter().map(|r| r.position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }
}

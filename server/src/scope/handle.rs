use ranking::ScoreEntry;
use tokio::sync::{mpsc, oneshot};

use super::commands::{ScopeCommand, ScopeError};

/// Cheap, cloneable handle to a scope actor.
#[derive(Clone, Debug)]
pub struct ScopeHandle {
    name: String,
    cmd_tx: mpsc::Sender<ScopeCommand>,
}

impl ScopeHandle {
    pub(crate) fn new(name: String, cmd_tx: mpsc::Sender<ScopeCommand>) -> Self {
        Self { name, cmd_tx }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn submit(
        &self,
        player_id: impl Into<String>,
        player_name: impl Into<String>,
        score: u64,
        levels_completed: u32,
    ) -> Result<ScoreEntry, ScopeError> {
        let (tx, rx) = oneshot::channel();
        self.send(ScopeCommand::Submit {
            player_id: player_id.into(),
            player_name: player_name.into(),
            score,
            levels_completed,
            reply: tx,
        })
        .await?;
        rx.await
            .map_err(|_| ScopeError::WorkerClosed(self.name.clone()))?
    }

    pub async fn upsert_totals(
        &self,
        player_id: impl Into<String>,
        player_name: impl Into<String>,
        total_score: u64,
        levels_completed: u32,
    ) -> Result<u32, ScopeError> {
        let (tx, rx) = oneshot::channel();
        self.send(ScopeCommand::UpsertTotals {
            player_id: player_id.into(),
            player_name: player_name.into(),
            total_score,
            levels_completed,
            reply: tx,
        })
        .await?;
        rx.await
            .map_err(|_| ScopeError::WorkerClosed(self.name.clone()))?
    }

    pub async fn recalculate(&self) -> Result<usize, ScopeError> {
        let (tx, rx) = oneshot::channel();
        self.send(ScopeCommand::Recalculate { reply: tx }).await?;
        rx.await
            .map_err(|_| ScopeError::WorkerClosed(self.name.clone()))?
    }

    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(ScopeCommand::Shutdown).await;
    }

    async fn send(&self, cmd: ScopeCommand) -> Result<(), ScopeError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| ScopeError::WorkerClosed(self.name.clone()))
    }
}

pub mod actor;
pub mod commands;
pub mod handle;

use std::collections::HashMap;
use std::sync::Arc;

use ranking::GLOBAL_SCOPE;
use tokio::sync::{mpsc, RwLock};

use crate::storage::{RowStore, StorageError};
use actor::run_scope_actor;
pub use commands::ScopeError;
pub use handle::ScopeHandle;

/// Manages the single-writer actors, one per scope.
///
/// The global scope is provisioned on construction and always reachable;
/// level scopes must already exist in the backend (they are provisioned
/// out of band, one per level/language/difficulty combination) or lookup
/// fails with [`ScopeError::UnknownScope`].
pub struct ScopeManager<S: RowStore> {
    store: Arc<S>,
    handles: RwLock<HashMap<String, ScopeHandle>>,
}

impl<S: RowStore> ScopeManager<S> {
    pub async fn new(store: Arc<S>) -> Result<Self, StorageError> {
        store.create_scope(GLOBAL_SCOPE).await?;
        Ok(Self {
            store,
            handles: RwLock::new(HashMap::new()),
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Handle to the global scope's actor.
    pub async fn global(&self) -> ScopeHandle {
        self.get_or_spawn(GLOBAL_SCOPE).await
    }

    /// Handle to a provisioned level scope's actor.
    pub async fn level(&self, scope: &str) -> Result<ScopeHandle, ScopeError> {
        {
            let handles = self.handles.read().await;
            if let Some(handle) = handles.get(scope) {
                return Ok(handle.clone());
            }
        }
        let known = self.store.list_scopes().await.map_err(ScopeError::from)?;
        if !known.iter().any(|s| s == scope) {
            return Err(ScopeError::UnknownScope(scope.to_string()));
        }
        Ok(self.get_or_spawn(scope).await)
    }

    /// Get-or-spawn under the write lock so two callers can never race
    /// into spawning two writers for the same scope.
    async fn get_or_spawn(&self, scope: &str) -> ScopeHandle {
        let mut handles = self.handles.write().await;
        if let Some(handle) = handles.get(scope) {
            return handle.clone();
        }
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        tokio::spawn(run_scope_actor(
            scope.to_string(),
            self.store.clone(),
            cmd_rx,
        ));
        let handle = ScopeHandle::new(scope.to_string(), cmd_tx);
        handles.insert(scope.to_string(), handle.clone());
        handle
    }

    /// Shut down every running actor.
    pub async fn shutdown(&self) {
        let mut handles = self.handles.write().await;
        for (_, handle) in handles.drain() {
            handle.shutdown().await;
        }
    }
}

//! In-memory backend for tests and the concurrency stress suite.

use super::{RowStore, StorageError};
use ranking::{PlayerAggregate, ScoreEntry};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// HashMap-backed [`RowStore`].
///
/// Supports injected outages: while `set_failing(true)` is in effect every
/// operation fails with an IO error, so callers' `StorageUnavailable`
/// paths can be exercised.
#[derive(Default)]
pub struct MemoryStore {
    scopes: Mutex<HashMap<String, Vec<ScoreEntry>>>,
    players: Mutex<Vec<PlayerAggregate>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle injected storage outage.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other(
                "injected storage outage",
            )));
        }
        Ok(())
    }
}

impl RowStore for MemoryStore {
    async fn append(&self, scope: &str, entry: ScoreEntry) -> Result<(), StorageError> {
        self.check_available()?;
        let mut scopes = self.scopes.lock().unwrap();
        let rows = scopes
            .get_mut(scope)
            .ok_or_else(|| StorageError::UnknownScope(scope.to_string()))?;
        rows.push(entry);
        Ok(())
    }

    async fn read_all(&self, scope: &str) -> Result<Vec<ScoreEntry>, StorageError> {
        self.check_available()?;
        let scopes = self.scopes.lock().unwrap();
        scopes
            .get(scope)
            .cloned()
            .ok_or_else(|| StorageError::UnknownScope(scope.to_string()))
    }

    async fn write_positions(
        &self,
        scope: &str,
        updates: &[(usize, u32)],
    ) -> Result<(), StorageError> {
        self.check_available()?;
        let mut scopes = self.scopes.lock().unwrap();
        let rows = scopes
            .get_mut(scope)
            .ok_or_else(|| StorageError::UnknownScope(scope.to_string()))?;
        for &(index, position) in updates {
            if let Some(row) = rows.get_mut(index) {
                row.position = position;
            }
        }
        Ok(())
    }

    async fn overwrite_row(
        &self,
        scope: &str,
        index: usize,
        entry: ScoreEntry,
    ) -> Result<(), StorageError> {
        self.check_available()?;
        let mut scopes = self.scopes.lock().unwrap();
        let rows = scopes
            .get_mut(scope)
            .ok_or_else(|| StorageError::UnknownScope(scope.to_string()))?;
        if let Some(row) = rows.get_mut(index) {
            *row = entry;
        }
        Ok(())
    }

    async fn delete_rows(&self, scope: &str, range: Range<usize>) -> Result<(), StorageError> {
        self.check_available()?;
        let mut scopes = self.scopes.lock().unwrap();
        let rows = scopes
            .get_mut(scope)
            .ok_or_else(|| StorageError::UnknownScope(scope.to_string()))?;
        let end = range.end.min(rows.len());
        if range.start < end {
            rows.drain(range.start..end);
        }
        Ok(())
    }

    async fn list_scopes(&self) -> Result<Vec<String>, StorageError> {
        self.check_available()?;
        let scopes = self.scopes.lock().unwrap();
        let mut names: Vec<String> = scopes.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn create_scope(&self, scope: &str) -> Result<(), StorageError> {
        self.check_available()?;
        let mut scopes = self.scopes.lock().unwrap();
        scopes.entry(scope.to_string()).or_default();
        Ok(())
    }

    async fn read_players(&self) -> Result<Vec<PlayerAggregate>, StorageError> {
        self.check_available()?;
        Ok(self.players.lock().unwrap().clone())
    }

    async fn upsert_player(&self, player: PlayerAggregate) -> Result<(), StorageError> {
        self.check_available()?;
        let mut players = self.players.lock().unwrap();
        match players.iter_mut().find(|p| p.player_id == player.player_id) {
            Some(existing) => *existing = player,
            None => players.push(player),
        }
        Ok(())
    }
}

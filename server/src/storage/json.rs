//! File-backed [`RowStore`]: one JSON file per scope under a data
//! directory, plus `players.json` for the aggregate table.

use super::{RowStore, StorageError};
use ranking::{PlayerAggregate, ScoreEntry};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// JSON-file-per-scope persistence store.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn scope_path(&self, scope: &str) -> PathBuf {
        self.dir.join(format!("{scope}.json"))
    }

    fn players_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", ranking::PLAYERS_TABLE))
    }

    fn load_rows(&self, scope: &str) -> Result<Vec<ScoreEntry>, StorageError> {
        let path = self.scope_path(scope);
        if !path.exists() {
            return Err(StorageError::UnknownScope(scope.to_string()));
        }
        read_json(&path)
    }

    fn save_rows(&self, scope: &str, rows: &[ScoreEntry]) -> Result<(), StorageError> {
        write_json(&self.scope_path(scope), rows)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

impl RowStore for JsonStore {
    async fn append(&self, scope: &str, entry: ScoreEntry) -> Result<(), StorageError> {
        let mut rows = self.load_rows(scope)?;
        rows.push(entry);
        self.save_rows(scope, &rows)
    }

    async fn read_all(&self, scope: &str) -> Result<Vec<ScoreEntry>, StorageError> {
        self.load_rows(scope)
    }

    async fn write_positions(
        &self,
        scope: &str,
        updates: &[(usize, u32)],
    ) -> Result<(), StorageError> {
        let mut rows = self.load_rows(scope)?;
        for &(index, position) in updates {
            if let Some(row) = rows.get_mut(index) {
                row.position = position;
            }
        }
        self.save_rows(scope, &rows)
    }

    async fn overwrite_row(
        &self,
        scope: &str,
        index: usize,
        entry: ScoreEntry,
    ) -> Result<(), StorageError> {
        let mut rows = self.load_rows(scope)?;
        if let Some(row) = rows.get_mut(index) {
            *row = entry;
        }
        self.save_rows(scope, &rows)
    }

    async fn delete_rows(&self, scope: &str, range: Range<usize>) -> Result<(), StorageError> {
        let mut rows = self.load_rows(scope)?;
        let end = range.end.min(rows.len());
        if range.start < end {
            rows.drain(range.start..end);
        }
        self.save_rows(scope, &rows)
    }

    async fn list_scopes(&self) -> Result<Vec<String>, StorageError> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if stem != ranking::PLAYERS_TABLE => names.push(stem.to_string()),
                Some(_) => {}
                None => tracing::warn!("Skipping unreadable store file {:?}", path),
            }
        }
        names.sort();
        Ok(names)
    }

    async fn create_scope(&self, scope: &str) -> Result<(), StorageError> {
        self.ensure_dir()?;
        let path = self.scope_path(scope);
        if !path.exists() {
            write_json(&path, &Vec::<ScoreEntry>::new())?;
        }
        Ok(())
    }

    async fn read_players(&self) -> Result<Vec<PlayerAggregate>, StorageError> {
        let path = self.players_path();
        if !path.exists() {
            return Ok(vec![]);
        }
        read_json(&path)
    }

    async fn upsert_player(&self, player: PlayerAggregate) -> Result<(), StorageError> {
        self.ensure_dir()?;
        let mut players = self.read_players().await?;
        match players.iter_mut().find(|p| p.player_id == player.player_id) {
            Some(existing) => *existing = player,
            None => players.push(player),
        }
        write_json(&self.players_path(), &players)
    }
}

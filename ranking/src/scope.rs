//! Scope identifiers.
//!
//! A scope is a named, independently ranked collection of score entries:
//! the single global scope, or one per (level, language, difficulty)
//! combination. Resolution is pure and deterministic; whether a level
//! scope is actually provisioned is the storage layer's concern.

use serde::{Deserialize, Serialize};

/// The always-present global scope.
pub const GLOBAL_SCOPE: &str = "global";

/// The table holding per-player aggregates. Not a ranked scope.
pub const PLAYERS_TABLE: &str = "players";

const LEVEL_PREFIX: &str = "level";
const SEPARATOR: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeNameError {
    #[error("empty scope component: {0}")]
    EmptyComponent(&'static str),
}

/// Which leaderboard a request addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeKind {
    Global,
    Level {
        level_id: String,
        language: String,
        difficulty: String,
    },
}

impl ScopeKind {
    /// Build a level scope, rejecting empty components.
    pub fn level(
        level_id: impl Into<String>,
        language: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Result<Self, ScopeNameError> {
        let level_id = level_id.into();
        let language = language.into();
        let difficulty = difficulty.into();
        if level_id.trim().is_empty() {
            return Err(ScopeNameError::EmptyComponent("level_id"));
        }
        if language.trim().is_empty() {
            return Err(ScopeNameError::EmptyComponent("language"));
        }
        if difficulty.trim().is_empty() {
            return Err(ScopeNameError::EmptyComponent("difficulty"));
        }
        Ok(Self::Level {
            level_id,
            language,
            difficulty,
        })
    }

    /// The stable table name for this scope.
    pub fn name(&self) -> String {
        match self {
            Self::Global => GLOBAL_SCOPE.to_string(),
            Self::Level {
                level_id,
                language,
                difficulty,
            } => format!("{LEVEL_PREFIX}{SEPARATOR}{level_id}{SEPARATOR}{language}{SEPARATOR}{difficulty}"),
        }
    }
}

/// Whether a stored table name denotes a level scope.
pub fn is_level_scope(name: &str) -> bool {
    name.starts_with(&format!("{LEVEL_PREFIX}{SEPARATOR}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_scope_has_fixed_name() {
        assert_eq!(ScopeKind::Global.name(), "global");
    }

    #[test]
    fn level_scope_name_joins_the_tuple() {
        let scope = ScopeKind::level("12", "rust", "hard").unwrap();
        assert_eq!(scope.name(), "level__12__rust__hard");
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = ScopeKind::level("3", "go", "easy").unwrap();
        let b = ScopeKind::level("3", "go", "easy").unwrap();
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn empty_components_are_rejected() {
        assert_eq!(
            ScopeKind::level("", "rust", "hard"),
            Err(ScopeNameError::EmptyComponent("level_id"))
        );
        assert_eq!(
            ScopeKind::level("1", "  ", "hard"),
            Err(ScopeNameError::EmptyComponent("language"))
        );
        assert_eq!(
            ScopeKind::level("1", "rust", ""),
            Err(ScopeNameError::EmptyComponent("difficulty"))
        );
    }

    #[test]
    fn level_scope_names_are_recognizable() {
        assert!(is_level_scope("level__1__rust__easy"));
        assert!(!is_level_scope("global"));
        assert!(!is_level_scope("players"));
    }
}

//! End-to-end submission pipeline tests over the in-memory backend:
//! level submit → level recalc → aggregate projection → global recalc.

use std::sync::Arc;

use ranking::MAX_ENTRIES;
use scoreboard_server::service::{SubmitGlobalRequest, SubmitLevelRequest};
use scoreboard_server::{LeaderboardService, MemoryStore, RowStore};

const LEVEL_1: &str = "level__1__rust__easy";
const LEVEL_2: &str = "level__2__rust__easy";
const LEVEL_3: &str = "level__3__rust__hard";

async fn service_with_levels() -> (LeaderboardService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    for scope in [LEVEL_1, LEVEL_2, LEVEL_3] {
        store.create_scope(scope).await.unwrap();
    }
    let svc = LeaderboardService::new(store.clone()).await.unwrap();
    (svc, store)
}

fn level_req(player: &str, level_id: &str, difficulty: &str, score: u64) -> SubmitLevelRequest {
    SubmitLevelRequest {
        player_id: Some(player.to_string()),
        player_name: Some(player.to_uppercase()),
        level_id: Some(level_id.to_string()),
        language: Some("rust".to_string()),
        difficulty: Some(difficulty.to_string()),
        score: Some(score),
    }
}

#[tokio::test]
async fn level_submissions_rank_with_recency_tiebreak() {
    let (svc, _store) = service_with_levels().await;

    svc.submit_level(level_req("a", "1", "easy", 500)).await.unwrap();
    svc.submit_level(level_req("b", "1", "easy", 800)).await.unwrap();
    let c = svc.submit_level(level_req("c", "1", "easy", 500)).await.unwrap();
    assert_eq!(c.position, 2, "C ties A on score but is more recent");

    let board = svc.level_leaderboard("1", "rust", "easy", None).await.unwrap();
    let ids: Vec<&str> = board.iter().map(|r| r.player_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
    assert_eq!(
        board.iter().map(|r| r.position).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[tokio::test]
async fn level_submissions_project_totals_into_the_global_board() {
    let (svc, store) = service_with_levels().await;

    // Player p: bests 100 (level 1), nothing on level 2, 250 (level 3).
    svc.submit_level(level_req("p", "1", "easy", 60)).await.unwrap();
    svc.submit_level(level_req("p", "1", "easy", 100)).await.unwrap();
    svc.submit_level(level_req("p", "3", "hard", 250)).await.unwrap();
    // Competing player on level 2 only.
    svc.submit_level(level_req("q", "2", "easy", 400)).await.unwrap();

    let info = svc.player_info("p").await.unwrap();
    assert_eq!(info.total_score, 350);
    assert_eq!(info.levels_completed, 2);
    assert_eq!(info.global_position, 2, "q's 400 beats p's 350");
    assert_eq!(info.level_scores.get(LEVEL_1), Some(&100));
    assert_eq!(info.level_scores.get(LEVEL_3), Some(&250));
    assert!(!info.level_scores.contains_key(LEVEL_2));

    let global = svc.global_leaderboard(None).await.unwrap();
    assert_eq!(global.len(), 2, "one global row per player");
    assert_eq!(global[0].player_id, "q");
    assert_eq!(global[1].player_id, "p");
    assert_eq!(global[1].score, 350);
    assert_eq!(global[1].levels_completed, 2);

    // The global scope holds exactly one upserted row per player.
    assert_eq!(store.read_all("global").await.unwrap().len(), 2);
}

#[tokio::test]
async fn unprovisioned_level_scope_writes_nothing() {
    let (svc, store) = service_with_levels().await;

    let err = svc
        .submit_level(level_req("p", "99", "easy", 100))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "scope_not_found");

    // No row anywhere: not in any level scope, not in the global scope,
    // no aggregate row.
    for scope in [LEVEL_1, LEVEL_2, LEVEL_3, "global"] {
        assert!(store.read_all(scope).await.unwrap().is_empty());
    }
    assert!(store.read_players().await.unwrap().is_empty());
}

#[tokio::test]
async fn scope_never_exceeds_its_bound() {
    let (svc, store) = service_with_levels().await;
    for i in 0..(MAX_ENTRIES + 20) {
        svc.submit_level(level_req(&format!("p{i}"), "1", "easy", i as u64 + 1))
            .await
            .unwrap();
    }
    assert_eq!(store.read_all(LEVEL_1).await.unwrap().len(), MAX_ENTRIES);
}

#[tokio::test]
async fn player_name_updates_propagate_to_the_aggregate() {
    let (svc, _store) = service_with_levels().await;
    svc.submit_level(level_req("p", "1", "easy", 10)).await.unwrap();

    let mut renamed = level_req("p", "2", "easy", 20);
    renamed.player_name = Some("Fresh Name".to_string());
    svc.submit_level(renamed).await.unwrap();

    let info = svc.player_info("p").await.unwrap();
    assert_eq!(info.player_name, "Fresh Name");
    assert_eq!(info.total_score, 30);
}

/// Concurrent submissions to the same scope must never lose an update:
/// with N distinct players submitting in parallel, all N rows exist
/// afterwards and positions are a gapless permutation of 1..=N.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_submissions_lose_no_updates() {
    const PLAYERS: usize = 50;
    let (svc, store) = service_with_levels().await;
    let svc = Arc::new(svc);

    let mut tasks = Vec::new();
    for i in 0..PLAYERS {
        let svc = svc.clone();
        tasks.push(tokio::spawn(async move {
            svc.submit_level(level_req(&format!("p{i}"), "1", "easy", (i as u64 + 1) * 10))
                .await
                .unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let rows = store.read_all(LEVEL_1).await.unwrap();
    assert_eq!(rows.len(), PLAYERS);

    let mut positions: Vec<u32> = rows.iter().map(|r| r.position).collect();
    positions.sort_unstable();
    let expected: Vec<u32> = (1..=PLAYERS as u32).collect();
    assert_eq!(positions, expected, "positions are a gapless permutation");

    // Every projection survived too: the global scope has one row per
    // player, also fully ranked.
    let global = store.read_all("global").await.unwrap();
    assert_eq!(global.len(), PLAYERS);
    let mut global_positions: Vec<u32> = global.iter().map(|r| r.position).collect();
    global_positions.sort_unstable();
    assert_eq!(global_positions, expected);
}

/// One player submitting to several level scopes in parallel must end up
/// with totals covering every submission: the per-scope actors only
/// serialize same-scope writers, so the per-player projection ordering
/// has to close the gap.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_same_player_submissions_keep_totals_consistent() {
    let (svc, store) = service_with_levels().await;
    let svc = Arc::new(svc);

    let submissions = [("1", "easy", 100u64), ("2", "easy", 200), ("3", "hard", 300)];
    let mut tasks = Vec::new();
    for (level_id, difficulty, score) in submissions {
        let svc = svc.clone();
        tasks.push(tokio::spawn(async move {
            svc.submit_level(level_req("p", level_id, difficulty, score))
                .await
                .unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let info = svc.player_info("p").await.unwrap();
    assert_eq!(info.total_score, 600, "no submission may be lost from the total");
    assert_eq!(info.levels_completed, 3);

    let global = store.read_all("global").await.unwrap();
    assert_eq!(global.len(), 1, "still a single global row for the player");
    assert_eq!(global[0].score, 600);
    assert_eq!(global[0].position, 1);
}

#[tokio::test]
async fn mixed_global_and_level_submissions_coexist() {
    let (svc, _store) = service_with_levels().await;

    // Direct global submission (append semantics).
    svc.submit_global(SubmitGlobalRequest {
        player_id: Some("direct".into()),
        player_name: Some("Direct".into()),
        score: Some(1000),
        levels_completed: Some(7),
    })
    .await
    .unwrap();

    // Level pipeline for another player.
    svc.submit_level(level_req("p", "1", "easy", 400)).await.unwrap();

    let global = svc.global_leaderboard(None).await.unwrap();
    assert_eq!(global[0].player_id, "direct");
    assert_eq!(global[0].levels_completed, 7);
    assert_eq!(global[1].player_id, "p");
}

#[tokio::test]
async fn queries_fail_cleanly_for_unknown_scopes() {
    let (svc, _store) = service_with_levels().await;
    let err = svc
        .level_leaderboard("99", "rust", "easy", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "scope_not_found");
}

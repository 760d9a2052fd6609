//! Tests for database repository and store operations.

mod common;

use common::setup_test_db;
use connect4::{GameState, Player, apply_move};
use connect4_server::{DbErrorKind, GameStore, StoreError};
use diesel::prelude::*;

fn after(columns: &[i64]) -> GameState {
    columns.iter().fold(GameState::new(), |state, &col| {
        apply_move(&state, col).expect("Valid move").into_state()
    })
}

#[test]
fn test_create_and_load() {
    let (_db, repo) = setup_test_db();
    let id = repo.create(&GameState::new()).expect("Create failed");
    assert!(id > 0);

    let loaded = repo.load(id).expect("Load failed");
    assert_eq!(loaded, Some(GameState::new()));
}

#[test]
fn test_ids_are_distinct() {
    let (_db, repo) = setup_test_db();
    let a = repo.create(&GameState::new()).expect("Create failed");
    let b = repo.create(&GameState::new()).expect("Create failed");
    assert_ne!(a, b);
}

#[test]
fn test_load_missing_is_none() {
    let (_db, repo) = setup_test_db();
    assert_eq!(repo.load(999).expect("Load failed"), None);
}

#[test]
fn test_save_replaces_state() {
    let (_db, repo) = setup_test_db();
    let id = repo.create(&GameState::new()).expect("Create failed");

    let state = after(&[3, 4, 3]);
    assert_eq!(repo.save(id, &state).expect("Save failed"), id);

    let loaded = repo.load(id).expect("Load failed").expect("Game exists");
    assert_eq!(loaded, state);
    assert_eq!(loaded.current_player(), Player::Two);
}

#[test]
fn test_save_missing_fails() {
    let (_db, repo) = setup_test_db();
    match repo.save(42, &GameState::new()) {
        Err(StoreError::Db(err)) => assert_eq!(err.kind, DbErrorKind::GameNotFound(42)),
        other => panic!("Expected missing game, got {:?}", other),
    }
}

#[test]
fn test_mark_inactive_hides_from_listing_but_keeps_game() {
    let (_db, repo) = setup_test_db();
    let kept = repo.create(&GameState::new()).expect("Create failed");
    let done = repo.create(&GameState::new()).expect("Create failed");

    repo.mark_inactive(done).expect("Mark failed");

    let active = repo.list_active().expect("List failed");
    let ids: Vec<i32> = active.iter().map(|g| *g.id()).collect();
    assert_eq!(ids, vec![kept]);
    assert!(repo.load(done).expect("Load failed").is_some());
}

#[test]
fn test_listing_most_recent_first() {
    let (_db, repo) = setup_test_db();
    let first = repo.create(&GameState::new()).expect("Create failed");
    let second = repo.create(&GameState::new()).expect("Create failed");

    let ids: Vec<i32> = repo
        .list_active()
        .expect("List failed")
        .iter()
        .map(|g| *g.id())
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[test]
fn test_record_timestamps() {
    let (_db, repo) = setup_test_db();
    let record = repo.create_game(&GameState::new()).expect("Create failed");
    assert!(*record.is_active());
    assert!(record.updated_at() >= record.created_at());
}

#[test]
fn test_corrupted_row_is_malformed() {
    let (db, repo) = setup_test_db();
    let id = repo.create(&GameState::new()).expect("Create failed");

    let mut conn = SqliteConnection::establish(db.path().to_str().expect("Invalid path"))
        .expect("Failed to connect");
    diesel::sql_query("UPDATE games SET game_state = '{\"board\": []}' WHERE id = ?")
        .bind::<diesel::sql_types::Integer, _>(id)
        .execute(&mut conn)
        .expect("Corrupt failed");

    match repo.load(id) {
        Err(StoreError::Malformed { game_id, .. }) => assert_eq!(game_id, id),
        other => panic!("expected malformed state, got {:?}", other),
    }
    assert!(repo.list_active().is_err());
}

#[test]
fn test_empty_path_rejected() {
    let err = connect4_server::GameRepository::new("  ".to_string()).expect_err("Blank path");
    assert_eq!(err.kind, DbErrorKind::EmptyPath);
}

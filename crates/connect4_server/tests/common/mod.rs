//! Shared setup for server tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use connect4_server::{GameRepository, GameService, RoomRegistry, ServerConfig, router};
use tempfile::NamedTempFile;

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
pub fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.migrate().expect("Migrations failed");
    (db_file, repo)
}

/// A service over a fresh temporary database.
pub fn setup_service() -> (NamedTempFile, GameService) {
    let (db, repo) = setup_test_db();
    (db, GameService::new(Arc::new(repo), RoomRegistry::default()))
}

/// The application router with the default (any origin) CORS policy.
pub fn test_app(service: GameService) -> Router {
    let cors = ServerConfig::default()
        .cors_layer()
        .expect("Default CORS policy");
    router(service, cors)
}

/// Fills a 42-cell board with no four in a row.
pub const DRAW_SEQUENCE: [i64; 42] = [
    5, 4, 5, 0, 6, 2, 4, 5, 5, 0, 4, 1, 1, 0, 4, 5, 6, 5, 3, 1, 1, 2, 2, 6, 2, 6, 6, 3, 6, 2, 0,
    3, 0, 3, 3, 4, 3, 1, 4, 2, 1, 0,
];

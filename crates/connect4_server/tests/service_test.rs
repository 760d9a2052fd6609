//! Tests for the game service: move flow, persistence and broadcasts.

mod common;

use common::{DRAW_SEQUENCE, setup_service};
use connect4::{GameStatus, Player, Rejection};
use connect4_server::{GameView, MoveReply, ServerEvent, ServiceError};

#[tokio::test]
async fn test_create_then_get() {
    let (_db, service) = setup_service();
    let created = service.create_game().await.expect("Create failed");
    let fetched = service.get_game(created.id).await.expect("Get failed");
    assert_eq!(fetched, created);
    assert_eq!(fetched.state.current_player(), Player::One);
}

#[tokio::test]
async fn test_get_unknown_game() {
    let (_db, service) = setup_service();
    let err = service.get_game(404).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(404)));
}

#[tokio::test]
async fn test_move_unknown_game() {
    let (_db, service) = setup_service();
    let err = service.make_move(404, 3).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(404)));
}

#[tokio::test]
async fn test_accepted_move_is_stored_and_broadcast() {
    let (_db, service) = setup_service();
    let game = service.create_game().await.expect("Create failed");
    let (_, mut updates) = service.subscribe(game.id).await.expect("Subscribe failed");

    let (state, message) = match service.make_move(game.id, 3).await.expect("Move failed") {
        MoveReply::Accepted { state, message } => (state, message),
        other => panic!("expected accepted move, got {:?}", other),
    };
    assert_eq!(message, "Move accepted. Player 2 to move.");

    let stored = service.get_game(game.id).await.expect("Get failed");
    assert_eq!(stored.state, state);

    let event = updates.try_recv().expect("Update broadcast");
    assert_eq!(
        event,
        ServerEvent::GameUpdated(GameView {
            id: game.id,
            state
        })
    );
}

#[tokio::test]
async fn test_rejected_move_changes_nothing() {
    let (_db, service) = setup_service();
    let game = service.create_game().await.expect("Create failed");
    let (_, mut updates) = service.subscribe(game.id).await.expect("Subscribe failed");

    let reply = service.make_move(game.id, 7).await.expect("Move failed");
    assert_eq!(
        reply,
        MoveReply::Rejected {
            state: game.state.clone(),
            rejection: Rejection::InvalidColumn,
        }
    );
    assert!(updates.try_recv().is_err());
    assert_eq!(service.get_game(game.id).await.expect("Get failed"), game);
}

#[tokio::test]
async fn test_win_ends_game_and_leaves_listing() {
    let (_db, service) = setup_service();
    let game = service.create_game().await.expect("Create failed");
    let other = service.create_game().await.expect("Create failed");

    for col in [0, 1, 0, 1, 0, 1] {
        service.make_move(game.id, col).await.expect("Move failed");
    }
    let (state, message) = match service.make_move(game.id, 0).await.expect("Move failed") {
        MoveReply::Accepted { state, message } => (state, message),
        other => panic!("expected winning move, got {:?}", other),
    };
    assert_eq!(message, "Player 1 wins!");
    assert_eq!(state.status(), GameStatus::Won(Player::One));

    let listed: Vec<i32> = service
        .list_games()
        .await
        .expect("List failed")
        .iter()
        .map(|g| g.id)
        .collect();
    assert_eq!(listed, vec![other.id]);

    let reply = service.make_move(game.id, 4).await.expect("Move failed");
    assert_eq!(
        reply,
        MoveReply::Rejected {
            state: state.clone(),
            rejection: Rejection::GameAlreadyOver,
        }
    );
    assert_eq!(service.get_game(game.id).await.expect("Get failed").state, state);
}

#[tokio::test]
async fn test_draw_through_service() {
    let (_db, service) = setup_service();
    let game = service.create_game().await.expect("Create failed");

    let mut last = None;
    for col in DRAW_SEQUENCE {
        last = Some(service.make_move(game.id, col).await.expect("Move failed"));
    }
    let Some(MoveReply::Accepted { state, message }) = last else {
        panic!("expected final move to be accepted");
    };
    assert_eq!(message, "Game ended in a draw!");
    assert_eq!(state.status(), GameStatus::Drawn);
    assert!(service.list_games().await.expect("List failed").is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_moves_are_serialized() {
    let (_db, service) = setup_service();
    let id = service.create_game().await.expect("Create failed").id;

    let handles: Vec<_> = (0..6)
        .map(|col| {
            let service = service.clone();
            tokio::spawn(async move { service.make_move(id, col).await })
        })
        .collect();

    for handle in handles {
        let reply = handle.await.expect("Task panicked").expect("Move failed");
        assert!(matches!(reply, MoveReply::Accepted { .. }));
    }

    let state = service.get_game(id).await.expect("Get failed").state;
    assert_eq!(state.history().len(), 6);
    assert_eq!(state.board().occupied(), 6);
    for (i, record) in state.history().iter().enumerate() {
        let expected = if i % 2 == 0 { Player::One } else { Player::Two };
        assert_eq!(record.player, expected);
    }
}

#[tokio::test]
async fn test_subscribe_unknown_game() {
    let (_db, service) = setup_service();
    assert!(matches!(
        service.subscribe(5).await.unwrap_err(),
        ServiceError::NotFound(5)
    ));
    assert_eq!(service.rooms().room_count(), 0);
}

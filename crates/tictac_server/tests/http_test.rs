//! End-to-end tests for the HTTP routes.

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tictac_server::{AppState, ServerConfig, router};
use tictac_session::SessionManager;
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new(
        SessionManager::default(),
        Arc::new(ServerConfig::default()),
    ))
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str, player: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(player) = player {
        builder = builder.header(COOKIE, format!("Player={}", player));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_move(game_id: &str, player: &str, x: &str, y: &str) -> Request<Body> {
    Request::post(format!("/tictactoe?gameID={}", game_id))
        .header(COOKIE, format!("Player={}", player))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("x={}&y={}", x, y)))
        .unwrap()
}

async fn text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Creates a game through the redirect and returns its id.
async fn new_game(app: &Router) -> String {
    let response = send(app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()[LOCATION].to_str().unwrap();
    location
        .strip_prefix("/?gameID=")
        .expect("redirect to game")
        .to_string()
}

/// Creates a game and seats `alice` as X and `bob` as O.
async fn seated_game(app: &Router) -> String {
    let id = new_game(app).await;
    for player in ["alice", "bob"] {
        let response = send(app, get(&format!("/?gameID={}", id), Some(player))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    id
}

#[tokio::test]
async fn test_root_creates_game_and_redirects() {
    let app = app();
    let id = new_game(&app).await;
    assert_eq!(id.len(), 8);
}

#[tokio::test]
async fn test_join_mints_identity_cookie() {
    let app = app();
    let id = new_game(&app).await;

    let response = send(&app, get(&format!("/?gameID={}", id), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("Player="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=600"));

    let page = text(response).await;
    assert!(page.contains(&id));
    assert!(page.contains("You are X"));
}

#[tokio::test]
async fn test_known_cookie_joins_without_new_cookie() {
    let app = app();
    let id = new_game(&app).await;

    let first = send(&app, get(&format!("/?gameID={}", id), Some("alice"))).await;
    assert!(first.headers().get(SET_COOKIE).is_none());
    assert!(text(first).await.contains("You are X"));

    let second = send(&app, get(&format!("/?gameID={}", id), Some("bob"))).await;
    assert!(text(second).await.contains("You are O"));

    // Reloading keeps the seat.
    let again = send(&app, get(&format!("/?gameID={}", id), Some("alice"))).await;
    assert!(text(again).await.contains("You are X"));
}

#[tokio::test]
async fn test_unknown_game_is_not_found() {
    let app = app();
    let response = send(&app, get("/?gameID=nope", Some("alice"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_third_player_conflicts() {
    let app = app();
    let id = seated_game(&app).await;

    let response = send(&app, get(&format!("/?gameID={}", id), Some("carol"))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_move_flow() {
    let app = app();
    let id = seated_game(&app).await;

    let response = send(&app, post_move(&id, "alice", "1", "1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(response).await, "X");

    // Occupied square answers with what is there.
    let response = send(&app, post_move(&id, "bob", "1", "1")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text(response).await, "X");

    // Out of turn on an empty square.
    let response = send(&app, post_move(&id, "alice", "0", "0")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text(response).await, "-");

    let response = send(&app, post_move(&id, "bob", "0", "0")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(response).await, "O");
}

#[tokio::test]
async fn test_invalid_coordinates() {
    let app = app();
    let id = seated_game(&app).await;

    let response = send(&app, post_move(&id, "alice", "one", "1")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text(response).await, "Invalid value for 'x'");

    let response = send(&app, post_move(&id, "alice", "1", "-1")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text(response).await, "Invalid value for 'y'");

    let response = send(&app, post_move(&id, "alice", "3", "0")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text(response).await, "position (3, 0) is off the board");
}

#[tokio::test]
async fn test_off_board_move_rejected_before_turn_check() {
    let app = app();
    let id = seated_game(&app).await;

    // Bob is waiting, so the session reports the turn before the bounds.
    let response = send(&app, post_move(&id, "bob", "5", "0")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text(response).await, "not your turn");

    // The game still works afterwards.
    let response = send(&app, post_move(&id, "alice", "0", "0")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_off_board_move_before_opponent_joins() {
    let app = app();
    let id = new_game(&app).await;
    send(&app, get(&format!("/?gameID={}", id), Some("alice"))).await;

    let response = send(&app, post_move(&id, "alice", "0", "7")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text(response).await, "waiting for an opponent to join");
}

#[tokio::test]
async fn test_off_board_move_after_game_over() {
    let app = app();
    let id = seated_game(&app).await;
    for (i, (x, y)) in ["00", "10", "01", "11", "02"].iter().map(|m| m.split_at(1)).enumerate() {
        let player = if i % 2 == 0 { "alice" } else { "bob" };
        let response = send(&app, post_move(&id, player, x, y)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = send(&app, post_move(&id, "bob", "9", "9")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text(response).await, "game over");
}

#[tokio::test]
async fn test_move_by_stranger_rejected() {
    let app = app();
    let id = seated_game(&app).await;

    let response = send(&app, post_move(&id, "mallory", "0", "0")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_board_snapshot() {
    let app = app();
    let id = seated_game(&app).await;
    send(&app, post_move(&id, "alice", "2", "0")).await;

    let response = send(&app, get(&format!("/board?gameID={}", id), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view: serde_json::Value = serde_json::from_str(&text(response).await).unwrap();

    assert_eq!(view["game_id"], id.as_str());
    assert_eq!(view["phase"], "in progress");
    assert_eq!(view["up_next"], "O");
    assert_eq!(view["rows"], serde_json::json!(["--X", "---", "---"]));
}

#[tokio::test]
async fn test_events_require_identity() {
    let app = app();
    let id = new_game(&app).await;

    let response = send(&app, get(&format!("/tictactoe?gameID={}", id), None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_first_event_stream_gets_turn() {
    let app = app();
    let id = seated_game(&app).await;

    let response = send(&app, get(&format!("/tictactoe?gameID={}", id), Some("alice"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/event-stream");

    let mut body = response.into_body();
    let frame = tokio::time::timeout(Duration::from_secs(2), body.frame())
        .await
        .expect("timed out waiting for first frame")
        .unwrap()
        .unwrap();
    let data = frame.into_data().unwrap();
    let text = std::str::from_utf8(&data).unwrap();

    assert!(text.contains("event: eventTurnNotifier"));
    assert!(text.contains("data: your turn!"));
}

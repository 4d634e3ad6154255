//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;
use xiangqi_echo::{AppState, GameSession, GameStateRecord, ServerConfig, router};

/// Response pieces the tests look at.
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Reply {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn record(&self) -> GameStateRecord {
        serde_json::from_slice(&self.body).expect("body should be a game state record")
    }
}

/// Full router over a fresh session, plus the session handle.
pub fn game_app() -> (Router, GameSession) {
    let session = GameSession::new();
    let app = router(AppState::new(session.clone(), &ServerConfig::default()));
    (app, session)
}

pub async fn send(app: &Router, req: Request<Body>) -> Reply {
    let resp = app.clone().oneshot(req).await.expect("router is infallible");
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    Reply {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> Reply {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    send(app, req).await
}

pub async fn post(app: &Router, uri: &str) -> Reply {
    let req = Request::post(uri).body(Body::empty()).unwrap();
    send(app, req).await
}

pub async fn post_json(app: &Router, uri: &str, json: &str) -> Reply {
    let req = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn post_move(app: &Router, from: (i64, i64), to: (i64, i64)) -> Reply {
    let json = format!(
        r#"{{"fromX":{},"fromY":{},"toX":{},"toY":{}}}"#,
        from.0, from.1, to.0, to.1
    );
    post_json(app, "/api/game/move", &json).await
}

/// The fixed starting layout as wire strings.
pub fn starting_layout() -> Vec<Vec<String>> {
    let mut board = vec![vec![String::new(); 9]; 10];
    let red_back = ["車", "馬", "象", "士", "帥", "士", "象", "馬", "車"];
    for (col, glyph) in red_back.iter().enumerate() {
        board[0][col] = format!("r-{glyph}");
    }
    board[2][1] = "r-炮".to_string();
    board[2][7] = "r-炮".to_string();
    for col in [0, 2, 4, 6, 8] {
        board[3][col] = "r-兵".to_string();
    }
    for cell in board[8].iter_mut() {
        *cell = "b-♟".to_string();
    }
    let black_back = ["♜", "♞", "♝", "♛", "♚", "♝", "♞", "♜"];
    for (col, glyph) in black_back.iter().enumerate() {
        board[9][col] = format!("b-{glyph}");
    }
    board
}

//! HTTP transport: echo endpoint and game routes.

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::games::xiangqi::{GameState, Move};
use crate::session::GameSession;
use axum::body::{Body, Bytes};
use axum::extract::{FromRef, State};
use axum::http::{HeaderMap, Method, Request, Response, Uri, header};
use axum::routing::{any, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument};

/// Request for making a move. `X` is the row and `Y` the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Source row.
    #[serde(rename = "fromX")]
    pub from_x: i64,
    /// Source column.
    #[serde(rename = "fromY")]
    pub from_y: i64,
    /// Destination row.
    #[serde(rename = "toX")]
    pub to_x: i64,
    /// Destination column.
    #[serde(rename = "toY")]
    pub to_y: i64,
}

impl From<MoveRequest> for Move {
    fn from(req: MoveRequest) -> Self {
        Move::from_coords(req.from_x, req.from_y, req.to_x, req.to_y)
    }
}

/// Wire form of [`GameState`].
///
/// Cells are piece codes such as `"r-車"`, or `""` when empty. `winner` is
/// `""` while the game is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateRecord {
    /// Rows of cells, row 0 first.
    pub board: Vec<Vec<String>>,
    /// Side to move (`"r"` or `"b"`).
    pub current_turn: String,
    /// Whether a king-equivalent has been captured.
    pub game_over: bool,
    /// Winning side, or empty.
    pub winner: String,
}

impl From<&GameState> for GameStateRecord {
    fn from(state: &GameState) -> Self {
        let board = state
            .board()
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map(|piece| piece.to_string()).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self {
            board,
            current_turn: state.current_turn().to_string(),
            game_over: state.game_over(),
            winner: state
                .winner()
                .map(|side| side.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Largest body the echo handler will buffer.
///
/// `BodyLimit(None)`, the default, streams the body back without buffering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyLimit(pub Option<usize>);

/// State shared by all routes of the full server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The hosted game.
    pub session: GameSession,
    /// Echo body limit.
    pub body_limit: BodyLimit,
}

impl AppState {
    /// Creates router state from a session and configuration.
    pub fn new(session: GameSession, config: &ServerConfig) -> Self {
        Self {
            session,
            body_limit: BodyLimit(*config.max_body_bytes()),
        }
    }
}

impl FromRef<AppState> for GameSession {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}

impl FromRef<AppState> for BodyLimit {
    fn from_ref(state: &AppState) -> Self {
        state.body_limit
    }
}

/// Builds the full router: `/api/echo` plus the `/api/game/*` routes.
#[instrument(skip(state))]
pub fn router(state: AppState) -> Router {
    info!("Building game and echo router");
    let game = Router::new()
        .route("/state", get(get_state))
        .route("/move", post(make_move))
        .route("/reset", get(reset).post(reset));

    // Unknown paths, under /api/game or anywhere else, hit the fallback.
    Router::new()
        .route("/api/echo", any(echo))
        .nest("/api/game", game)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .map_request(log_request)
                .map_response(log_response),
        )
        .with_state(state)
}

/// Builds the echo-only router: every path and method is echoed.
#[instrument]
pub fn echo_router(limit: BodyLimit) -> Router {
    info!("Building echo-only router");
    Router::new()
        .fallback(echo)
        .layer(
            ServiceBuilder::new()
                .map_request(log_request)
                .map_response(log_response),
        )
        .with_state(limit)
}

fn log_request(req: Request<Body>) -> Request<Body> {
    info!(
        method = %req.method(),
        uri = %req.uri(),
        headers = ?req.headers(),
        "Incoming HTTP request"
    );
    req
}

fn log_response(resp: Response<Body>) -> Response<Body> {
    debug!(status = %resp.status(), "Response sent");
    resp
}

/// Copies the request body to the response, keeping its `Content-Type`.
#[instrument(skip_all, fields(method = %method, path = %uri.path()))]
async fn echo(
    State(limit): State<BodyLimit>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Result<Response<Body>, ApiError> {
    info!("Received {} request for {}", method, uri.path());

    let body = match limit.0 {
        None => body,
        Some(max) => {
            let bytes: Bytes = axum::body::to_bytes(body, max)
                .await
                .map_err(ApiError::BodyRead)?;
            Body::from(bytes)
        }
    };

    let mut response = Response::new(body);
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type.clone());
    }
    Ok(response)
}

/// Returns the current state, initializing the game on first access.
#[instrument(skip(session))]
async fn get_state(State(session): State<GameSession>) -> Json<GameStateRecord> {
    Json(GameStateRecord::from(&session.state()))
}

/// Validates and applies a move.
#[instrument(skip(session, body))]
async fn make_move(
    State(session): State<GameSession>,
    body: Bytes,
) -> Result<Json<GameStateRecord>, ApiError> {
    let req: MoveRequest = serde_json::from_slice(&body)?;
    debug!(?req, "Processing move");
    let state = session.make_move(req.into())?;
    Ok(Json(GameStateRecord::from(&state)))
}

/// Starts a fresh game.
#[instrument(skip(session))]
async fn reset(State(session): State<GameSession>) -> Json<GameStateRecord> {
    info!("Resetting game");
    Json(GameStateRecord::from(&session.reset()))
}

async fn not_found(uri: Uri) -> ApiError {
    debug!(%uri, "No route");
    ApiError::NotFound
}

/// Serves `app` on `listener` until `shutdown` resolves.
#[instrument(skip_all)]
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, "Server ready");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_of_starting_state() {
        let record = GameStateRecord::from(&GameState::new());
        assert_eq!(record.board.len(), 10);
        assert!(record.board.iter().all(|row| row.len() == 9));
        assert_eq!(record.board[0][4], "r-帥");
        assert_eq!(record.board[9][8], "");
        assert_eq!(record.current_turn, "r");
        assert!(!record.game_over);
        assert_eq!(record.winner, "");
    }

    #[test]
    fn test_record_field_names() {
        let json = serde_json::to_value(GameStateRecord::from(&GameState::new())).unwrap();
        for key in ["board", "currentTurn", "gameOver", "winner"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_move_request_wire_names() {
        let req: MoveRequest =
            serde_json::from_str(r#"{"fromX":3,"fromY":0,"toX":4,"toY":0}"#).unwrap();
        assert_eq!(Move::from(req), Move::from_coords(3, 0, 4, 0));
    }

    #[test]
    fn test_move_request_requires_all_fields() {
        let err = serde_json::from_str::<MoveRequest>(r#"{"fromX":3,"toX":4}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `fromY`"));
    }
}

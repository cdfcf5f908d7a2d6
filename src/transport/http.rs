use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::persistence::Message;
use crate::transport::message::PostRequest;
use crate::transport::{AppState, blocking, page, websocket};
use crate::utils::{FeedError, Result};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/messages", get(list_messages))
        .route("/post", post(post_message))
        .route("/clear", post(clear_messages))
        .route("/ws", get(websocket::ws_upgrade))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let messages = blocking(move || state.board.history()).await?;
    Ok(Html(page::render_index(&messages)))
}

async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>> {
    Ok(Json(blocking(move || state.board.history()).await?))
}

async fn post_message(State(state): State<AppState>, body: PostRequest) -> Result<StatusCode> {
    blocking(move || {
        state
            .board
            .post(body.username.as_deref(), body.text.as_deref())
    })
    .await?;
    Ok(StatusCode::OK)
}

/// Unauthenticated and global: any client wipes history for everyone.
async fn clear_messages(State(state): State<AppState>) -> Result<StatusCode> {
    blocking(move || state.board.clear()).await?;
    Ok(StatusCode::OK)
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        error!("Request failed: {self}");
        let code = match self {
            FeedError::Storage(_) => "STORAGE_UNAVAILABLE",
            FeedError::Codec(_) => "CORRUPT_RECORD",
            FeedError::Task(_) => "INTERNAL",
        };
        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

use axum::body::Bytes;
use axum::Form;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::broker::FeedEvent;
use crate::persistence::Message;

/// Frames pushed to a viewer over its WebSocket, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First frame after connecting: history at connect time, newest first.
    Snapshot { messages: Vec<Message> },
    NewPost(Message),
    ClearFeed,
}

impl From<FeedEvent> for ServerMessage {
    fn from(event: FeedEvent) -> Self {
        match event {
            FeedEvent::NewPost(message) => Self::NewPost(message),
            FeedEvent::ClearFeed => Self::ClearFeed,
        }
    }
}

/// Body of `POST /post`. Both fields are optional; missing values get
/// defaults downstream instead of rejecting the request.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl<S> FromRequest<S> for PostRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    /// Accepts urlencoded forms and JSON. An empty body (with or without a
    /// content type) is taken as all defaults; JSON that does not parse is a 400.
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(body) = Form::<PostRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(body);
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            (StatusCode::BAD_REQUEST, format!("invalid post body: {e}")).into_response()
        })
    }
}

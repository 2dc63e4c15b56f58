use crate::llm::{ ChatProvider, UpstreamReply, FALLBACK_REPLY };
use crate::models::chat::{ ChatReply, ChatRequest, ErrorBody };
use axum::{
    routing::{ get, post },
    Router,
    extract::State,
    response::{ IntoResponse, Response },
    http::StatusCode,
    Json,
};
use log::{ error, info };
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{ Any, CorsLayer };

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    message: String,
}

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ChatProvider>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> Response {
    Json(HealthResponse {
        status: "OK".into(),
        message: "HealthTalk API is running".into(),
    })
    .into_response()
}

async fn chat_handler(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    // Earlier turns are accepted for forward compatibility but only the
    // last one is forwarded upstream.
    let last = match req.messages.last() {
        Some(m) if !m.content.trim().is_empty() => m,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "messages is required".into(),
                }),
            )
                .into_response();
        }
    };

    info!("Incoming chat request: {}", last.content);

    match state.provider.generate(&last.content).await {
        Ok(UpstreamReply::Text(text)) => {
            Json(ChatReply { reply: text }).into_response()
        }
        Ok(UpstreamReply::Empty) => {
            Json(ChatReply {
                reply: FALLBACK_REPLY.into(),
            })
            .into_response()
        }
        Err(e) => {
            error!("Chat upstream error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "upstream provider unavailable".into(),
                }),
            )
                .into_response()
        }
    }
}

use super::state::AppState;
use crate::auth::Credentials;
use crate::session::{ProctorSession, SessionSnapshot};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// Optional session ID (if not provided, generate UUID)
    pub session_id: Option<String>,

    /// Student identifier forwarded to the analyzers
    pub user_id: String,

    /// Display name forwarded to the analyzers
    pub username: String,

    /// Bearer token for the analyzer endpoints
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub session_id: String,
    pub status: String,
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct ToggleTrackRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /session/start
/// Begin a proctoring session
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> impl IntoResponse {
    let session_id = req
        .session_id
        .unwrap_or_else(|| format!("proctor-{}", uuid::Uuid::new_v4()));

    info!("Starting proctoring session: {}", session_id);

    // One session per client
    {
        let slot = state.session.read().await;
        if slot.is_some() {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "A proctoring session is already active".to_string(),
                }),
            )
                .into_response();
        }
    }

    state
        .store
        .sign_in(Credentials {
            user_id: req.user_id,
            username: req.username,
            token: req.token,
        })
        .await;

    let config = state.config.session_config(session_id.clone());

    let session = match ProctorSession::new(config, state.store.clone()) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to create session: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to create session: {}", e),
                }),
            )
                .into_response();
        }
    };

    if let Err(e) = session.start().await {
        error!("Failed to start session: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to start session: {}", e),
            }),
        )
            .into_response();
    }

    {
        let mut slot = state.session.write().await;
        *slot = Some(session);
    }

    info!("Proctoring session started: {}", session_id);

    (
        StatusCode::OK,
        Json(StartSessionResponse {
            session_id: session_id.clone(),
            status: "active".to_string(),
            message: format!("Proctoring started for session {}", session_id),
        }),
    )
        .into_response()
}

/// POST /session/stop
/// Tear the active session down
pub async fn stop_session(State(state): State<AppState>) -> impl IntoResponse {
    let session = {
        let mut slot = state.session.write().await;
        slot.take()
    };

    match session {
        Some(session) => {
            let snapshot = session.end().await;
            info!("Proctoring session stopped: {}", session.session_id());
            (
                StatusCode::OK,
                Json(StopSessionResponse {
                    session_id: session.session_id().to_string(),
                    status: "stopped".to_string(),
                    snapshot,
                }),
            )
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No active proctoring session".to_string(),
            }),
        )
            .into_response(),
    }
}

/// POST /session/reconnect
/// Retry device acquisition after a device error
pub async fn reconnect_session(State(state): State<AppState>) -> impl IntoResponse {
    let session = {
        let slot = state.session.read().await;
        slot.clone()
    };

    match session {
        Some(session) => match session.reconnect().await {
            Ok(()) => (StatusCode::OK, Json(session.snapshot().await)).into_response(),
            Err(e) => {
                error!("Reconnect failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: format!("Reconnect failed: {}", e),
                    }),
                )
                    .into_response()
            }
        },
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No active proctoring session".to_string(),
            }),
        )
            .into_response(),
    }
}

/// POST /session/video
/// Toggle the video track
pub async fn set_video(
    State(state): State<AppState>,
    Json(req): Json<ToggleTrackRequest>,
) -> impl IntoResponse {
    let session = {
        let slot = state.session.read().await;
        slot.clone()
    };

    match session {
        Some(session) => {
            session.set_video_enabled(req.enabled).await;
            (StatusCode::OK, Json(session.snapshot().await)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No active proctoring session".to_string(),
            }),
        )
            .into_response(),
    }
}

/// POST /session/audio
/// Toggle the audio track
pub async fn set_audio(
    State(state): State<AppState>,
    Json(req): Json<ToggleTrackRequest>,
) -> impl IntoResponse {
    let session = {
        let slot = state.session.read().await;
        slot.clone()
    };

    match session {
        Some(session) => {
            session.set_audio_enabled(req.enabled).await;
            (StatusCode::OK, Json(session.snapshot().await)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No active proctoring session".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /session/status
/// Read-model snapshot of the active session
pub async fn session_status(State(state): State<AppState>) -> impl IntoResponse {
    let session = {
        let slot = state.session.read().await;
        slot.clone()
    };

    match session {
        Some(session) => (StatusCode::OK, Json(session.snapshot().await)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No active proctoring session".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /session/warnings
/// Current warning log, oldest first
pub async fn session_warnings(State(state): State<AppState>) -> impl IntoResponse {
    let session = {
        let slot = state.session.read().await;
        slot.clone()
    };

    match session {
        Some(session) => {
            let warnings = session.snapshot().await.warnings;
            (StatusCode::OK, Json(warnings)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No active proctoring session".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

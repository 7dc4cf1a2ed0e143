//! HTTP API server for the surrounding UI
//!
//! This module provides a REST API for controlling the proctoring session:
//! - POST /session/start - Begin proctoring (409 when one is active)
//! - POST /session/stop - Tear the session down
//! - POST /session/reconnect - Retry device acquisition
//! - POST /session/video, /session/audio - Toggle capture tracks
//! - GET /session/status - Read-model snapshot
//! - GET /session/warnings - Current warning log
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

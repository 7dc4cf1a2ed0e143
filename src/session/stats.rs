use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::ConnectionState;

/// Read-only view of a proctoring session for the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,

    /// Whether the tick loop is running
    pub active: bool,

    pub connection: ConnectionState,

    pub video_enabled: bool,
    pub audio_enabled: bool,

    /// Retained warnings, oldest first
    pub warnings: Vec<String>,

    /// Most recent emotion label reported by the emotion analyzer
    pub emotion: Option<String>,

    /// When the session object was created
    pub started_at: DateTime<Utc>,

    /// Dispatch cycles that ran to completion
    pub cycles_completed: u64,

    /// Ticks dropped because a cycle was still in flight
    pub ticks_dropped: u64,

    /// Message of the most recent capture device error, if any
    pub capture_error: Option<String>,
}

/// Events pushed to the surrounding UI over the session's broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A dispatch cycle added at least one new warning; play the audible
    /// alert
    WarningAlert,

    /// The token was rejected and has been cleared; navigate back to the
    /// login surface
    AuthExpired,

    /// The session was torn down
    Ended,
}

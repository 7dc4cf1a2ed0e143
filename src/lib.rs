pub mod analyzer;
pub mod auth;
pub mod capture;
pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use analyzer::{
    AnalyzerClient, AnalyzerConfig, DistractionResponse, EmotionResponse, FrameAnalysisRequest,
};
pub use auth::{Credentials, SessionStore};
pub use capture::{
    CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureResource, CaptureSource,
    EncodedFrame, FrameCodec, TestPatternBackend, VideoFrame,
};
pub use config::Config;
pub use error::{AnalyzerError, CaptureError, FrameError};
pub use http::{create_router, AppState};
pub use session::{
    AnalysisDispatcher, ConnectionState, CycleOutcome, ProctorSession, SessionConfig, SessionEvent,
    SessionSnapshot, WarningLog, NO_WARNING_SENTINEL,
};

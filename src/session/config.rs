use std::time::Duration;

use crate::analyzer::AnalyzerConfig;
use crate::capture::{CaptureConfig, CaptureSource};

/// Configuration for a proctoring session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier
    pub session_id: String,

    /// Fixed sampling cadence. Ticks that land while a cycle is still in
    /// flight are dropped, not queued.
    pub tick_interval: Duration,

    /// How long after an auth rejection the re-login navigation event is
    /// emitted
    pub auth_redirect_delay: Duration,

    /// Where frames come from
    pub source: CaptureSource,

    pub capture: CaptureConfig,

    pub analyzers: AnalyzerConfig,

    /// JPEG quality for encoded frames, 1..=100
    pub jpeg_quality: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("proctor-{}", uuid::Uuid::new_v4()),
            tick_interval: Duration::from_secs(1),
            auth_redirect_delay: Duration::from_secs(3),
            source: CaptureSource::Camera("default".to_string()),
            capture: CaptureConfig::default(),
            analyzers: AnalyzerConfig::default(),
            jpeg_quality: 80,
        }
    }
}

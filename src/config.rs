use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::analyzer::AnalyzerConfig;
use crate::capture::{CaptureConfig, CaptureSource};
use crate::session::SessionConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub analyzers: AnalyzersConfig,
    pub capture: CaptureSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzersConfig {
    pub distraction_url: String,
    pub emotion_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureSettings {
    /// Capture device identifier, or "testpattern" for synthetic frames
    pub device: String,
    pub width: u32,
    pub height: u32,
    pub jpeg_quality: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub tick_interval_secs: u64,
    pub auth_redirect_delay_secs: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Session configuration derived from the service configuration.
    pub fn session_config(&self, session_id: String) -> SessionConfig {
        let source = if self.capture.device == "testpattern" {
            CaptureSource::TestPattern
        } else {
            CaptureSource::Camera(self.capture.device.clone())
        };

        SessionConfig {
            session_id,
            tick_interval: Duration::from_secs(self.session.tick_interval_secs),
            auth_redirect_delay: Duration::from_secs(self.session.auth_redirect_delay_secs),
            source,
            capture: CaptureConfig {
                width: self.capture.width,
                height: self.capture.height,
            },
            analyzers: AnalyzerConfig {
                distraction_url: self.analyzers.distraction_url.clone(),
                emotion_url: self.analyzers.emotion_url.clone(),
                request_timeout: Duration::from_secs(self.analyzers.request_timeout_secs),
            },
            jpeg_quality: self.capture.jpeg_quality,
        }
    }
}

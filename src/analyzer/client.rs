use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::debug;

use super::messages::{DistractionResponse, EmotionResponse, FrameAnalysisRequest};
use crate::error::AnalyzerError;

/// Endpoint configuration for the two analyzers
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub distraction_url: String,
    pub emotion_url: String,
    /// Bound on each analyzer call; a stalled call must never starve the
    /// sampling loop
    pub request_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            distraction_url: "http://127.0.0.1:8500/analyze/distraction".to_string(),
            emotion_url: "http://127.0.0.1:8501/analyze/emotion".to_string(),
            request_timeout: Duration::from_secs(8),
        }
    }
}

/// HTTP client for the two analyzer endpoints.
///
/// Carries bearer authentication on every call and classifies failures into
/// the [`AnalyzerError`] taxonomy; the dispatcher decides what a pair of
/// settled results means for the session.
pub struct AnalyzerClient {
    client: reqwest::Client,
    config: AnalyzerConfig,
}

impl AnalyzerClient {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build analyzer HTTP client")?;

        Ok(Self { client, config })
    }

    /// Submit a frame to the distraction/drowsiness analyzer.
    pub async fn analyze_distraction(
        &self,
        request: &FrameAnalysisRequest,
        token: &str,
    ) -> Result<DistractionResponse, AnalyzerError> {
        debug!("Posting frame to distraction analyzer");
        let response = self
            .client
            .post(&self.config.distraction_url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        Self::check_status(response.status())?;
        Ok(response.json().await?)
    }

    /// Submit a frame to the emotion analyzer.
    pub async fn analyze_emotion(
        &self,
        request: &FrameAnalysisRequest,
        token: &str,
    ) -> Result<EmotionResponse, AnalyzerError> {
        debug!("Posting frame to emotion analyzer");
        let response = self
            .client
            .post(&self.config.emotion_url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        Self::check_status(response.status())?;
        Ok(response.json().await?)
    }

    fn check_status(status: StatusCode) -> Result<(), AnalyzerError> {
        if status == StatusCode::UNAUTHORIZED {
            return Err(AnalyzerError::AuthRejected);
        }
        if !status.is_success() {
            return Err(AnalyzerError::Status(status.as_u16()));
        }
        Ok(())
    }
}

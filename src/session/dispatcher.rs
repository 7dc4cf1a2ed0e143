use tracing::warn;

use super::warnings::NO_WARNING_SENTINEL;
use crate::analyzer::{AnalyzerClient, FrameAnalysisRequest};
use crate::auth::Credentials;
use crate::capture::EncodedFrame;
use crate::error::AnalyzerError;

/// What one dispatch cycle produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No usable credentials were available; nothing was sent. Not a
    /// failure.
    Skipped,

    /// Both calls settled without an auth rejection. `any_success` is false
    /// when both failed transiently. `emotion` is meaningful only when
    /// `emotion_succeeded` is true; a successful call may legitimately
    /// report no label.
    Completed {
        warnings: Vec<String>,
        emotion: Option<String>,
        emotion_succeeded: bool,
        any_success: bool,
    },

    /// At least one analyzer rejected the bearer token.
    AuthExpired,
}

/// Issues one sampling cycle: the encoded frame goes to both analyzers
/// concurrently, and the pair of settled results is folded into a
/// [`CycleOutcome`].
///
/// The single-flight guarantee is a scheduling contract owned by the
/// session loop; this component only promises that within one cycle a
/// failure of either call never cancels the other.
pub struct AnalysisDispatcher {
    client: AnalyzerClient,
}

impl AnalysisDispatcher {
    pub fn new(client: AnalyzerClient) -> Self {
        Self { client }
    }

    pub async fn run_cycle(
        &self,
        frame: &EncodedFrame,
        credentials: Option<Credentials>,
    ) -> CycleOutcome {
        let Some(credentials) = credentials else {
            return CycleOutcome::Skipped;
        };
        if credentials.user_id.is_empty() || credentials.token.is_empty() {
            return CycleOutcome::Skipped;
        }

        let request = FrameAnalysisRequest {
            frame: frame.base64.clone(),
            student_id: credentials.user_id.clone(),
            username: credentials.username.clone(),
        };

        // Both calls settle independently; partial success is valid.
        let (distraction, emotion) = futures::join!(
            self.client.analyze_distraction(&request, &credentials.token),
            self.client.analyze_emotion(&request, &credentials.token),
        );

        let auth_rejected = matches!(distraction, Err(AnalyzerError::AuthRejected))
            || matches!(emotion, Err(AnalyzerError::AuthRejected));
        if auth_rejected {
            return CycleOutcome::AuthExpired;
        }

        let mut any_success = false;

        let warnings = match distraction {
            Ok(response) => {
                any_success = true;
                response
                    .warnings
                    .into_iter()
                    .filter(|w| w != NO_WARNING_SENTINEL)
                    .collect()
            }
            Err(e) => {
                warn!("Distraction analyzer call failed: {}", e);
                Vec::new()
            }
        };

        let (emotion_succeeded, emotion) = match emotion {
            Ok(response) => {
                any_success = true;
                (true, response.emotion)
            }
            Err(e) => {
                warn!("Emotion analyzer call failed: {}", e);
                (false, None)
            }
        };

        CycleOutcome::Completed {
            warnings,
            emotion,
            emotion_succeeded,
            any_success,
        }
    }
}

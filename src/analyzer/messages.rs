use serde::{Deserialize, Serialize};

/// Request body both analyzer endpoints accept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameAnalysisRequest {
    /// Base64-encoded JPEG frame
    pub frame: String,
    pub student_id: String,
    pub username: String,
}

/// Success response from the distraction/drowsiness analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistractionResponse {
    pub processed_frame: String,
    /// Warning strings for this frame; may contain the "No Warning"
    /// sentinel, which is never surfaced to the user
    pub warnings: Vec<String>,
}

/// Success response from the emotion analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionResponse {
    pub processed_frame: String,
    pub emotion: Option<String>,
    #[serde(default)]
    pub updated_database: Option<bool>,
}

pub mod client;
pub mod messages;

pub use client::{AnalyzerClient, AnalyzerConfig};
pub use messages::{DistractionResponse, EmotionResponse, FrameAnalysisRequest};

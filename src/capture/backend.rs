use anyhow::Result;
use async_trait::async_trait;

use crate::error::CaptureError;

/// One video frame sampled from the capture device (RGB24, row-major).
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Raw pixel data, 3 bytes per pixel
    pub pixels: Vec<u8>,
    /// Frame width in pixels (0 while the device is warming up)
    pub width: u32,
    /// Frame height in pixels (0 while the device is warming up)
    pub height: u32,
    /// Milliseconds since the device was opened
    pub timestamp_ms: u64,
}

impl VideoFrame {
    /// A frame with no spatial dimensions, as produced by a device that has
    /// not delivered its first real frame yet.
    pub fn empty(timestamp_ms: u64) -> Self {
        Self {
            pixels: Vec::new(),
            width: 0,
            height: 0,
            timestamp_ms,
        }
    }
}

/// Configuration for a capture backend
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Requested frame width
    pub width: u32,
    /// Requested frame height
    pub height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Camera/microphone capture backend trait
///
/// Implementations own the underlying device handle exclusively. A backend
/// delivers the *current* frame on demand rather than pushing a stream; the
/// session loop decides the sampling cadence.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Open the device. May be slow (permission prompts, hardware spin-up)
    /// and classifies failures into [`CaptureError`] variants.
    async fn open(&mut self) -> Result<(), CaptureError>;

    /// Close the device and release any OS-level locks. Idempotent.
    async fn close(&mut self) -> Result<(), CaptureError>;

    /// Snapshot the most recent frame. Frames may report zero dimensions
    /// while the device warms up.
    fn grab_frame(&mut self) -> Result<VideoFrame, CaptureError>;

    /// Enable or disable the video track without reopening the device.
    fn set_video_enabled(&mut self, enabled: bool);

    /// Enable or disable the audio track without reopening the device.
    fn set_audio_enabled(&mut self, enabled: bool);

    /// Whether the device is currently open
    fn is_open(&self) -> bool;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Capture source type
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// A physical camera, addressed by a platform device identifier
    Camera(String),
    /// Synthetic frames (for tests and headless demos)
    TestPattern,
}

/// Capture backend factory
pub struct CaptureBackendFactory;

impl CaptureBackendFactory {
    /// Create a capture backend for the given source.
    pub fn create(source: CaptureSource, config: CaptureConfig) -> Result<Box<dyn CaptureBackend>> {
        match source {
            CaptureSource::TestPattern => {
                use super::testpattern::TestPatternBackend;
                Ok(Box::new(TestPatternBackend::new(config)))
            }

            CaptureSource::Camera(device) => {
                anyhow::bail!(
                    "no built-in backend for camera '{}'; plug a platform CaptureBackend \
                     implementation into the session instead",
                    device
                )
            }
        }
    }
}

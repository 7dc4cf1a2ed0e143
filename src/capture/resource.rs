use tracing::{info, warn};

use super::backend::{CaptureBackend, VideoFrame};
use crate::error::CaptureError;

/// Exclusive owner of the camera/microphone handle.
///
/// The handle lives inside the boxed backend; `acquire` moves a fresh
/// backend in (releasing any prior one first, so the device is never held
/// twice), `release` drops it. Track toggles are remembered across
/// re-acquisition.
pub struct CaptureResource {
    backend: Option<Box<dyn CaptureBackend>>,
    video_enabled: bool,
    audio_enabled: bool,
    last_error: Option<CaptureError>,
}

impl CaptureResource {
    pub fn new() -> Self {
        Self {
            backend: None,
            video_enabled: true,
            audio_enabled: true,
            last_error: None,
        }
    }

    /// Acquire the device, fully replacing any previously held handle.
    pub async fn acquire(&mut self, mut backend: Box<dyn CaptureBackend>) -> Result<(), CaptureError> {
        self.release().await;

        backend.set_video_enabled(self.video_enabled);
        backend.set_audio_enabled(self.audio_enabled);

        match backend.open().await {
            Ok(()) => {
                info!("Capture device acquired ({})", backend.name());
                self.backend = Some(backend);
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Capture device acquisition failed: {}", e);
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Release the device. Releasing an already-released or never-acquired
    /// resource is a no-op.
    pub async fn release(&mut self) {
        if let Some(mut backend) = self.backend.take() {
            if let Err(e) = backend.close().await {
                warn!("Failed to close capture backend: {}", e);
            }
            info!("Capture device released");
        }
    }

    /// Snapshot the current frame from the live source.
    pub fn grab_frame(&mut self) -> Result<VideoFrame, CaptureError> {
        match self.backend.as_mut() {
            Some(backend) => match backend.grab_frame() {
                Ok(frame) => Ok(frame),
                Err(e) => {
                    self.last_error = Some(e.clone());
                    Err(e)
                }
            },
            None => Err(CaptureError::NotAcquired),
        }
    }

    /// Toggle the video track without reacquiring the device.
    pub fn set_video_enabled(&mut self, enabled: bool) {
        self.video_enabled = enabled;
        if let Some(backend) = self.backend.as_mut() {
            backend.set_video_enabled(enabled);
        }
    }

    /// Toggle the audio track without reacquiring the device.
    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
        if let Some(backend) = self.backend.as_mut() {
            backend.set_audio_enabled(enabled);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.backend.as_ref().map(|b| b.is_open()).unwrap_or(false)
    }

    pub fn video_enabled(&self) -> bool {
        self.video_enabled
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn last_error(&self) -> Option<&CaptureError> {
        self.last_error.as_ref()
    }
}

impl Default for CaptureResource {
    fn default() -> Self {
        Self::new()
    }
}

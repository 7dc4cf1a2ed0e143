use std::time::Instant;

use async_trait::async_trait;

use super::backend::{CaptureBackend, CaptureConfig, VideoFrame};
use crate::error::CaptureError;

/// Synthetic capture backend producing a moving gradient.
///
/// Emulates a real device closely enough to drive the whole engine: the
/// first grab after opening reports zero dimensions (warm-up), disabling
/// the video track blanks the frame, and grabbing after close fails.
pub struct TestPatternBackend {
    config: CaptureConfig,
    open: bool,
    video_enabled: bool,
    audio_enabled: bool,
    frames_grabbed: u64,
    warmup_frames: u64,
    opened_at: Option<Instant>,
}

impl TestPatternBackend {
    pub fn new(config: CaptureConfig) -> Self {
        Self::with_warmup(config, 1)
    }

    /// A backend whose first `warmup_frames` grabs report zero dimensions.
    pub fn with_warmup(config: CaptureConfig, warmup_frames: u64) -> Self {
        Self {
            config,
            open: false,
            video_enabled: true,
            audio_enabled: true,
            frames_grabbed: 0,
            warmup_frames,
            opened_at: None,
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.opened_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    fn render(&self) -> Vec<u8> {
        let (w, h) = (self.config.width, self.config.height);
        let mut pixels = Vec::with_capacity((w * h * 3) as usize);

        if !self.video_enabled {
            // Disabled track delivers black frames, same as a covered lens
            pixels.resize((w * h * 3) as usize, 0);
            return pixels;
        }

        let t = self.frames_grabbed as u32;
        for y in 0..h {
            for x in 0..w {
                pixels.push(((x + t) % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push((((x ^ y) + t) % 256) as u8);
            }
        }
        pixels
    }
}

#[async_trait]
impl CaptureBackend for TestPatternBackend {
    async fn open(&mut self) -> Result<(), CaptureError> {
        self.open = true;
        self.frames_grabbed = 0;
        self.opened_at = Some(Instant::now());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), CaptureError> {
        self.open = false;
        self.opened_at = None;
        Ok(())
    }

    fn grab_frame(&mut self) -> Result<VideoFrame, CaptureError> {
        if !self.open {
            return Err(CaptureError::NotAcquired);
        }

        let frame = if self.frames_grabbed < self.warmup_frames {
            VideoFrame::empty(self.elapsed_ms())
        } else {
            VideoFrame {
                pixels: self.render(),
                width: self.config.width,
                height: self.config.height,
                timestamp_ms: self.elapsed_ms(),
            }
        };

        self.frames_grabbed += 1;
        Ok(frame)
    }

    fn set_video_enabled(&mut self, enabled: bool) {
        self.video_enabled = enabled;
    }

    fn set_audio_enabled(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn name(&self) -> &str {
        "testpattern"
    }
}

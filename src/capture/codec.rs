use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use super::backend::VideoFrame;
use crate::error::FrameError;

/// A frame compressed for transport to the analyzers.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    /// Base64-encoded JPEG bytes
    pub base64: String,
    pub width: u32,
    pub height: u32,
}

/// Turns live frames into base64 JPEGs.
///
/// Stateless beyond the quality setting; encoding reads the frame and
/// nothing else.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    quality: u8,
}

impl FrameCodec {
    /// `quality` is the JPEG quality factor, 1..=100.
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }

    pub fn encode(&self, frame: &VideoFrame) -> Result<EncodedFrame, FrameError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(FrameError::NotReady);
        }

        let expected = frame.width as usize * frame.height as usize * 3;
        if frame.pixels.len() != expected {
            return Err(FrameError::Encode(format!(
                "pixel buffer is {} bytes, expected {} for {}x{} RGB",
                frame.pixels.len(),
                expected,
                frame.width,
                frame.height
            )));
        }

        let mut jpeg = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, self.quality);
        encoder
            .encode(&frame.pixels, frame.width, frame.height, ExtendedColorType::Rgb8)
            .map_err(|e| FrameError::Encode(e.to_string()))?;

        Ok(EncodedFrame {
            base64: base64::engine::general_purpose::STANDARD.encode(&jpeg),
            width: frame.width,
            height: frame.height,
        })
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(80)
    }
}

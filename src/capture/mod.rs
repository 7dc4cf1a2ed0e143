//! Camera/microphone capture
//!
//! This module owns the device side of the engine:
//! - `CaptureBackend`: the device seam; platform integrations implement it
//! - `CaptureResource`: exclusive owner of the live handle with
//!   acquire/release/reacquire semantics and track toggles
//! - `FrameCodec`: frame → base64 JPEG for the analyzer wire format
//! - `TestPatternBackend`: synthetic frames for tests and headless demos

pub mod backend;
pub mod codec;
pub mod resource;
pub mod testpattern;

pub use backend::{CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureSource, VideoFrame};
pub use codec::{EncodedFrame, FrameCodec};
pub use resource::CaptureResource;
pub use testpattern::TestPatternBackend;

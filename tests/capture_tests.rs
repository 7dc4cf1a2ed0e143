// Tests for the capture resource, the synthetic backend, and the frame
// codec.

use async_trait::async_trait;
use invigil::{
    CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureError, CaptureResource,
    CaptureSource, FrameCodec, FrameError, TestPatternBackend, VideoFrame,
};

fn small_config() -> CaptureConfig {
    CaptureConfig {
        width: 32,
        height: 24,
    }
}

/// Backend whose acquisition always fails with a configured error.
struct FailingBackend {
    error: CaptureError,
}

#[async_trait]
impl CaptureBackend for FailingBackend {
    async fn open(&mut self) -> Result<(), CaptureError> {
        Err(self.error.clone())
    }

    async fn close(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn grab_frame(&mut self) -> Result<VideoFrame, CaptureError> {
        Err(CaptureError::NotAcquired)
    }

    fn set_video_enabled(&mut self, _enabled: bool) {}

    fn set_audio_enabled(&mut self, _enabled: bool) {}

    fn is_open(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[tokio::test]
async fn release_is_idempotent() {
    let mut resource = CaptureResource::new();

    let backend = Box::new(TestPatternBackend::new(small_config()));
    resource.acquire(backend).await.unwrap();
    assert!(resource.is_ready());

    resource.release().await;
    assert!(!resource.is_ready());
    assert!(matches!(
        resource.grab_frame(),
        Err(CaptureError::NotAcquired)
    ));

    // Releasing again is a no-op, observable state unchanged
    resource.release().await;
    assert!(!resource.is_ready());
    assert!(matches!(
        resource.grab_frame(),
        Err(CaptureError::NotAcquired)
    ));
}

#[tokio::test]
async fn release_before_any_acquire_is_a_noop() {
    let mut resource = CaptureResource::new();
    resource.release().await;
    assert!(!resource.is_ready());
}

#[tokio::test]
async fn reacquire_replaces_the_handle() {
    let mut resource = CaptureResource::new();

    resource
        .acquire(Box::new(TestPatternBackend::new(small_config())))
        .await
        .unwrap();
    resource.release().await;

    resource
        .acquire(Box::new(TestPatternBackend::new(small_config())))
        .await
        .unwrap();
    assert!(resource.is_ready());

    // Acquiring over a live handle also replaces it cleanly
    resource
        .acquire(Box::new(TestPatternBackend::new(small_config())))
        .await
        .unwrap();
    assert!(resource.is_ready());
}

#[tokio::test]
async fn acquisition_failure_is_classified_and_recorded() {
    let mut resource = CaptureResource::new();

    let result = resource
        .acquire(Box::new(FailingBackend {
            error: CaptureError::DeviceBusy,
        }))
        .await;

    assert!(matches!(result, Err(CaptureError::DeviceBusy)));
    assert!(!resource.is_ready());
    assert_eq!(resource.last_error(), Some(&CaptureError::DeviceBusy));

    // A successful reacquire clears the recorded error
    resource
        .acquire(Box::new(TestPatternBackend::new(small_config())))
        .await
        .unwrap();
    assert!(resource.last_error().is_none());
}

#[tokio::test]
async fn track_toggles_survive_reacquisition() {
    let mut resource = CaptureResource::new();
    resource.set_video_enabled(false);
    resource.set_audio_enabled(false);

    let backend = TestPatternBackend::with_warmup(small_config(), 0);
    resource.acquire(Box::new(backend)).await.unwrap();
    assert!(!resource.video_enabled());
    assert!(!resource.audio_enabled());

    // Disabled video track delivers black frames
    let frame = resource.grab_frame().unwrap();
    assert!(frame.pixels.iter().all(|&b| b == 0));

    resource.set_video_enabled(true);
    let frame = resource.grab_frame().unwrap();
    assert!(frame.pixels.iter().any(|&b| b != 0));
}

#[tokio::test]
async fn warmup_frame_has_no_dimensions() {
    let mut resource = CaptureResource::new();
    resource
        .acquire(Box::new(TestPatternBackend::with_warmup(small_config(), 1)))
        .await
        .unwrap();

    let codec = FrameCodec::new(80);

    let first = resource.grab_frame().unwrap();
    assert_eq!((first.width, first.height), (0, 0));
    assert!(matches!(codec.encode(&first), Err(FrameError::NotReady)));

    let second = resource.grab_frame().unwrap();
    assert_eq!((second.width, second.height), (32, 24));

    let encoded = codec.encode(&second).unwrap();
    // Base64 of the JPEG SOI marker
    assert!(encoded.base64.starts_with("/9j/"));
    assert_eq!((encoded.width, encoded.height), (32, 24));
}

#[test]
fn codec_rejects_mismatched_pixel_buffer() {
    let codec = FrameCodec::new(80);
    let frame = VideoFrame {
        pixels: vec![0u8; 10],
        width: 32,
        height: 24,
        timestamp_ms: 0,
    };

    assert!(matches!(codec.encode(&frame), Err(FrameError::Encode(_))));
}

#[test]
fn factory_creates_testpattern_backend() {
    let backend =
        CaptureBackendFactory::create(CaptureSource::TestPattern, small_config()).unwrap();
    assert_eq!(backend.name(), "testpattern");
}

#[test]
fn factory_rejects_camera_without_platform_backend() {
    let result = CaptureBackendFactory::create(
        CaptureSource::Camera("/dev/video0".to_string()),
        small_config(),
    );
    assert!(result.is_err());
}

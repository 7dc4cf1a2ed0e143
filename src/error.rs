use thiserror::Error;

/// Errors raised while acquiring or using the capture device.
///
/// Each variant carries the user-facing message shown next to the retry
/// action in the session view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("camera or microphone access was denied; check your permission settings")]
    PermissionDenied,

    #[error("no camera or microphone was found on this device")]
    DeviceNotFound,

    #[error("the camera or microphone is already in use by another application")]
    DeviceBusy,

    #[error("could not open the capture device: {0}")]
    Unknown(String),

    /// The resource was released (or never acquired); capture requires a
    /// fresh `acquire` first.
    #[error("capture device is not acquired")]
    NotAcquired,
}

/// Errors raised while turning a live frame into a transportable image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The frame source reports zero spatial dimensions (device still
    /// warming up). Recoverable; the sampling loop skips the tick silently.
    #[error("frame source has no dimensions yet")]
    NotReady,

    #[error("failed to encode frame: {0}")]
    Encode(String),
}

/// Errors raised by one analyzer call.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// HTTP 401: the bearer token was rejected. Fatal to the session.
    #[error("analyzer rejected the session token")]
    AuthRejected,

    /// Any other non-2xx status. Transient.
    #[error("analyzer returned status {0}")]
    Status(u16),

    /// The bounded per-call timeout elapsed. Transient.
    #[error("analyzer request timed out")]
    Timeout,

    /// Connection-level failure (DNS, refused, reset, malformed body).
    /// Transient.
    #[error("analyzer request failed: {0}")]
    Transport(String),
}

impl AnalyzerError {
    pub fn is_auth(&self) -> bool {
        matches!(self, AnalyzerError::AuthRejected)
    }
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalyzerError::Timeout
        } else {
            AnalyzerError::Transport(err.to_string())
        }
    }
}

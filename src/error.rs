use reqwest::StatusCode;

/// Errors raised by capture backends and sessions.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The OS refused microphone access.
    #[error("microphone access denied")]
    PermissionDenied,

    /// No usable input device (missing hardware or unknown device name).
    #[error("no audio input device available")]
    DeviceUnavailable,

    /// The requested operation is not valid in the session's current state.
    #[error("operation not valid while session is {state}")]
    InvalidState { state: &'static str },

    /// The capture stream failed to build or run.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// WAV encoding or decoding failed.
    #[error("wav codec error: {0}")]
    Wav(#[from] hound::Error),

    /// A playback file could not be written or removed.
    #[error("playback file I/O failed: {0}")]
    Playback(#[from] std::io::Error),
}

/// Errors raised by the sync client.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The upload endpoint answered with a non-success status.
    #[error("upload rejected with status {0}")]
    UploadFailed(StatusCode),

    /// A list endpoint answered with a non-success status.
    #[error("fetch rejected with status {0}")]
    FetchFailed(StatusCode),

    /// The response body was not the JSON shape we expected.
    #[error("failed to decode response body")]
    Decode(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The request was cancelled (client shutting down).
    #[error("request cancelled")]
    Cancelled,

    /// Any other transport-level failure.
    #[error(transparent)]
    Request(reqwest::Error),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::Timeout
        } else if err.is_decode() {
            SyncError::Decode(err)
        } else {
            SyncError::Request(err)
        }
    }
}

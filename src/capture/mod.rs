//! Image capture feeding the add flow
//!
//! The UI owns the actual widgets (file picker, webcam preview); this module
//! defines the contract they fulfil and the pending-image buffer sitting
//! between a capture and the eventual "Add". Camera frames arrive as base64
//! `data:` URLs from the webcam widget and are decoded here.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use parking_lot::Mutex;

/// Source of raw image payloads, implemented by the UI layer
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Grab one frame from the live camera feed, `None` if unavailable
    async fn capture_frame(&self) -> Result<Option<Bytes>, CaptureError>;

    /// Let the user pick an image file, `None` if they cancel
    async fn pick_file(&self) -> Result<Option<Bytes>, CaptureError>;
}

/// Pending image buffer between capture and add. The most recent capture
/// wins; a successful add clears it.
#[derive(Default)]
pub struct CaptureSession {
    pending: Mutex<Option<Bytes>>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a payload, replacing any earlier one
    pub fn stage(&self, image: Bytes) {
        *self.pending.lock() = Some(image);
    }

    /// Current staged payload, if any (cheap clone of shared bytes)
    pub fn peek(&self) -> Option<Bytes> {
        self.pending.lock().clone()
    }

    /// Take the staged payload, leaving the buffer empty
    pub fn take(&self) -> Option<Bytes> {
        self.pending.lock().take()
    }

    /// Drop any staged payload
    pub fn clear(&self) {
        *self.pending.lock() = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.lock().is_some()
    }
}

/// Decode a `data:<mime>;base64,<payload>` camera frame into raw bytes
pub fn decode_data_url(data_url: &str) -> Result<Bytes, CaptureError> {
    let (header, payload) = data_url.split_once(',').ok_or(CaptureError::NotADataUrl)?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(CaptureError::NotADataUrl);
    }
    let bytes = STANDARD.decode(payload)?;
    Ok(Bytes::from(bytes))
}

/// Capture errors
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("not a base64 data URL")]
    NotADataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("capture device unavailable: {0}")]
    Device(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camera_frames() {
        // "hello" as a jpeg-flavored data URL
        let frame = decode_data_url("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(frame.as_ref(), b"hello");
    }

    #[test]
    fn rejects_non_data_urls() {
        assert!(matches!(
            decode_data_url("https://example.com/apple.png"),
            Err(CaptureError::NotADataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png,rawtext"),
            Err(CaptureError::NotADataUrl)
        ));
    }

    #[test]
    fn rejects_broken_base64() {
        assert!(matches!(
            decode_data_url("data:image/jpeg;base64,@@@"),
            Err(CaptureError::Base64(_))
        ));
    }

    #[test]
    fn most_recent_capture_wins() {
        let session = CaptureSession::new();
        session.stage(Bytes::from_static(b"first"));
        session.stage(Bytes::from_static(b"second"));
        assert_eq!(session.take().unwrap().as_ref(), b"second");
        assert!(!session.has_pending());
    }

    #[test]
    fn clear_drops_the_pending_payload() {
        let session = CaptureSession::new();
        session.stage(Bytes::from_static(b"frame"));
        session.clear();
        assert!(session.peek().is_none());
    }
}

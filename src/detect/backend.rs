use anyhow::Result;

use crate::record::Detection;

/// Detector backend trait.
///
/// A backend turns decoded pixels into labeled detections. The pixel slice
/// is tightly packed RGB8 (`width * height * 3` bytes) and must be treated
/// as read-only and ephemeral: implementations must not retain it beyond
/// the `detect` call.
///
/// Backends report raw detections; confidence filtering happens in the
/// ingestion layer so the threshold stays a single configuration concern.
pub trait DetectorBackend: Send {
    /// Backend identifier, used for registry lookup and CLI selection.
    fn name(&self) -> &'static str;

    /// Run detection on one image.
    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<Detection>>;

    /// Optional warm-up hook (model loading, first-inference JIT).
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

use std::collections::VecDeque;

use anyhow::{anyhow, Result};
use sha2::{Digest, Sha256};

use crate::detect::backend::DetectorBackend;
use crate::record::{BoundingBox, Detection};

/// Label vocabulary for hash-derived detections.
const STUB_LABELS: [&str; 4] = ["person", "car", "dog", "bicycle"];

/// One scripted outcome for a `detect` call.
#[derive(Clone, Debug)]
pub enum StubOutcome {
    Emit(Vec<Detection>),
    Fail(String),
}

/// Stub backend for testing and demos.
///
/// In its default mode it derives a synthetic detection set from a SHA-256
/// digest of the pixels, so the same image always yields the same
/// detections and different images usually differ. Scripted mode replays a
/// fixed sequence of outcomes, which is how tests inject per-image
/// failures into batch ingestion.
pub struct StubBackend {
    script: Option<VecDeque<StubOutcome>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self { script: None }
    }

    /// Replay `outcomes` in order; further calls fail.
    pub fn scripted(outcomes: Vec<StubOutcome>) -> Self {
        Self {
            script: Some(outcomes.into()),
        }
    }

    fn hash_detections(pixels: &[u8], width: u32, height: u32) -> Vec<Detection> {
        let digest: [u8; 32] = Sha256::digest(pixels).into();
        let (w, h) = (width as f32, height as f32);

        let mut detections = Vec::new();
        let mut cursor = STUB_LABELS.len();
        for (i, label) in STUB_LABELS.iter().enumerate() {
            let count = digest[i] % 4;
            for _ in 0..count {
                let x1 = (digest[cursor % 32] as f32 / 255.0) * w * 0.5;
                let y1 = (digest[(cursor + 1) % 32] as f32 / 255.0) * h * 0.5;
                let bw = 1.0 + (digest[(cursor + 2) % 32] as f32 / 255.0) * w * 0.4;
                let bh = 1.0 + (digest[(cursor + 3) % 32] as f32 / 255.0) * h * 0.4;
                let confidence = 0.5 + digest[(cursor + 4) % 32] as f32 / 512.0;
                cursor += 5;
                detections.push(Detection::new(
                    *label,
                    confidence,
                    BoundingBox {
                        x1,
                        y1,
                        x2: x1 + bw,
                        y2: y1 + bh,
                    },
                ));
            }
        }
        detections
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<Detection>> {
        match &mut self.script {
            None => Ok(Self::hash_detections(pixels, width, height)),
            Some(script) => match script.pop_front() {
                Some(StubOutcome::Emit(detections)) => Ok(detections),
                Some(StubOutcome::Fail(reason)) => Err(anyhow!("stub failure: {}", reason)),
                None => Err(anyhow!("stub script exhausted")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_mode_is_deterministic() {
        let mut backend = StubBackend::new();
        let pixels = vec![7u8; 12 * 8 * 3];
        let first = backend.detect(&pixels, 12, 8).unwrap();
        let second = backend.detect(&pixels, 12, 8).unwrap();
        assert_eq!(first, second);
        for det in &first {
            assert!(det.bbox.x2 >= det.bbox.x1);
            assert!(det.bbox.y2 >= det.bbox.y1);
            assert!((0.0..=1.0).contains(&det.confidence));
        }
    }

    #[test]
    fn scripted_mode_replays_outcomes() {
        let det = Detection::new("person", 0.9, [0.0, 0.0, 1.0, 1.0].into());
        let mut backend = StubBackend::scripted(vec![
            StubOutcome::Emit(vec![det.clone()]),
            StubOutcome::Fail("inference error".into()),
        ]);
        assert_eq!(backend.detect(&[], 1, 1).unwrap(), vec![det]);
        assert!(backend.detect(&[], 1, 1).is_err());
        assert!(backend.detect(&[], 1, 1).is_err());
    }
}

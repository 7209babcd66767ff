//! Per-image detection metadata.
//!
//! A `DetectionRecord` holds every detection found in one image plus the
//! derived per-class counts. Records are created once by the ingestion layer
//! and never mutated afterwards; the matcher and aggregator treat
//! `class_counts` as the canonical source for per-class counts, and
//! `counts_consistent` re-derives them from the raw detections as the
//! verification oracle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Axis-aligned box in image pixel coordinates, `x2 >= x1`, `y2 >= y1`.
///
/// Serializes as a `[x1, y1, x2, y2]` array to match the metadata
/// interchange format.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl From<[f32; 4]> for BoundingBox {
    fn from(v: [f32; 4]) -> Self {
        Self {
            x1: v[0],
            y1: v[1],
            x2: v[2],
            y2: v[3],
        }
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

/// One detected object instance within one image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Object category name (non-empty).
    #[serde(rename = "class")]
    pub label: String,
    /// Detector-reported confidence in `[0, 1]`.
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }
}

/// All detections for a single image plus derived per-class counts.
///
/// Immutable after construction: the only way to build one is
/// [`DetectionRecord::from_detections`], which derives `total_objects` and
/// `class_counts` from the detection list, so the count invariant holds by
/// construction. Deserialized records are the persistence layer's
/// responsibility; [`DetectionRecord::counts_consistent`] is the oracle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    image_path: String,
    detections: Vec<Detection>,
    total_objects: usize,
    class_counts: BTreeMap<String, u32>,
}

impl DetectionRecord {
    /// Build a record for one image, deriving the per-class counts.
    ///
    /// Detection order is the detector's emission order and carries no
    /// matching semantics.
    pub fn from_detections(image_path: impl Into<String>, detections: Vec<Detection>) -> Self {
        let mut class_counts: BTreeMap<String, u32> = BTreeMap::new();
        for det in &detections {
            *class_counts.entry(det.label.clone()).or_insert(0) += 1;
        }
        Self {
            image_path: image_path.into(),
            total_objects: detections.len(),
            detections,
            class_counts,
        }
    }

    /// Opaque reference to the source image; not interpreted by the core.
    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    pub fn total_objects(&self) -> usize {
        self.total_objects
    }

    /// Per-class detection counts. Classes with zero detections are absent.
    pub fn class_counts(&self) -> &BTreeMap<String, u32> {
        &self.class_counts
    }

    /// Count of detections labeled `label`; 0 when the class is absent.
    pub fn class_count(&self, label: &str) -> u32 {
        self.class_counts.get(label).copied().unwrap_or(0)
    }

    /// Classes present in this image.
    pub fn unique_classes(&self) -> impl Iterator<Item = &str> {
        self.class_counts.keys().map(String::as_str)
    }

    /// Re-derives `class_counts` from `detections` and compares.
    ///
    /// Always true for constructed records; used to validate records that
    /// arrive through deserialization.
    pub fn counts_consistent(&self) -> bool {
        let mut recount: BTreeMap<&str, u32> = BTreeMap::new();
        for det in &self.detections {
            *recount.entry(det.label.as_str()).or_insert(0) += 1;
        }
        self.total_objects == self.detections.len()
            && self.class_counts.len() == recount.len()
            && self
                .class_counts
                .iter()
                .all(|(label, count)| recount.get(label.as_str()) == Some(count))
    }
}

//! Batch ingestion: turn a directory of images into detection records.
//!
//! One failing image must never abort the batch. Decode or inference
//! errors are logged and the image is skipped; every other image still
//! produces a `DetectionRecord`.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};

use crate::detect::DetectorBackend;
use crate::record::DetectionRecord;

/// Lists image files directly under `dir`, filtered by extension
/// (case-insensitive, no leading dot), sorted by path for deterministic
/// processing order.
pub fn list_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(anyhow!("not a directory: {}", dir.display()));
    }
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
            .unwrap_or(false);
        if matches {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Decodes one image, runs the backend, and builds its record.
///
/// Detections below `conf_threshold` are dropped before the record is
/// built, so persisted class counts only reflect detections the caller
/// considers real.
pub fn process_image(
    path: &Path,
    backend: &mut dyn DetectorBackend,
    conf_threshold: f32,
) -> Result<DetectionRecord> {
    let img = image::open(path)
        .with_context(|| format!("failed to decode {}", path.display()))?
        .to_rgb8();
    let (width, height) = img.dimensions();

    let mut detections = backend
        .detect(img.as_raw(), width, height)
        .with_context(|| format!("detection failed for {}", path.display()))?;
    detections.retain(|det| det.confidence >= conf_threshold);

    debug!(
        "{}: {} detections above threshold",
        path.display(),
        detections.len()
    );
    Ok(DetectionRecord::from_detections(
        path.to_string_lossy(),
        detections,
    ))
}

/// Processes every image in `dir`, skipping failures.
///
/// Record order is processing order (sorted path order from
/// [`list_images`]).
pub fn process_directory(
    dir: &Path,
    backend: &mut dyn DetectorBackend,
    conf_threshold: f32,
    extensions: &[String],
) -> Result<Vec<DetectionRecord>> {
    let paths = list_images(dir, extensions)?;
    let mut records = Vec::with_capacity(paths.len());
    for path in &paths {
        match process_image(path, backend, conf_threshold) {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping {}: {:#}", path.display(), e),
        }
    }
    Ok(records)
}

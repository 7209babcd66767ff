use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_DB_PATH: &str = "imgsift.db";
const DEFAULT_BACKEND: &str = "stub";
const DEFAULT_CONF_THRESHOLD: f32 = 0.25;
const DEFAULT_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Deserialize, Default)]
struct AppConfigFile {
    db_path: Option<String>,
    model: Option<ModelConfigFile>,
    data: Option<DataConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct ModelConfigFile {
    backend: Option<String>,
    conf_threshold: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
struct DataConfigFile {
    image_extensions: Option<Vec<String>>,
}

/// Resolved application configuration.
///
/// Precedence: JSON file named by `IMGSIFT_CONFIG`, then `IMGSIFT_*` env
/// overrides, then defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub backend: String,
    /// Detections below this confidence are dropped at ingestion.
    pub conf_threshold: f32,
    /// Accepted image extensions, lowercase, no leading dot.
    pub image_extensions: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("IMGSIFT_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: AppConfigFile) -> Self {
        let db_path = file.db_path.unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let backend = file
            .model
            .as_ref()
            .and_then(|model| model.backend.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND.to_string());
        let conf_threshold = file
            .model
            .and_then(|model| model.conf_threshold)
            .unwrap_or(DEFAULT_CONF_THRESHOLD);
        let image_extensions = file
            .data
            .and_then(|data| data.image_extensions)
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect());
        Self {
            db_path,
            backend,
            conf_threshold,
            image_extensions,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("IMGSIFT_DB_PATH") {
            if !path.trim().is_empty() {
                self.db_path = path;
            }
        }
        if let Ok(backend) = std::env::var("IMGSIFT_BACKEND") {
            if !backend.trim().is_empty() {
                self.backend = backend;
            }
        }
        if let Ok(threshold) = std::env::var("IMGSIFT_CONF_THRESHOLD") {
            let threshold: f32 = threshold
                .parse()
                .map_err(|_| anyhow!("IMGSIFT_CONF_THRESHOLD must be a number"))?;
            self.conf_threshold = threshold;
        }
        if let Ok(extensions) = std::env::var("IMGSIFT_IMAGE_EXTENSIONS") {
            let parsed = split_csv(&extensions);
            if !parsed.is_empty() {
                self.image_extensions = parsed;
            }
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.conf_threshold) {
            return Err(anyhow!(
                "conf_threshold must be in [0, 1], got {}",
                self.conf_threshold
            ));
        }
        if self.image_extensions.is_empty() {
            return Err(anyhow!("image_extensions must not be empty"));
        }
        self.image_extensions = self
            .image_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<AppConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}

use std::sync::Mutex;

use tempfile::NamedTempFile;

use imgsift::config::AppConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "IMGSIFT_CONFIG",
        "IMGSIFT_DB_PATH",
        "IMGSIFT_BACKEND",
        "IMGSIFT_CONF_THRESHOLD",
        "IMGSIFT_IMAGE_EXTENSIONS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_apply_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = AppConfig::load().expect("load config");
    assert_eq!(cfg.db_path, "imgsift.db");
    assert_eq!(cfg.backend, "stub");
    assert!((cfg.conf_threshold - 0.25).abs() < f32::EPSILON);
    assert_eq!(cfg.image_extensions, vec!["jpg", "jpeg", "png"]);

    clear_env();
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "db_path": "survey.db",
        "model": {
            "backend": "stub",
            "conf_threshold": 0.4
        },
        "data": {
            "image_extensions": [".JPG", "png"]
        }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("IMGSIFT_CONFIG", file.path());
    std::env::set_var("IMGSIFT_DB_PATH", "override.db");
    std::env::set_var("IMGSIFT_CONF_THRESHOLD", "0.6");

    let cfg = AppConfig::load().expect("load config");
    assert_eq!(cfg.db_path, "override.db");
    assert_eq!(cfg.backend, "stub");
    assert!((cfg.conf_threshold - 0.6).abs() < f32::EPSILON);
    // Extensions normalize to lowercase without the leading dot.
    assert_eq!(cfg.image_extensions, vec!["jpg", "png"]);

    clear_env();
}

#[test]
fn rejects_out_of_range_threshold() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("IMGSIFT_CONF_THRESHOLD", "1.5");
    assert!(AppConfig::load().is_err());

    std::env::set_var("IMGSIFT_CONF_THRESHOLD", "not a number");
    assert!(AppConfig::load().is_err());

    clear_env();
}

#[test]
fn extension_csv_override() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("IMGSIFT_IMAGE_EXTENSIONS", " jpeg , .PNG ,");
    let cfg = AppConfig::load().expect("load config");
    assert_eq!(cfg.image_extensions, vec!["jpeg", "png"]);

    clear_env();
}

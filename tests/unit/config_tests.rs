// Config file loading

use std::io::Write;
use tempfile::NamedTempFile;
use watermarker::config::{Config, LogFormat};
use watermarker::watermark::{WatermarkKind, WatermarkOptions, WatermarkPosition};

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(yaml.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_load_config_from_file() {
    let file = write_config(
        r#"
watermark:
  type: text
  text: "(c) Example"
  fontSize: 48
  fontColor: "rgba(0, 0, 0, 1)"
  opacity: 0.8
  position: top-right
logging:
  level: warn
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());

    let settings = config.settings();
    assert_eq!(settings.kind, WatermarkKind::Text);
    assert_eq!(settings.text, "(c) Example");
    assert_eq!(settings.font_size, 48);
    assert_eq!(settings.font_color, "rgba(0, 0, 0, 1)");
    assert_eq!(settings.opacity, 0.8);
    assert_eq!(settings.position, WatermarkPosition::TopRight);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Text);
}

#[test]
fn test_missing_file() {
    let err = Config::from_file("/definitely/not/here/config.yaml").unwrap_err();
    assert!(err.starts_with("Failed to read config file"));
}

#[test]
fn test_malformed_yaml() {
    let file = write_config("watermark: 42\n");
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_cli_overrides_file() {
    let file = write_config("watermark:\n  type: image\n  image_path: logo.png\n  scale: 0.3\n");
    let config = Config::from_file(file.path())
        .unwrap()
        .with_overrides(&WatermarkOptions {
            scale: Some(0.5),
            ..Default::default()
        });

    let settings = config.settings();
    assert_eq!(settings.kind, WatermarkKind::Image);
    assert_eq!(settings.image_path, "logo.png");
    assert_eq!(settings.scale, 0.5);
}

#[test]
fn test_invalid_watermark_section_fails_validation() {
    let file = write_config("watermark:\n  type: image\n  scale: -2\n");
    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_err());
}

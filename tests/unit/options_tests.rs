// Option resolution: presence wins, falsy values are real values

use watermarker::watermark::{
    WatermarkKind, WatermarkOptions, WatermarkPosition, WatermarkProcessor, WatermarkSettings,
};

#[test]
fn test_defaults() {
    let settings = WatermarkSettings::default();
    assert_eq!(settings.kind, WatermarkKind::Text);
    assert_eq!(settings.text, "Watermark");
    assert_eq!(settings.image_path, "");
    assert_eq!(settings.font_size, 32);
    assert_eq!(settings.font_color, "#ffffff");
    assert_eq!(settings.opacity, 0.5);
    assert_eq!(settings.position, WatermarkPosition::BottomRight);
    assert_eq!(settings.margin, 20);
    assert_eq!(settings.scale, 0.2);
}

#[test]
fn test_zero_and_empty_overrides_are_kept() {
    let settings = WatermarkOptions {
        text: Some(String::new()),
        opacity: Some(0.0),
        margin: Some(0),
        ..Default::default()
    }
    .resolve();

    assert_eq!(settings.text, "");
    assert_eq!(settings.opacity, 0.0);
    assert_eq!(settings.margin, 0);
}

#[test]
fn test_layering_defaults_file_cli() {
    let file = WatermarkOptions {
        text: Some("From file".to_string()),
        margin: Some(40),
        position: Some(WatermarkPosition::TopLeft),
        ..Default::default()
    };
    let cli = WatermarkOptions {
        margin: Some(0),
        ..Default::default()
    };

    let settings = file.merge(&cli).resolve();
    assert_eq!(settings.text, "From file");
    assert_eq!(settings.margin, 0);
    assert_eq!(settings.position, WatermarkPosition::TopLeft);
    assert_eq!(settings.font_size, 32);
}

#[test]
fn test_fields_of_inactive_kind_are_not_validated() {
    // Image mode never reads opacity
    let image = WatermarkOptions {
        kind: Some(WatermarkKind::Image),
        opacity: Some(7.0),
        ..Default::default()
    };
    assert!(WatermarkProcessor::new(image.resolve()).is_ok());

    // Text mode never reads scale
    let text = WatermarkOptions {
        scale: Some(-1.0),
        ..Default::default()
    };
    assert!(WatermarkProcessor::new(text.resolve()).is_ok());
}

#[test]
fn test_invalid_active_fields_are_rejected() {
    let text = WatermarkOptions {
        opacity: Some(-0.1),
        ..Default::default()
    };
    assert!(WatermarkProcessor::new(text.resolve()).is_err());

    let image = WatermarkOptions {
        kind: Some(WatermarkKind::Image),
        scale: Some(0.0),
        ..Default::default()
    };
    assert!(WatermarkProcessor::new(image.resolve()).is_err());
}

#[test]
fn test_position_parsing() {
    assert_eq!(
        "Top-Right".parse::<WatermarkPosition>().unwrap(),
        WatermarkPosition::TopRight
    );
    assert!("center".parse::<WatermarkPosition>().is_err());
    assert_eq!("image".parse::<WatermarkKind>().unwrap(), WatermarkKind::Image);
}

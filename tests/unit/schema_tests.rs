// Schema registration and host argument resolution

use serde_json::json;
use watermarker::plugin::schema::{OPTIONS_FIELDS, OPTIONS_TYPE_NAME};
use watermarker::plugin::{register_schema, resolve_args, SchemaRegistry};
use watermarker::watermark::{WatermarkKind, WatermarkSettings};

#[derive(Default)]
struct CollectingRegistry {
    type_defs: String,
}

impl SchemaRegistry for CollectingRegistry {
    fn create_types(&mut self, type_defs: &str) {
        self.type_defs.push_str(type_defs);
    }
}

#[test]
fn test_schema_declares_every_option() {
    let mut registry = CollectingRegistry::default();
    register_schema(&mut registry);

    assert!(registry
        .type_defs
        .starts_with(&format!("type {} {{", OPTIONS_TYPE_NAME)));
    for field in OPTIONS_FIELDS {
        assert!(
            registry.type_defs.contains(&format!("  {}: ", field.name)),
            "missing field {}",
            field.name
        );
    }
    assert!(registry.type_defs.contains("  opacity: Float"));
    assert!(registry.type_defs.contains("  fontSize: Int"));
}

#[test]
fn test_host_arguments_resolve_by_presence() {
    let settings = resolve_args(&json!({
        "type": "text",
        "fontSize": 12,
        "opacity": 0,
        "margin": null,
    }))
    .unwrap();

    assert_eq!(settings.kind, WatermarkKind::Text);
    assert_eq!(settings.font_size, 12);
    assert_eq!(settings.opacity, 0.0);
    assert_eq!(settings.margin, WatermarkSettings::default().margin);
}

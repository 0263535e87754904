//! Options schema exposed to a host's schema registry.
//!
//! The host declares a `WatermarkOptions` type with one field per option so
//! that callers can override each field independently. Arguments coming back
//! from the host are resolved against the defaults by presence, not by
//! truthiness.

use crate::watermark::{WatermarkError, WatermarkOptions, WatermarkSettings};

/// Name of the options type registered with the host.
pub const OPTIONS_TYPE_NAME: &str = "WatermarkOptions";

/// Scalar type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Int,
    Float,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub field_type: FieldType,
}

const fn field(name: &'static str, field_type: FieldType) -> SchemaField {
    SchemaField { name, field_type }
}

/// Fields of the options type, in declaration order.
pub const OPTIONS_FIELDS: &[SchemaField] = &[
    field("type", FieldType::String),
    field("text", FieldType::String),
    field("imagePath", FieldType::String),
    field("fontSize", FieldType::Int),
    field("fontColor", FieldType::String),
    field("opacity", FieldType::Float),
    field("position", FieldType::String),
    field("margin", FieldType::Int),
    field("scale", FieldType::Float),
];

/// Something that accepts type definitions, e.g. a GraphQL schema builder.
pub trait SchemaRegistry {
    fn create_types(&mut self, type_defs: &str);
}

/// Render a type definition in SDL form.
pub fn render_type_definition(type_name: &str, fields: &[SchemaField]) -> String {
    let body: String = fields
        .iter()
        .map(|f| format!("  {}: {}\n", f.name, f.field_type.as_str()))
        .collect();
    format!("type {} {{\n{}}}\n", type_name, body)
}

/// Register the options type with `registry`.
pub fn register_schema(registry: &mut dyn SchemaRegistry) {
    let type_defs = render_type_definition(OPTIONS_TYPE_NAME, OPTIONS_FIELDS);
    tracing::debug!(type_name = OPTIONS_TYPE_NAME, "Registering watermark options schema");
    registry.create_types(&type_defs);
}

/// Resolve field arguments supplied by the host (a JSON object keyed by the
/// schema field names) into concrete settings. Absent or `null` fields take
/// their defaults; everything else, including `0` and `""`, is kept.
pub fn resolve_args(args: &serde_json::Value) -> Result<WatermarkSettings, WatermarkError> {
    let args = match args {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => {
            return Err(WatermarkError::Config(format!(
                "watermark arguments must be an object, got {}",
                other
            )))
        }
    };

    let options: WatermarkOptions =
        serde_json::from_value(args).map_err(|e| WatermarkError::Config(e.to_string()))?;
    Ok(options.resolve())
}

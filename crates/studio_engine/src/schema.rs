use serde_json::Value;
use studio_core::{NodeTemplate, NodeTemplates};
use studio_logging::{studio_debug, Namespace};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("openapi schema has no components.schemas object")]
    MissingComponents,
}

/// Builds node templates from the backend's OpenAPI document.
///
/// Invocation schemas are tagged with `"class": "invocation"` and carry their
/// node type as the default of the `type` property. Schemas without a type
/// default are abstract bases and are skipped.
pub fn parse_openapi_schema(schema: &Value) -> Result<NodeTemplates, SchemaError> {
    let schemas = schema
        .pointer("/components/schemas")
        .and_then(Value::as_object)
        .ok_or(SchemaError::MissingComponents)?;

    let mut templates = NodeTemplates::new();
    for (name, definition) in schemas {
        if definition.get("class").and_then(Value::as_str) != Some("invocation") {
            continue;
        }
        let Some(node_type) = definition
            .pointer("/properties/type/default")
            .and_then(Value::as_str)
        else {
            studio_debug!(Namespace::Schema, "Skipping {} without a type default", name);
            continue;
        };

        let template = NodeTemplate {
            node_type: node_type.to_string(),
            title: string_field(definition, "title").unwrap_or_else(|| name.clone()),
            version: string_field(definition, "version").unwrap_or_else(|| "1.0.0".to_string()),
            category: string_field(definition, "category"),
            tags: definition
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .map(ToOwned::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
        };
        templates.insert(template.node_type.clone(), template);
    }

    studio_debug!(Namespace::Schema, "Parsed {} node templates", templates.len());
    Ok(templates)
}

fn string_field(definition: &Value, field: &str) -> Option<String> {
    definition
        .get(field)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

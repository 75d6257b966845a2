//! Loader for the OData CSDL JSON format, as served by `$metadata?$format=json`.

use std::collections::HashMap;

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace};

use crate::error::SchemaError;
use crate::schema::{
    EdmModel, EdmModelBuilder, NavigationProperty, StructuralProperty, StructuredType, TypeKind,
};

const MAX_BASE_TYPE_DEPTH: usize = 32;

type JsonObject = Map<String, JsonValue>;

impl EdmModel {
    pub fn from_csdl_json(source: &str) -> Result<EdmModel, SchemaError> {
        let document: JsonValue = serde_json::from_str(source)?;
        Self::from_csdl_value(&document)
    }

    pub fn from_csdl_value(document: &JsonValue) -> Result<EdmModel, SchemaError> {
        let root = document
            .as_object()
            .ok_or_else(|| malformed("$", "expected a JSON object"))?;
        let container_ref = root
            .get("$EntityContainer")
            .and_then(JsonValue::as_str)
            .ok_or(SchemaError::MissingEntityContainer)?;

        let aliases = collect_aliases(root);
        let mut types: HashMap<String, StructuredType> = HashMap::new();
        let mut operation_returns: HashMap<String, String> = HashMap::new();
        let mut builder = EdmModel::builder();
        let mut container = None;

        for (namespace, schema) in schema_entries(root) {
            for (element_name, element) in schema {
                if element_name.starts_with('$') {
                    continue;
                }
                let qualified_name = format!("{}.{}", namespace, element_name);

                // Unbound actions and functions are declared as overload arrays
                if let Some(overloads) = element.as_array() {
                    if let Some(return_type) = overload_return_type(overloads, &aliases) {
                        operation_returns.insert(qualified_name, return_type);
                    }
                    continue;
                }
                let Some(element) = element.as_object() else {
                    continue;
                };

                match element.get("$Kind").and_then(JsonValue::as_str) {
                    Some("EntityType") => {
                        let parsed =
                            parse_structured_type(&qualified_name, TypeKind::Entity, element, &aliases)?;
                        types.insert(qualified_name, parsed);
                    }
                    Some("ComplexType") => {
                        let parsed =
                            parse_structured_type(&qualified_name, TypeKind::Complex, element, &aliases)?;
                        types.insert(qualified_name, parsed);
                    }
                    Some("EntityContainer") => {
                        if qualified_name == resolve_alias(container_ref, &aliases) {
                            container = Some((qualified_name, element));
                        }
                    }
                    other => {
                        trace!(element = qualified_name, kind = ?other, "skipping CSDL element");
                    }
                }
            }
        }

        let Some((container_name, container)) = container else {
            return Err(SchemaError::UnknownEntityContainer(
                container_ref.to_string(),
            ));
        };
        parse_container(
            &container_name,
            container,
            &aliases,
            &operation_returns,
            &mut builder,
        )?;

        finish(builder, &types)
    }
}

/// Adds the inheritance-resolved types and builds the model.
pub(super) fn finish(
    mut builder: EdmModelBuilder,
    types: &HashMap<String, StructuredType>,
) -> Result<EdmModel, SchemaError> {
    for structured_type in inherit_base_types(types)? {
        builder.add_type(structured_type);
    }

    let model = builder.build();
    debug!(
        entity_sets = model.entity_sets().count(),
        types = model.types().count(),
        "loaded OData metadata"
    );

    Ok(model)
}

pub(super) fn malformed(element: &str, reason: impl Into<String>) -> SchemaError {
    SchemaError::MalformedElement {
        element: element.to_string(),
        reason: reason.into(),
    }
}

fn schema_entries(root: &JsonObject) -> impl Iterator<Item = (&String, &JsonObject)> {
    root.iter()
        .filter(|(name, _)| !name.starts_with('$'))
        .filter_map(|(name, schema)| schema.as_object().map(|schema| (name, schema)))
}

fn collect_aliases(root: &JsonObject) -> HashMap<String, String> {
    schema_entries(root)
        .filter_map(|(namespace, schema)| {
            schema
                .get("$Alias")
                .and_then(JsonValue::as_str)
                .map(|alias| (alias.to_string(), namespace.clone()))
        })
        .collect()
}

/// Rewrites `Alias.Name` references into `Namespace.Name`.
pub(super) fn resolve_alias(type_ref: &str, aliases: &HashMap<String, String>) -> String {
    match type_ref.rsplit_once('.') {
        Some((prefix, name)) => match aliases.get(prefix) {
            Some(namespace) => format!("{}.{}", namespace, name),
            None => type_ref.to_string(),
        },
        None => type_ref.to_string(),
    }
}

/// Return type of the first overload declaring one.
fn overload_return_type(
    overloads: &[JsonValue],
    aliases: &HashMap<String, String>,
) -> Option<String> {
    overloads
        .iter()
        .filter_map(JsonValue::as_object)
        .filter_map(|overload| overload.get("$ReturnType"))
        .filter_map(|return_type| return_type.get("$Type").and_then(JsonValue::as_str))
        .map(|type_ref| resolve_alias(type_ref, aliases))
        .next()
}

fn is_collection(element: &JsonObject) -> bool {
    element
        .get("$Collection")
        .and_then(JsonValue::as_bool)
        .unwrap_or(false)
}

fn parse_structured_type(
    qualified_name: &str,
    kind: TypeKind,
    element: &JsonObject,
    aliases: &HashMap<String, String>,
) -> Result<StructuredType, SchemaError> {
    let mut structured_type = StructuredType::new(qualified_name, kind);
    structured_type.base_type = element
        .get("$BaseType")
        .and_then(JsonValue::as_str)
        .map(|base| resolve_alias(base, aliases));

    if let Some(key) = element.get("$Key") {
        let key = key
            .as_array()
            .ok_or_else(|| malformed(qualified_name, "$Key must be an array"))?;
        // Aliased key entries are objects; only plain property names address entities
        structured_type.key = key
            .iter()
            .filter_map(JsonValue::as_str)
            .map(str::to_string)
            .collect();
    }

    for (property_name, property) in element {
        if property_name.starts_with('$') {
            continue;
        }
        let Some(property) = property.as_object() else {
            // Annotations targeting the property, e.g. `name@Core.Description`
            continue;
        };
        let type_name = property
            .get("$Type")
            .and_then(JsonValue::as_str)
            .map(|type_ref| resolve_alias(type_ref, aliases))
            .unwrap_or_else(|| "Edm.String".to_string());

        match property.get("$Kind").and_then(JsonValue::as_str) {
            Some("NavigationProperty") => {
                structured_type.add_navigation(NavigationProperty {
                    name: property_name.clone(),
                    target_type: type_name,
                    is_collection: is_collection(property),
                });
            }
            None | Some("Property") => {
                structured_type.add_structural(StructuralProperty {
                    name: property_name.clone(),
                    type_name,
                    is_collection: is_collection(property),
                });
            }
            Some(other) => {
                return Err(malformed(
                    &format!("{}/{}", qualified_name, property_name),
                    format!("unexpected member kind '{}'", other),
                ));
            }
        }
    }

    Ok(structured_type)
}

fn parse_container(
    qualified_name: &str,
    element: &JsonObject,
    aliases: &HashMap<String, String>,
    operation_returns: &HashMap<String, String>,
    builder: &mut EdmModelBuilder,
) -> Result<(), SchemaError> {
    for (member_name, member) in element {
        if member_name.starts_with('$') {
            continue;
        }
        let Some(member) = member.as_object() else {
            continue;
        };

        let operation = member
            .get("$Function")
            .or_else(|| member.get("$Action"))
            .and_then(JsonValue::as_str);
        if let Some(return_type) =
            operation.and_then(|operation| operation_returns.get(&resolve_alias(operation, aliases)))
        {
            builder.set_import_return_type(member_name, return_type.clone());
        }

        if member.contains_key("$Function") {
            builder.add_function_import(member_name);
        } else if member.contains_key("$Action") {
            builder.add_action_import(member_name);
        } else if let Some(entity_type) = member.get("$Type").and_then(JsonValue::as_str) {
            // Singletons are addressed exactly like entity sets
            builder.add_entity_set(member_name.clone(), resolve_alias(entity_type, aliases));
        } else {
            return Err(malformed(
                &format!("{}/{}", qualified_name, member_name),
                "container member has neither $Type, $Function nor $Action",
            ));
        }
    }

    Ok(())
}

fn inherit_base_types(
    types: &HashMap<String, StructuredType>,
) -> Result<Vec<StructuredType>, SchemaError> {
    let mut resolved = Vec::with_capacity(types.len());

    for structured_type in types.values() {
        let mut merged = structured_type.clone();
        let mut base_ref = structured_type.base_type.clone();
        let mut depth = 0;

        while let Some(base_name) = base_ref {
            depth += 1;
            if depth > MAX_BASE_TYPE_DEPTH {
                return Err(malformed(
                    &structured_type.name,
                    "base type chain is cyclic or too deep",
                ));
            }
            let base = types.get(&base_name).ok_or_else(|| {
                malformed(
                    &structured_type.name,
                    format!("base type '{}' is not defined", base_name),
                )
            })?;

            if merged.key.is_empty() {
                merged.key = base.key.clone();
            }
            for property in base.structural_properties() {
                merged.add_structural(property.clone());
            }
            for property in base.navigation_properties() {
                merged.add_navigation(property.clone());
            }
            base_ref = base.base_type.clone();
        }

        resolved.push(merged);
    }

    Ok(resolved)
}

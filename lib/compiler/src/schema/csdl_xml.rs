//! Loader for the OData CSDL XML format, as served by a plain `$metadata` request.

use std::collections::HashMap;

use roxmltree::{Document, Node};
use tracing::trace;

use crate::error::SchemaError;
use crate::schema::csdl::{finish, malformed, resolve_alias};
use crate::schema::{
    EdmModel, EdmModelBuilder, NavigationProperty, StructuralProperty, StructuredType, TypeKind,
};

impl EdmModel {
    /// Builds the model from either CSDL representation.
    ///
    /// Documents whose first significant character is `<` are read as XML, everything
    /// else as JSON.
    pub fn from_csdl(source: &str) -> Result<EdmModel, SchemaError> {
        if significant(source).starts_with('<') {
            Self::from_csdl_xml(source)
        } else {
            Self::from_csdl_json(source)
        }
    }

    pub fn from_csdl_xml(source: &str) -> Result<EdmModel, SchemaError> {
        let document = Document::parse(significant(source))?;
        let schemas: Vec<Node> = document
            .descendants()
            .filter(|node| node.is_element() && node.tag_name().name() == "Schema")
            .collect();
        let aliases: HashMap<String, String> = schemas
            .iter()
            .filter_map(|schema| {
                Some((
                    schema.attribute("Alias")?.to_string(),
                    schema.attribute("Namespace")?.to_string(),
                ))
            })
            .collect();

        let mut types: HashMap<String, StructuredType> = HashMap::new();
        let mut operation_returns: HashMap<String, String> = HashMap::new();
        let mut container = None;

        for schema in &schemas {
            let namespace = schema
                .attribute("Namespace")
                .ok_or_else(|| malformed("Schema", "missing the Namespace attribute"))?;

            for element in schema.children().filter(Node::is_element) {
                let Some(name) = element.attribute("Name") else {
                    continue;
                };
                let qualified_name = format!("{}.{}", namespace, name);

                match element.tag_name().name() {
                    "EntityType" => {
                        let parsed =
                            parse_structured_type(&qualified_name, TypeKind::Entity, element, &aliases)?;
                        types.insert(qualified_name, parsed);
                    }
                    "ComplexType" => {
                        let parsed =
                            parse_structured_type(&qualified_name, TypeKind::Complex, element, &aliases)?;
                        types.insert(qualified_name, parsed);
                    }
                    "Function" | "Action" => {
                        let return_type = child_elements(element, "ReturnType")
                            .find_map(|return_type| return_type.attribute("Type"));
                        if let Some(return_type) = return_type {
                            // Overloads share a name, the first declared return type wins
                            operation_returns
                                .entry(qualified_name)
                                .or_insert_with(|| type_reference(return_type, &aliases).0);
                        }
                    }
                    "EntityContainer" => {
                        if container.is_some() {
                            return Err(malformed(
                                &qualified_name,
                                "a service declares exactly one entity container",
                            ));
                        }
                        container = Some((qualified_name, element));
                    }
                    other => {
                        trace!(element = qualified_name, kind = other, "skipping CSDL element");
                    }
                }
            }
        }

        let (container_name, container) = container.ok_or(SchemaError::MissingEntityContainer)?;
        let mut builder = EdmModel::builder();
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

/// Skips a byte order mark and leading whitespace, neither may precede an XML declaration.
fn significant(source: &str) -> &str {
    source.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

/// Splits `Collection(T)` into `T` and a collection flag, resolving aliases.
fn type_reference(type_ref: &str, aliases: &HashMap<String, String>) -> (String, bool) {
    match type_ref
        .strip_prefix("Collection(")
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (resolve_alias(inner, aliases), true),
        None => (resolve_alias(type_ref, aliases), false),
    }
}

fn parse_structured_type(
    qualified_name: &str,
    kind: TypeKind,
    element: Node,
    aliases: &HashMap<String, String>,
) -> Result<StructuredType, SchemaError> {
    let mut structured_type = StructuredType::new(qualified_name, kind);
    structured_type.base_type = element
        .attribute("BaseType")
        .map(|base| resolve_alias(base, aliases));

    for member in element.children().filter(Node::is_element) {
        let member_kind = member.tag_name().name();
        match member_kind {
            "Key" => {
                // Aliased key entries point into complex properties; only plain names address entities
                structured_type.key = child_elements(member, "PropertyRef")
                    .filter(|property_ref| property_ref.attribute("Alias").is_none())
                    .filter_map(|property_ref| property_ref.attribute("Name"))
                    .map(str::to_string)
                    .collect();
            }
            "Property" | "NavigationProperty" => {
                let name = member.attribute("Name").ok_or_else(|| {
                    malformed(qualified_name, format!("{} without a Name", member_kind))
                })?;
                let (type_name, is_collection) = member
                    .attribute("Type")
                    .map(|type_ref| type_reference(type_ref, aliases))
                    .unwrap_or_else(|| ("Edm.String".to_string(), false));

                if member_kind == "NavigationProperty" {
                    structured_type.add_navigation(NavigationProperty {
                        name: name.to_string(),
                        target_type: type_name,
                        is_collection,
                    });
                } else {
                    structured_type.add_structural(StructuralProperty {
                        name: name.to_string(),
                        type_name,
                        is_collection,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(structured_type)
}

fn parse_container(
    qualified_name: &str,
    container: Node,
    aliases: &HashMap<String, String>,
    operation_returns: &HashMap<String, String>,
    builder: &mut EdmModelBuilder,
) -> Result<(), SchemaError> {
    for member in container.children().filter(Node::is_element) {
        let Some(member_name) = member.attribute("Name") else {
            continue;
        };
        let required = |attribute: &str| {
            member.attribute(attribute).ok_or_else(|| {
                malformed(
                    &format!("{}/{}", qualified_name, member_name),
                    format!("missing the {} attribute", attribute),
                )
            })
        };

        match member.tag_name().name() {
            "EntitySet" => {
                builder.add_entity_set(member_name, resolve_alias(required("EntityType")?, aliases));
            }
            // Singletons are addressed exactly like entity sets
            "Singleton" => {
                builder.add_entity_set(member_name, resolve_alias(required("Type")?, aliases));
            }
            "FunctionImport" | "ActionImport" => {
                let is_function = member.tag_name().name() == "FunctionImport";
                let operation = required(if is_function { "Function" } else { "Action" })?;
                if let Some(return_type) = operation_returns.get(&resolve_alias(operation, aliases)) {
                    builder.set_import_return_type(member_name, return_type.clone());
                }

                if is_function {
                    builder.add_function_import(member_name);
                } else {
                    builder.add_action_import(member_name);
                }
            }
            _ => {}
        }
    }

    Ok(())
}

pub mod csdl;
pub mod csdl_xml;
pub mod model;

use std::collections::HashMap;

pub use model::{EdmModel, EdmModelBuilder};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Entity,
    Complex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NavigationProperty {
    pub name: String,
    /// Qualified name of the target entity type.
    pub target_type: String,
    pub is_collection: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructuralProperty {
    pub name: String,
    /// Qualified type name, `Edm.*` for primitives.
    pub type_name: String,
    pub is_collection: bool,
}

impl StructuralProperty {
    pub fn is_primitive(&self) -> bool {
        self.type_name.starts_with("Edm.")
    }
}

/// An entity or complex type, with case-insensitive property lookups.
#[derive(Clone, Debug)]
pub struct StructuredType {
    pub name: String,
    pub kind: TypeKind,
    pub key: Vec<String>,
    pub base_type: Option<String>,
    navigation_properties: Vec<NavigationProperty>,
    structural_properties: Vec<StructuralProperty>,
    navigation_index: HashMap<String, usize>,
    structural_index: HashMap<String, usize>,
}

impl StructuredType {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            key: vec![],
            base_type: None,
            navigation_properties: vec![],
            structural_properties: vec![],
            navigation_index: HashMap::new(),
            structural_index: HashMap::new(),
        }
    }

    pub fn entity(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Entity)
    }

    pub fn complex(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Complex)
    }

    pub fn is_complex(&self) -> bool {
        self.kind == TypeKind::Complex
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key.push(key.into());
        self
    }

    pub fn with_property(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.with_structural(StructuralProperty {
            name: name.into(),
            type_name: type_name.into(),
            is_collection: false,
        })
    }

    pub fn with_navigation(
        self,
        name: impl Into<String>,
        target_type: impl Into<String>,
        is_collection: bool,
    ) -> Self {
        let mut this = self;
        this.add_navigation(NavigationProperty {
            name: name.into(),
            target_type: target_type.into(),
            is_collection,
        });
        this
    }

    pub fn with_structural(mut self, property: StructuralProperty) -> Self {
        self.add_structural(property);
        self
    }

    pub fn add_structural(&mut self, property: StructuralProperty) {
        let lookup = property.name.to_lowercase();
        if self.structural_index.contains_key(&lookup) {
            return;
        }
        self.structural_index
            .insert(lookup, self.structural_properties.len());
        self.structural_properties.push(property);
    }

    pub fn add_navigation(&mut self, property: NavigationProperty) {
        let lookup = property.name.to_lowercase();
        if self.navigation_index.contains_key(&lookup) {
            return;
        }
        self.navigation_index
            .insert(lookup, self.navigation_properties.len());
        self.navigation_properties.push(property);
    }

    pub fn navigation_properties(&self) -> &[NavigationProperty] {
        &self.navigation_properties
    }

    pub fn structural_properties(&self) -> &[StructuralProperty] {
        &self.structural_properties
    }

    pub fn navigation_property(&self, name: &str) -> Option<&NavigationProperty> {
        self.navigation_index
            .get(&name.to_lowercase())
            .map(|idx| &self.navigation_properties[*idx])
    }

    pub fn structural_property(&self, name: &str) -> Option<&StructuralProperty> {
        self.structural_index
            .get(&name.to_lowercase())
            .map(|idx| &self.structural_properties[*idx])
    }
}

/// Read-only view over the OData service metadata.
///
/// Entity set and operation import names resolve case-insensitively, so a GraphQL
/// root field `books` addresses an entity set declared as `Books`.
pub trait SchemaView: Send + Sync {
    fn resolve_entity_set(&self, name: &str) -> Option<&StructuredType>;

    fn structured_type(&self, qualified_name: &str) -> Option<&StructuredType>;

    fn is_function_import(&self, name: &str) -> bool;

    fn is_action_import(&self, name: &str) -> bool;

    /// Entity or complex type returned by a function or action import, if known.
    fn import_return_type(&self, _name: &str) -> Option<&StructuredType> {
        None
    }

    fn navigation_property<'a>(
        &'a self,
        owner: &'a StructuredType,
        name: &str,
    ) -> Option<&'a NavigationProperty> {
        owner.navigation_property(name)
    }

    fn structural_property<'a>(
        &'a self,
        owner: &'a StructuredType,
        name: &str,
    ) -> Option<&'a StructuralProperty> {
        owner.structural_property(name)
    }
}

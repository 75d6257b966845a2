use std::collections::{HashMap, HashSet};

use crate::schema::{SchemaView, StructuredType};

#[derive(Clone, Debug, PartialEq)]
pub struct EntitySet {
    pub name: String,
    pub entity_type: String,
}

/// In-memory OData entity data model.
#[derive(Clone, Debug, Default)]
pub struct EdmModel {
    types: HashMap<String, StructuredType>,
    entity_sets: HashMap<String, EntitySet>,
    function_imports: HashSet<String>,
    action_imports: HashSet<String>,
    /// Qualified return type per lowercased import name, when the operation declares one.
    import_return_types: HashMap<String, String>,
}

impl EdmModel {
    pub fn builder() -> EdmModelBuilder {
        EdmModelBuilder::default()
    }

    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.get(&name.to_lowercase())
    }

    pub fn entity_sets(&self) -> impl Iterator<Item = &EntitySet> {
        self.entity_sets.values()
    }

    pub fn types(&self) -> impl Iterator<Item = &StructuredType> {
        self.types.values()
    }
}

impl SchemaView for EdmModel {
    fn resolve_entity_set(&self, name: &str) -> Option<&StructuredType> {
        self.entity_set(name)
            .and_then(|set| self.types.get(&set.entity_type))
    }

    fn structured_type(&self, qualified_name: &str) -> Option<&StructuredType> {
        self.types.get(qualified_name)
    }

    fn is_function_import(&self, name: &str) -> bool {
        self.function_imports.contains(&name.to_lowercase())
    }

    fn is_action_import(&self, name: &str) -> bool {
        self.action_imports.contains(&name.to_lowercase())
    }

    fn import_return_type(&self, name: &str) -> Option<&StructuredType> {
        self.import_return_types
            .get(&name.to_lowercase())
            .and_then(|type_name| self.types.get(type_name))
    }
}

#[derive(Debug, Default)]
pub struct EdmModelBuilder {
    model: EdmModel,
}

impl EdmModelBuilder {
    pub fn structured_type(mut self, structured_type: StructuredType) -> Self {
        self.add_type(structured_type);
        self
    }

    pub fn entity_set(mut self, name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        self.add_entity_set(name, entity_type);
        self
    }

    pub fn function_import(mut self, name: &str) -> Self {
        self.add_function_import(name);
        self
    }

    pub fn action_import(mut self, name: &str) -> Self {
        self.add_action_import(name);
        self
    }

    /// Declares the structured type an already added import returns.
    pub fn import_returning(mut self, name: &str, return_type: impl Into<String>) -> Self {
        self.set_import_return_type(name, return_type);
        self
    }

    pub(crate) fn add_type(&mut self, structured_type: StructuredType) {
        self.model
            .types
            .insert(structured_type.name.clone(), structured_type);
    }

    pub(crate) fn add_entity_set(&mut self, name: impl Into<String>, entity_type: impl Into<String>) {
        let name = name.into();
        self.model.entity_sets.insert(
            name.to_lowercase(),
            EntitySet {
                name,
                entity_type: entity_type.into(),
            },
        );
    }

    pub(crate) fn add_function_import(&mut self, name: &str) {
        self.model.function_imports.insert(name.to_lowercase());
    }

    pub(crate) fn add_action_import(&mut self, name: &str) {
        self.model.action_imports.insert(name.to_lowercase());
    }

    pub(crate) fn set_import_return_type(&mut self, name: &str, return_type: impl Into<String>) {
        self.model
            .import_return_types
            .insert(name.to_lowercase(), return_type.into());
    }

    pub fn build(self) -> EdmModel {
        self.model
    }
}

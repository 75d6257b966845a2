use graphql_parser::query::{
    Definition, FragmentDefinition as ParserFragment, OperationDefinition, Selection as ParserSelection,
    SelectionSet, VariableDefinition,
};

use crate::ast::value::Value;
use crate::error::CompileError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectionNode {
    pub name: String,
    pub alias: Option<String>,
    pub arguments: Vec<Argument>,
    pub selections: Vec<Selection>,
}

impl SelectionNode {
    /// The key this field occupies in the GraphQL response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn has_sub_selections(&self) -> bool {
        !self.selections.is_empty()
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Field(SelectionNode),
    FragmentSpread(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FragmentDefinition {
    pub name: String,
    pub selections: Vec<Selection>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefault {
    pub name: String,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub selections: Vec<Selection>,
    pub variable_defaults: Vec<VariableDefault>,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Document {
    pub operations: Vec<Operation>,
    pub fragments: Vec<FragmentDefinition>,
}

impl Document {
    pub fn parse(source: &str) -> Result<Self, CompileError> {
        let parsed = graphql_parser::parse_query::<String>(source)
            .map_err(|err| CompileError::Parse(err.to_string()))?;

        let mut document = Document::default();

        for definition in &parsed.definitions {
            match definition {
                Definition::Operation(operation) => {
                    document.operations.push(Operation::from(operation))
                }
                Definition::Fragment(fragment) => {
                    document.fragments.push(FragmentDefinition::from(fragment))
                }
            }
        }

        Ok(document)
    }
}

fn convert_selection_set(selection_set: &SelectionSet<'_, String>) -> Vec<Selection> {
    let mut selections = Vec::with_capacity(selection_set.items.len());

    for item in &selection_set.items {
        match item {
            ParserSelection::Field(field) => selections.push(Selection::Field(SelectionNode {
                name: field.name.clone(),
                alias: field.alias.clone(),
                arguments: field
                    .arguments
                    .iter()
                    .map(|(name, value)| Argument {
                        name: name.clone(),
                        value: Value::from(value),
                    })
                    .collect(),
                selections: convert_selection_set(&field.selection_set),
            })),
            ParserSelection::FragmentSpread(spread) => {
                selections.push(Selection::FragmentSpread(spread.fragment_name.clone()))
            }
            // Type conditions carry no meaning for OData projections
            ParserSelection::InlineFragment(inline) => {
                selections.extend(convert_selection_set(&inline.selection_set))
            }
        }
    }

    selections
}

fn convert_variable_defaults(definitions: &[VariableDefinition<'_, String>]) -> Vec<VariableDefault> {
    definitions
        .iter()
        .filter_map(|definition| {
            definition
                .default_value
                .as_ref()
                .map(|value| VariableDefault {
                    name: definition.name.clone(),
                    value: Value::from(value),
                })
        })
        .collect()
}

impl From<&OperationDefinition<'_, String>> for Operation {
    fn from(operation: &OperationDefinition<'_, String>) -> Self {
        match operation {
            OperationDefinition::SelectionSet(selection_set) => Operation {
                kind: OperationKind::Query,
                name: None,
                selections: convert_selection_set(selection_set),
                variable_defaults: vec![],
            },
            OperationDefinition::Query(query) => Operation {
                kind: OperationKind::Query,
                name: query.name.clone(),
                selections: convert_selection_set(&query.selection_set),
                variable_defaults: convert_variable_defaults(&query.variable_definitions),
            },
            OperationDefinition::Mutation(mutation) => Operation {
                kind: OperationKind::Mutation,
                name: mutation.name.clone(),
                selections: convert_selection_set(&mutation.selection_set),
                variable_defaults: convert_variable_defaults(&mutation.variable_definitions),
            },
            OperationDefinition::Subscription(subscription) => Operation {
                kind: OperationKind::Subscription,
                name: subscription.name.clone(),
                selections: convert_selection_set(&subscription.selection_set),
                variable_defaults: convert_variable_defaults(&subscription.variable_definitions),
            },
        }
    }
}

impl From<&ParserFragment<'_, String>> for FragmentDefinition {
    fn from(fragment: &ParserFragment<'_, String>) -> Self {
        FragmentDefinition {
            name: fragment.name.clone(),
            selections: convert_selection_set(&fragment.selection_set),
        }
    }
}

pub mod aggregation;
pub mod arguments;
pub mod batch;
pub mod filter;
pub mod literal;
pub mod mutation;
pub mod order_by;
pub mod query_string;
pub mod selection;
pub mod visitor;

use std::collections::HashMap;

use serde_json::Value as JsonValue;
use tracing::{debug, instrument};

use crate::ast::{Document, FragmentTable, OperationKind, SelectionNode, Value};
use crate::descriptor::CompiledOperation;
use crate::error::CompileError;
use crate::options::CompilerOptions;
use crate::schema::SchemaView;

pub type Variables = HashMap<String, Value>;

/// Converts the `variables` member of a GraphQL request envelope.
pub fn variables_from_json(json: Option<&JsonValue>) -> Variables {
    match json {
        Some(JsonValue::Object(fields)) => fields
            .iter()
            .map(|(name, value)| (name.clone(), Value::from(value)))
            .collect(),
        _ => Variables::new(),
    }
}

/// Everything a compilation step needs besides the node it is compiling.
pub struct CompileContext<'a> {
    pub schema: &'a dyn SchemaView,
    pub fragments: FragmentTable<'a>,
    pub variables: Variables,
    pub options: &'a CompilerOptions,
    pub operation_kind: OperationKind,
}

impl<'a> CompileContext<'a> {
    /// Replaces a variable reference with its value; other values are returned as-is.
    pub fn resolve<'v>(&'v self, value: &'v Value) -> Result<&'v Value, CompileError> {
        match value {
            Value::Variable(name) => self
                .variables
                .get(name)
                .ok_or_else(|| CompileError::VariableResolution(name.clone())),
            other => Ok(other),
        }
    }

    pub fn inline_fields<'s>(
        &self,
        field: &'s SelectionNode,
    ) -> Result<Vec<&'s SelectionNode>, CompileError>
    where
        'a: 's,
    {
        self.fragments.inline_fields(&field.selections)
    }
}

/// Compiles the single operation of `document` into an OData request.
#[instrument(level = "debug", skip_all)]
pub fn compile_operation(
    document: &Document,
    schema: &dyn SchemaView,
    variables: Variables,
    options: &CompilerOptions,
) -> Result<CompiledOperation, CompileError> {
    let operation = match document.operations.as_slice() {
        [] => return Err(CompileError::NoOperation),
        [operation] => operation,
        _ => return Err(CompileError::MultipleOperations),
    };

    if operation.kind == OperationKind::Subscription {
        return Err(CompileError::UnsupportedOperation(operation.kind.as_str()));
    }

    let mut merged = Variables::with_capacity(operation.variable_defaults.len() + variables.len());
    for default in &operation.variable_defaults {
        merged.insert(default.name.clone(), default.value.clone());
    }
    merged.extend(variables);

    let ctx = CompileContext {
        schema,
        fragments: FragmentTable::new(&document.fragments),
        variables: merged,
        options,
        operation_kind: operation.kind,
    };

    let root_fields = ctx.fragments.inline_fields(&operation.selections)?;
    debug!(
        operation = operation.kind.as_str(),
        name = operation.name.as_deref(),
        root_fields = root_fields.len(),
        "compiling operation"
    );

    match root_fields.as_slice() {
        [] => Err(CompileError::NoOperation),
        [root] => visitor::compile_single(&ctx, root),
        roots => batch::compile_batch(&ctx, roots),
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("Failed to parse GraphQL document: {0}")]
    Parse(String),
    #[error("Multiple operations at root level are not allowed")]
    MultipleOperations,
    #[error("Document does not contain an operation")]
    NoOperation,
    #[error("Operation type '{0}' is not supported")]
    UnsupportedOperation(&'static str),
    #[error("Fragment '{0}' is not defined")]
    UnknownFragment(String),
    #[error("Cannot resolve {kind} '{name}' against the OData metadata")]
    SchemaResolution { kind: &'static str, name: String },
    #[error("Variable '${0}' is not provided")]
    VariableResolution(String),
    #[error("Invalid value for argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },
}

impl CompileError {
    pub(crate) fn entity_set(name: &str) -> Self {
        CompileError::SchemaResolution {
            kind: "entity set",
            name: name.to_string(),
        }
    }

    pub(crate) fn structured_type(name: &str) -> Self {
        CompileError::SchemaResolution {
            kind: "type",
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid_argument(argument: &str, reason: impl Into<String>) -> Self {
        CompileError::InvalidArgument {
            argument: argument.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to parse CSDL document: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Failed to parse CSDL XML document: {0}")]
    InvalidXml(#[from] roxmltree::Error),
    #[error("CSDL document does not reference an entity container")]
    MissingEntityContainer,
    #[error("CSDL entity container '{0}' is not defined")]
    UnknownEntityContainer(String),
    #[error("CSDL element '{element}' is malformed: {reason}")]
    MalformedElement { element: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ReshapeError {
    #[error("Failed to parse downstream response body: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("No root field is correlated with the downstream response")]
    EmptyCorrelation,
}

pub mod ast;
pub mod compiler;
pub mod descriptor;
pub mod error;
pub mod options;
pub mod response;
pub mod schema;


pub use compiler::{compile_operation, variables_from_json, Variables};
pub use descriptor::{CompiledOperation, CompiledRequest, RequestDescriptor, RequestKind};
pub use error::{CompileError, ReshapeError, SchemaError};
pub use options::CompilerOptions;
pub use response::reshape_response;
pub use schema::{EdmModel, SchemaView};

pub mod document;
pub mod fragment;
pub mod value;

pub use document::{
    Argument, Document, FragmentDefinition, Operation, OperationKind, Selection, SelectionNode,
};
pub use fragment::FragmentTable;
pub use value::{Scalar, Value};

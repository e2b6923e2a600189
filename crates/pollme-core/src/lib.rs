//! pollme core - model catalog and schema reader.
//!
//! The catalog describes installed apps and their models. The reader turns
//! a snapshot of that catalog into a [`SchemaResult`] used by the model-data
//! endpoints and the CLI.

pub mod catalog;
pub mod error;
pub mod reader;

pub use catalog::{
    AppConfig, AppDescriptor, AppRegistry, FieldDef, FieldDescriptor, FieldKind, ModelDef,
    ModelDescriptor, ModelRegistry, RelationTarget,
};
pub use error::Error;
pub use reader::{
    AppSchema, ColumnDetail, JoinEdge, ModelDetail, ModelReader, ReaderConfig, RelatedColumn,
    SchemaResult,
};
